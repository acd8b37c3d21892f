use chrono::{DateTime, Local, Utc};

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Local wall-clock time of the last successful sync, for the footer
pub fn format_synced_at(synced_at: Option<DateTime<Utc>>) -> String {
  match synced_at {
    Some(at) => format!("synced {}", at.with_timezone(&Local).format("%H:%M:%S")),
    None => "never synced".to_string(),
  }
}
