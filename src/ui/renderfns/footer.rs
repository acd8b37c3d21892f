use marquee::cache::CacheSource;
use marquee::sync::SyncSnapshot;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::utils::format_synced_at;

/// Draw the footer bar with view breadcrumb, sync source and last error
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumb: &[String], status: &SyncSnapshot) {
  let mut spans = vec![Span::raw(" ")];

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i == breadcrumb.len() - 1 {
      // Current view - highlighted
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  spans.push(Span::styled("  │ ", Style::default().fg(Color::DarkGray)));
  spans.push(source_span(status.source));
  spans.push(Span::styled(
    format!(" {}", format_synced_at(status.synced_at)),
    Style::default().fg(Color::DarkGray),
  ));

  if let Some(error) = &status.last_error {
    spans.push(Span::styled("  │ ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(error.clone(), Style::default().fg(Color::Red)));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

fn source_span(source: CacheSource) -> Span<'static> {
  match source {
    CacheSource::Empty => Span::styled("empty", Style::default().fg(Color::DarkGray)),
    CacheSource::Network => Span::styled("network", Style::default().fg(Color::Green)),
    CacheSource::Offline => Span::styled("cache", Style::default().fg(Color::Yellow)),
  }
}
