use serde::{Deserialize, Serialize};

/// Base URL that relative poster paths are resolved against.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// A movie as shown in list and detail views.
///
/// Movies are keyed by `id` in the local cache and never change after the
/// first time they are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
  pub id: i64,
  pub title: String,
  pub overview: String,
  pub poster_path: Option<String>,
}

impl Movie {
  /// Full poster URL using the default image host.
  pub fn poster_url(&self) -> Option<String> {
    self.poster_url_in(POSTER_BASE_URL)
  }

  /// Full poster URL resolved against `base`, if the movie has a poster.
  pub fn poster_url_in(&self, base: &str) -> Option<String> {
    self
      .poster_path
      .as_deref()
      .map(|path| format!("{}{}", base.trim_end_matches('/'), path))
  }
}

/// One page of results from the catalog. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePage {
  pub page: u32,
  /// Movies in server order
  pub results: Vec<Movie>,
  pub total_pages: u32,
  pub total_results: u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn movie(poster_path: Option<&str>) -> Movie {
    Movie {
      id: 3,
      title: "Dune".to_string(),
      overview: "Arrakis".to_string(),
      poster_path: poster_path.map(String::from),
    }
  }

  #[test]
  fn test_poster_url() {
    assert_eq!(
      movie(Some("/dune.jpg")).poster_url().as_deref(),
      Some("https://image.tmdb.org/t/p/w500/dune.jpg")
    );
  }

  #[test]
  fn test_poster_url_none_without_path() {
    assert_eq!(movie(None).poster_url(), None);
  }

  #[test]
  fn test_poster_url_custom_base_trailing_slash() {
    assert_eq!(
      movie(Some("/dune.jpg"))
        .poster_url_in("http://img.local/w185/")
        .as_deref(),
      Some("http://img.local/w185/dune.jpg")
    );
  }
}
