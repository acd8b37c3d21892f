//! Serde-deserializable types matching the catalog API responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use serde::Deserialize;

use super::types::{Movie, MoviePage};

// ============================================================================
// Popular movies endpoint response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiMovie {
  pub id: i64,
  pub title: String,
  pub overview: String,
  pub poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiMoviePage {
  pub page: u32,
  pub results: Vec<ApiMovie>,
  pub total_pages: u32,
  pub total_results: u64,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl From<ApiMovie> for Movie {
  fn from(api: ApiMovie) -> Self {
    Movie {
      id: api.id,
      title: api.title,
      overview: api.overview,
      poster_path: api.poster_path,
    }
  }
}

impl From<ApiMoviePage> for MoviePage {
  fn from(api: ApiMoviePage) -> Self {
    MoviePage {
      page: api.page,
      results: api.results.into_iter().map(Movie::from).collect(),
      total_pages: api.total_pages,
      total_results: api.total_results,
    }
  }
}
