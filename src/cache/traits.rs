//! Core traits and types for the caching system.

use serde::{de::DeserializeOwned, Serialize};

use crate::catalog::Movie;

/// Trait for entities that can be cached.
///
/// Implementors provide a stable integer id that is unique within their
/// entity type.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned {
  /// Unique identifier for this entity (e.g., movie id)
  fn cache_id(&self) -> i64;

  /// Entity type name for storage organization (e.g., "movie")
  fn entity_type() -> &'static str;
}

impl Cacheable for Movie {
  fn cache_id(&self) -> i64 {
    self.id
  }

  fn entity_type() -> &'static str {
    "movie"
  }
}

/// Indicates where published data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheSource {
  /// Nothing loaded yet
  #[default]
  Empty,
  /// Cache contents reloaded right after a successful network fetch
  Network,
  /// Offline mode - network fetch failed, serving cached data
  Offline,
}
