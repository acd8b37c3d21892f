//! Persistent local cache for catalog entities.
//!
//! This module provides an append-only keyed store that:
//! - Caches entities by a stable integer id
//! - Never overwrites an entity once stored (insert-if-absent)
//! - Returns the full cached set ordered by id, for offline display

mod storage;
mod traits;

pub use storage::{LocalStore, SqliteStore, StorageError};
pub use traits::{CacheSource, Cacheable};
