//! Paginated movie catalog browsing with a local offline cache.
//!
//! The crate is split into a small core that a UI shell drives:
//! - [`catalog`]: HTTP client and the catalog service that builds requests
//! - [`cache`]: persistent keyed store for fetched movies
//! - [`sync`]: the pagination synchronizer that merges pages into the store
//! - [`connectivity`]: injectable network reachability check

pub mod cache;
pub mod catalog;
pub mod config;
pub mod connectivity;
pub mod logging;
pub mod sync;
