//! Remote movie catalog access.

pub mod api_types;
pub mod client;
pub mod error;
pub mod service;
pub mod types;

pub use client::{HttpCatalogClient, RemoteCatalogClient};
pub use error::{ClientError, ServiceError};
pub use service::{CatalogService, TmdbService};
pub use types::{Movie, MoviePage};
