//! Movie catalog abstraction
//!
//! The view controller only sees this trait, so the external catalog can be
//! swapped or stubbed without touching the feed logic.

use crate::{
    error::{AppError, AppResult},
    models::{CatalogPayload, Movie, CATALOG_FALLBACK_ERROR},
};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// Read access to an external movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search the catalog
    ///
    /// An empty query returns the default popularity listing. Results come
    /// back in catalog order and may be empty.
    async fn search(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// Catalog name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Turns a decoded payload into results or a `Catalog` error
pub fn parse_payload(payload: CatalogPayload) -> AppResult<Vec<Movie>> {
    if payload.is_failure() {
        let message = payload
            .error
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| CATALOG_FALLBACK_ERROR.to_string());
        return Err(AppError::Catalog(message));
    }

    Ok(payload.results.unwrap_or_default())
}
