//! Book catalog sources.
//!
//! This module defines the [`CatalogSource`] trait the collector pulls pages
//! through. A source only fetches raw items; turning them into
//! [`Book`](crate::models::Book) records and filtering them happens in
//! [`search`](crate::search).
//!
//! - [`GoogleBooksSource`]: the Google Books volumes API
//! - [`MockSource`]: scripted pages for tests and offline runs

mod google_books;
pub mod mock;

pub use google_books::{GoogleBooksSource, GOOGLE_BOOKS_API_BASE, MAX_PAGE_SIZE};
pub use mock::MockSource;

use crate::models::RawItem;
use async_trait::async_trait;

/// A paginated book catalog.
///
/// Pages are addressed by a zero-based index. Repeated fetches of the same
/// index should return equivalent content; an exhausted catalog returns empty
/// pages rather than an error.
#[async_trait]
pub trait CatalogSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "google_books")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch one page of raw items for a subject
    async fn fetch_page(&self, subject: &str, page: usize) -> Result<Vec<RawItem>, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
