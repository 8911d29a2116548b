//! # Book Finder
//!
//! Searches a book catalog by subject and keeps the books that match a length
//! bucket and a publication year range.
//!
//! ## Architecture
//!
//! - [`models`]: Book records, length buckets and search criteria
//! - [`sources`]: Catalog sources behind the [`CatalogSource`] trait
//! - [`search`]: The paginating collector and its filter pipeline
//! - [`display`]: Display strings for a single book
//! - [`utils`]: HTTP client and retry helpers
//! - [`config`]: Configuration management

pub mod config;
pub mod display;
pub mod models;
pub mod search;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::{Book, LengthBucket, SearchCriteria};
pub use search::{find_books, BookCollector};
pub use sources::{CatalogSource, GoogleBooksSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
