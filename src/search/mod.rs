//! Book search: pagination, duplicate suppression and filtering.
//!
//! ```rust,no_run
//! use book_finder::models::{LengthBucket, SearchCriteria};
//! use book_finder::search::BookCollector;
//! use book_finder::sources::GoogleBooksSource;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = GoogleBooksSource::new()?;
//! let criteria = SearchCriteria::new("history", LengthBucket::Medium, 1990, 2020).min_results(5);
//!
//! let report = BookCollector::new(&source).collect(&criteria).await?;
//! for book in &report.books {
//!     println!("{}", book);
//! }
//! # Ok(())
//! # }
//! ```

mod collector;
mod filters;

pub use collector::{
    find_books, find_books_default, BookCollector, CollectionReport, CollectionStats,
};
pub use filters::{is_excluded_category, FilterPipeline, Rejection};
