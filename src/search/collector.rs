//! Pagination-driven result collection.

use serde::Serialize;

use crate::config::SearchConfig;
use crate::models::{Book, LengthBucket, SearchCriteria, DEFAULT_MIN_RESULTS};
use crate::search::filters::{FilterPipeline, Rejection};
use crate::sources::{CatalogSource, SourceError};

/// Counters describing one collection run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub pages_fetched: usize,
    pub empty_pages: usize,
    pub items_seen: usize,
    pub malformed: usize,
    pub incomplete: usize,
    pub duplicates: usize,
    pub excluded_category: usize,
    pub low_rating: usize,
    pub out_of_range: usize,
    pub wrong_length: usize,
    pub accepted: usize,
    /// Stopped on the empty-page streak rather than the quota
    pub exhausted: bool,
}

impl CollectionStats {
    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::Incomplete(_) => self.incomplete += 1,
            Rejection::Duplicate => self.duplicates += 1,
            Rejection::ExcludedCategory => self.excluded_category += 1,
            Rejection::LowRating(_) => self.low_rating += 1,
            Rejection::OutOfRange(_) => self.out_of_range += 1,
            Rejection::WrongLength(_) => self.wrong_length += 1,
        }
    }
}

/// Accepted books in discovery order, with run statistics
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub books: Vec<Book>,
    pub stats: CollectionStats,
}

/// Pulls pages from a catalog until enough books pass the filters
#[derive(Debug)]
pub struct BookCollector<'a, S: CatalogSource + ?Sized> {
    source: &'a S,
    settings: SearchConfig,
}

impl<'a, S: CatalogSource + ?Sized> BookCollector<'a, S> {
    /// Create a collector with the default search settings
    pub fn new(source: &'a S) -> Self {
        Self::with_settings(source, SearchConfig::default())
    }

    /// Create a collector with explicit search settings
    pub fn with_settings(source: &'a S, settings: SearchConfig) -> Self {
        Self { source, settings }
    }

    /// Settings in use
    pub fn settings(&self) -> &SearchConfig {
        &self.settings
    }

    /// Collect up to `criteria.min_results` qualifying books.
    ///
    /// Stops once the quota is met or `empty_page_limit` consecutive pages
    /// come back empty. Malformed items are counted and skipped; fetch errors
    /// propagate.
    pub async fn collect(&self, criteria: &SearchCriteria) -> Result<CollectionReport, SourceError> {
        let mut books: Vec<Book> = Vec::new();
        let mut stats = CollectionStats::default();
        let mut pipeline = FilterPipeline::new(criteria, &self.settings);
        let mut page = 0usize;
        let mut empty_streak = 0u32;

        tracing::debug!(
            source = self.source.id(),
            subject = %criteria.subject,
            length = %criteria.length,
            start_year = criteria.start_year,
            end_year = criteria.end_year,
            min_results = criteria.min_results,
            "Starting book collection"
        );

        while books.len() < criteria.min_results {
            let items = self.source.fetch_page(&criteria.subject, page).await?;
            stats.pages_fetched += 1;

            if items.is_empty() {
                stats.empty_pages += 1;
                empty_streak += 1;
                if empty_streak >= self.settings.empty_page_limit {
                    tracing::debug!(page, empty_streak, "Catalog exhausted");
                    stats.exhausted = true;
                    break;
                }
            } else {
                empty_streak = 0;
            }

            for item in &items {
                stats.items_seen += 1;

                let book = match Book::from_item(item) {
                    Ok(book) => book,
                    Err(e) => {
                        tracing::trace!(page, error = %e, "Skipping malformed item");
                        stats.malformed += 1;
                        continue;
                    }
                };

                match pipeline.evaluate(&book) {
                    Ok(()) => {
                        books.push(book);
                        if books.len() >= criteria.min_results {
                            break;
                        }
                    }
                    Err(rejection) => {
                        tracing::trace!(title = %book.title, %rejection, "Book rejected");
                        stats.record(rejection);
                    }
                }
            }

            page += 1;
        }

        books.truncate(criteria.min_results);
        stats.accepted = books.len();

        for book in &books {
            tracing::info!(
                title = %book.title,
                authors = %book.author_names(),
                published = %book.published_date,
                pages = book.page_count,
                "Collected book"
            );
        }

        tracing::debug!(?stats, "Book collection finished");

        Ok(CollectionReport { books, stats })
    }
}

/// Find up to `min_results` unique books matching subject, length and years.
///
/// Uses the default search settings. Returning fewer books than requested is
/// not an error.
pub async fn find_books<S: CatalogSource + ?Sized>(
    source: &S,
    subject: &str,
    length: LengthBucket,
    start_year: i32,
    end_year: i32,
    min_results: usize,
) -> Result<Vec<Book>, SourceError> {
    let criteria =
        SearchCriteria::new(subject, length, start_year, end_year).min_results(min_results);
    let report = BookCollector::new(source).collect(&criteria).await?;
    Ok(report.books)
}

/// [`find_books`] with the default quota of ten
pub async fn find_books_default<S: CatalogSource + ?Sized>(
    source: &S,
    subject: &str,
    length: LengthBucket,
    start_year: i32,
    end_year: i32,
) -> Result<Vec<Book>, SourceError> {
    find_books(source, subject, length, start_year, end_year, DEFAULT_MIN_RESULTS).await
}
