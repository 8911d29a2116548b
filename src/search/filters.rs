//! The per-book filter pipeline.
//!
//! Stages run in a fixed order and stop at the first rejection:
//!
//! 1. completeness: every [`BookField`] populated
//! 2. duplicates: `(title, authors)` not seen before in this search
//! 3. category exclusion: no excluded term inside the categories
//! 4. minimum rating, only when the criteria enable it
//! 5. year range and length bucket
//!
//! The duplicate stage records a key as seen before the later stages run, so
//! a book rejected for its category or length still blocks later copies.

use std::collections::HashSet;

use crate::config::SearchConfig;
use crate::models::{Book, BookField, DuplicateKey, LengthBucket, SearchCriteria};

/// Why a book was dropped
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// A required field holds its missing sentinel
    Incomplete(BookField),
    /// Same title and authors as a book seen earlier
    Duplicate,
    /// Categories contain an excluded term
    ExcludedCategory,
    /// Rating below the requested minimum
    LowRating(f32),
    /// Publication year outside the requested range (0 when unparseable)
    OutOfRange(i32),
    /// Page count falls in a different bucket
    WrongLength(LengthBucket),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Incomplete(field) => write!(f, "missing {}", field),
            Rejection::Duplicate => write!(f, "duplicate"),
            Rejection::ExcludedCategory => write!(f, "excluded category"),
            Rejection::LowRating(rating) => write!(f, "rating {} too low", rating),
            Rejection::OutOfRange(year) => write!(f, "year {} out of range", year),
            Rejection::WrongLength(bucket) => write!(f, "{} book", bucket),
        }
    }
}

/// Runs the filter stages for one search, remembering duplicate keys
#[derive(Debug)]
pub struct FilterPipeline<'a> {
    criteria: &'a SearchCriteria,
    settings: &'a SearchConfig,
    seen: HashSet<DuplicateKey>,
}

impl<'a> FilterPipeline<'a> {
    /// Create a pipeline with an empty seen set
    pub fn new(criteria: &'a SearchCriteria, settings: &'a SearchConfig) -> Self {
        Self {
            criteria,
            settings,
            seen: HashSet::new(),
        }
    }

    /// Run every stage against a book
    pub fn evaluate(&mut self, book: &Book) -> Result<(), Rejection> {
        if let Some(field) = book.first_missing_field() {
            return Err(Rejection::Incomplete(field));
        }

        if !self.seen.insert(book.duplicate_key()) {
            return Err(Rejection::Duplicate);
        }

        if is_excluded_category(&book.categories, &self.settings.excluded_categories) {
            return Err(Rejection::ExcludedCategory);
        }

        if let Some(min_rating) = self.criteria.min_rating {
            if book.average_rating < min_rating {
                return Err(Rejection::LowRating(book.average_rating));
            }
        }

        let year = book.published_year();
        if !self.criteria.year_in_range(year) {
            return Err(Rejection::OutOfRange(year));
        }

        let bucket = book.length_bucket(&self.settings.length_thresholds);
        if bucket != self.criteria.length {
            return Err(Rejection::WrongLength(bucket));
        }

        Ok(())
    }

    /// Number of distinct books seen so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Case-insensitive substring match of the categories against excluded terms
pub fn is_excluded_category<S: AsRef<str>>(categories: &str, excluded: &[S]) -> bool {
    let categories = categories.to_lowercase();
    excluded
        .iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .any(|term| categories.contains(&term))
}
