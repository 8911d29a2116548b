//! Search criteria supplied by the caller.

use serde::{Deserialize, Serialize};

use super::book::LengthBucket;

/// Default number of books a search tries to collect
pub const DEFAULT_MIN_RESULTS: usize = 10;

/// Criteria for one book search
///
/// Immutable for the duration of a collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Subject string handed to the catalog
    pub subject: String,

    /// Required length bucket
    pub length: LengthBucket,

    /// First accepted publication year (inclusive)
    pub start_year: i32,

    /// Last accepted publication year (inclusive)
    pub end_year: i32,

    /// Number of books to collect before stopping
    pub min_results: usize,

    /// Reject books rated below this, when set
    pub min_rating: Option<f32>,
}

impl SearchCriteria {
    /// Create criteria with the default result quota and no rating threshold
    pub fn new(
        subject: impl Into<String>,
        length: LengthBucket,
        start_year: i32,
        end_year: i32,
    ) -> Self {
        Self {
            subject: subject.into(),
            length,
            start_year,
            end_year,
            min_results: DEFAULT_MIN_RESULTS,
            min_rating: None,
        }
    }

    /// Set the result quota
    pub fn min_results(mut self, count: usize) -> Self {
        self.min_results = count;
        self
    }

    /// Enable the minimum rating filter
    pub fn min_rating(mut self, rating: f32) -> Self {
        self.min_rating = Some(rating);
        self
    }

    /// Whether a year falls inside the inclusive range
    pub fn year_in_range(&self, year: i32) -> bool {
        self.start_year <= year && year <= self.end_year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_defaults() {
        let criteria = SearchCriteria::new("history", LengthBucket::Short, 1990, 2000);
        assert_eq!(criteria.min_results, DEFAULT_MIN_RESULTS);
        assert_eq!(criteria.min_rating, None);
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let criteria = SearchCriteria::new("history", LengthBucket::Short, 1990, 2000)
            .min_results(3)
            .min_rating(4.0);

        assert!(criteria.year_in_range(1990));
        assert!(criteria.year_in_range(2000));
        assert!(!criteria.year_in_range(1989));
        assert!(!criteria.year_in_range(2001));
        assert!(!criteria.year_in_range(0));
        assert_eq!(criteria.min_results, 3);
        assert_eq!(criteria.min_rating, Some(4.0));
    }
}
