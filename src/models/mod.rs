//! Core data models for books and search criteria.

mod book;
mod search;

pub use book::{
    published_year, reformat_date, Book, BookBuilder, BookField, DuplicateKey, LengthBucket,
    LengthThresholds, RawItem, RecordError, MISSING_TEXT,
};
pub use search::{SearchCriteria, DEFAULT_MIN_RESULTS};
