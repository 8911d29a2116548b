//! Book model representing a single catalog volume.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker stored in textual fields the catalog left empty
pub const MISSING_TEXT: &str = "N/A";

/// Strict date layout used by the catalog for publication dates
pub const CATALOG_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date layout used for display
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Pages below this count are short
pub const SHORT_BELOW_PAGES: u32 = 200;

/// Pages up to and including this count are medium
pub const MEDIUM_MAX_PAGES: u32 = 400;

/// Raw catalog item as returned by a source page
pub type RawItem = Value;

/// Length bucket derived from a page count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
}

impl LengthBucket {
    /// Bucket a page count with the default thresholds
    pub fn from_page_count(page_count: u32) -> Self {
        LengthThresholds::default().bucket(page_count)
    }

    /// Lowercase identifier, as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthBucket::Short => "short",
            LengthBucket::Medium => "medium",
            LengthBucket::Long => "long",
        }
    }

    /// Capitalised name used in display strings
    pub fn label(&self) -> &'static str {
        match self {
            LengthBucket::Short => "Short",
            LengthBucket::Medium => "Medium",
            LengthBucket::Long => "Long",
        }
    }
}

impl std::fmt::Display for LengthBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LengthBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(LengthBucket::Short),
            "medium" => Ok(LengthBucket::Medium),
            "long" => Ok(LengthBucket::Long),
            other => Err(format!("unknown length bucket: {}", other)),
        }
    }
}

/// Page-count thresholds separating the length buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthThresholds {
    /// Page counts strictly below this are short
    #[serde(default = "default_short_below")]
    pub short_below: u32,

    /// Page counts up to and including this are medium, above are long
    #[serde(default = "default_medium_max")]
    pub medium_max: u32,
}

impl Default for LengthThresholds {
    fn default() -> Self {
        Self {
            short_below: SHORT_BELOW_PAGES,
            medium_max: MEDIUM_MAX_PAGES,
        }
    }
}

fn default_short_below() -> u32 {
    SHORT_BELOW_PAGES
}

fn default_medium_max() -> u32 {
    MEDIUM_MAX_PAGES
}

impl LengthThresholds {
    /// Map a page count to its bucket
    pub fn bucket(&self, page_count: u32) -> LengthBucket {
        if page_count < self.short_below {
            LengthBucket::Short
        } else if page_count <= self.medium_max {
            LengthBucket::Medium
        } else {
            LengthBucket::Long
        }
    }
}

/// Fields a book must carry to be considered complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Authors,
    Categories,
    AverageRating,
    PublishedDate,
    PageCount,
}

impl BookField {
    /// Every required field, in checking order
    pub const ALL: [BookField; 6] = [
        BookField::Title,
        BookField::Authors,
        BookField::Categories,
        BookField::AverageRating,
        BookField::PublishedDate,
        BookField::PageCount,
    ];

    /// Name of the field
    pub fn name(&self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Authors => "authors",
            BookField::Categories => "categories",
            BookField::AverageRating => "average_rating",
            BookField::PublishedDate => "published_date",
            BookField::PageCount => "page_count",
        }
    }
}

impl std::fmt::Display for BookField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identity used to recognise the same book across pages
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    title: String,
    authors: Vec<String>,
}

/// Errors raised while turning a raw catalog item into a [`Book`]
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RecordError {
    /// A structural field the record cannot be built without is absent
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A field is present but holds the wrong kind of value
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// A book from the catalog
///
/// Fields the catalog did not supply hold [`MISSING_TEXT`] or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Book title
    pub title: String,

    /// Author names
    pub authors: Vec<String>,

    /// Categories (comma-separated)
    pub categories: String,

    /// Average reader rating
    pub average_rating: f32,

    /// Publication date as supplied by the catalog
    pub published_date: String,

    /// Number of pages
    pub page_count: u32,
}

impl Book {
    /// Create a book with every field missing except the title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            categories: MISSING_TEXT.to_string(),
            average_rating: 0.0,
            published_date: MISSING_TEXT.to_string(),
            page_count: 0,
        }
    }

    /// Build a book from a Google Books volume item
    pub fn from_item(item: &RawItem) -> Result<Self, RecordError> {
        let info = item
            .get("volumeInfo")
            .ok_or(RecordError::MissingField("volumeInfo"))?;
        if !info.is_object() {
            return Err(RecordError::InvalidField {
                field: "volumeInfo",
                reason: "expected an object".to_string(),
            });
        }

        let authors = match info.get("authors") {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => string_array(value, "authors")?,
        };

        let categories = match info.get("categories") {
            None | Some(Value::Null) => MISSING_TEXT.to_string(),
            Some(value) => string_array(value, "categories")?.join(", "),
        };

        let average_rating = match info.get("averageRating") {
            None | Some(Value::Null) => 0.0,
            Some(value) => value.as_f64().ok_or_else(|| RecordError::InvalidField {
                field: "averageRating",
                reason: format!("expected a number, got {}", value),
            })? as f32,
        };

        let page_count = match info.get("pageCount") {
            None | Some(Value::Null) => 0,
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| RecordError::InvalidField {
                    field: "pageCount",
                    reason: format!("expected a page count, got {}", value),
                })?,
        };

        Ok(Self {
            title: text_field(info, "title")?,
            authors,
            categories,
            average_rating,
            published_date: text_field(info, "publishedDate")?,
            page_count,
        })
    }

    /// The first required field holding its missing sentinel, if any
    pub fn first_missing_field(&self) -> Option<BookField> {
        BookField::ALL
            .into_iter()
            .find(|field| self.is_missing(*field))
    }

    /// Whether a single field holds its missing sentinel
    ///
    /// Zero ratings and page counts read as missing even when genuine.
    pub fn is_missing(&self, field: BookField) -> bool {
        match field {
            BookField::Title => is_missing_text(&self.title),
            BookField::Authors => {
                self.authors.is_empty() || self.authors.iter().all(|a| is_missing_text(a))
            }
            BookField::Categories => is_missing_text(&self.categories),
            BookField::AverageRating => self.average_rating == 0.0,
            BookField::PublishedDate => is_missing_text(&self.published_date),
            BookField::PageCount => self.page_count == 0,
        }
    }

    /// Whether every required field is populated
    pub fn is_complete(&self) -> bool {
        self.first_missing_field().is_none()
    }

    /// Title and author list, used to suppress duplicates
    pub fn duplicate_key(&self) -> DuplicateKey {
        DuplicateKey {
            title: self.title.clone(),
            authors: self.authors.clone(),
        }
    }

    /// Publication year, or 0 when the date is not `YYYY-MM-DD`
    pub fn published_year(&self) -> i32 {
        published_year(&self.published_date)
    }

    /// Length bucket under the given thresholds
    pub fn length_bucket(&self, thresholds: &LengthThresholds) -> LengthBucket {
        thresholds.bucket(self.page_count)
    }

    /// Publication date as `DD-MM-YYYY`, or [`MISSING_TEXT`]
    pub fn formatted_date(&self) -> String {
        reformat_date(&self.published_date)
    }

    /// Author names joined for display
    pub fn author_names(&self) -> String {
        self.authors.join(", ")
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} by {} ({}, {} pages, {} stars)",
            self.title,
            self.author_names(),
            self.published_date,
            self.page_count,
            self.average_rating
        )
    }
}

/// Builder for constructing Book objects
#[derive(Debug, Clone)]
pub struct BookBuilder {
    book: Book,
}

impl BookBuilder {
    /// Create a new builder; unset fields stay missing
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            book: Book::new(title),
        }
    }

    /// Add an author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.book.authors.push(author.into());
        self
    }

    /// Set categories
    pub fn categories(mut self, categories: impl Into<String>) -> Self {
        self.book.categories = categories.into();
        self
    }

    /// Set average rating
    pub fn average_rating(mut self, rating: f32) -> Self {
        self.book.average_rating = rating;
        self
    }

    /// Set publication date
    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.book.published_date = date.into();
        self
    }

    /// Set page count
    pub fn page_count(mut self, pages: u32) -> Self {
        self.book.page_count = pages;
        self
    }

    /// Build the Book
    pub fn build(self) -> Book {
        self.book
    }
}

/// Year of a strict `YYYY-MM-DD` date, 0 on any parse failure
pub fn published_year(date: &str) -> i32 {
    parse_catalog_date(date).map(|d| d.year()).unwrap_or(0)
}

/// Rewrite a strict `YYYY-MM-DD` date as `DD-MM-YYYY`
pub fn reformat_date(date: &str) -> String {
    match parse_catalog_date(date) {
        Some(d) => d.format(DISPLAY_DATE_FORMAT).to_string(),
        None => MISSING_TEXT.to_string(),
    }
}

/// chrono's `%Y` tolerates a sign and padding, so the layout is checked first
fn parse_catalog_date(date: &str) -> Option<NaiveDate> {
    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(date, CATALOG_DATE_FORMAT).ok()
}

fn is_missing_text(value: &str) -> bool {
    value == MISSING_TEXT
}

fn text_field(info: &Value, field: &'static str) -> Result<String, RecordError> {
    match info.get(field) {
        None | Some(Value::Null) => Ok(MISSING_TEXT.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(RecordError::InvalidField {
            field,
            reason: format!("expected a string, got {}", other),
        }),
    }
}

fn string_array(value: &Value, field: &'static str) -> Result<Vec<String>, RecordError> {
    let invalid = || RecordError::InvalidField {
        field,
        reason: format!("expected a list of strings, got {}", value),
    };

    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_book() -> Book {
        BookBuilder::new("Dune")
            .author("Frank Herbert")
            .categories("Fiction")
            .average_rating(4.5)
            .published_date("1965-08-01")
            .page_count(412)
            .build()
    }

    #[test]
    fn test_length_bucket_boundaries() {
        assert_eq!(LengthBucket::from_page_count(1), LengthBucket::Short);
        assert_eq!(LengthBucket::from_page_count(199), LengthBucket::Short);
        assert_eq!(LengthBucket::from_page_count(200), LengthBucket::Medium);
        assert_eq!(LengthBucket::from_page_count(400), LengthBucket::Medium);
        assert_eq!(LengthBucket::from_page_count(401), LengthBucket::Long);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = LengthThresholds {
            short_below: 100,
            medium_max: 150,
        };
        assert_eq!(thresholds.bucket(99), LengthBucket::Short);
        assert_eq!(thresholds.bucket(150), LengthBucket::Medium);
        assert_eq!(thresholds.bucket(151), LengthBucket::Long);
    }

    #[test]
    fn test_length_bucket_parse() {
        assert_eq!("Medium".parse::<LengthBucket>(), Ok(LengthBucket::Medium));
        assert_eq!(" long ".parse::<LengthBucket>(), Ok(LengthBucket::Long));
        assert!("tiny".parse::<LengthBucket>().is_err());
        assert_eq!(LengthBucket::Short.label(), "Short");
    }

    #[test]
    fn test_published_year() {
        assert_eq!(published_year("2001-05-12"), 2001);
        assert_eq!(published_year("not-a-date"), 0);
        assert_eq!(published_year("2001"), 0);
        assert_eq!(published_year("2001-13-01"), 0);
        assert_eq!(published_year(MISSING_TEXT), 0);
        assert_eq!(published_year("+2001-05-12"), 0);
        assert_eq!(published_year(" 2001-05-12"), 0);
        assert_eq!(published_year("2001-5-12"), 0);
        assert_eq!(published_year("2001-05-12 "), 0);
    }

    #[test]
    fn test_reformat_date() {
        assert_eq!(reformat_date("2020-01-31"), "31-01-2020");
        assert_eq!(reformat_date("2020-02-30"), MISSING_TEXT);
        assert_eq!(reformat_date("31/01/2020"), MISSING_TEXT);
        assert_eq!(reformat_date("+2001-05-12"), MISSING_TEXT);
        assert_eq!(reformat_date(" 2001-05-12"), MISSING_TEXT);
        assert_eq!(reformat_date("0999-01-02"), "02-01-0999");
    }

    #[test]
    fn test_complete_book() {
        let book = complete_book();
        assert!(book.is_complete());
        assert_eq!(book.published_year(), 1965);
        assert_eq!(
            book.length_bucket(&LengthThresholds::default()),
            LengthBucket::Long
        );
        let generous = LengthThresholds {
            short_below: 300,
            medium_max: 500,
        };
        assert_eq!(book.length_bucket(&generous), LengthBucket::Medium);
        assert_eq!(book.formatted_date(), "01-08-1965");
    }

    #[test]
    fn test_each_missing_field_is_detected() {
        let cases = [
            (BookField::Title, {
                let mut b = complete_book();
                b.title = MISSING_TEXT.to_string();
                b
            }),
            (BookField::Authors, {
                let mut b = complete_book();
                b.authors.clear();
                b
            }),
            (BookField::Categories, {
                let mut b = complete_book();
                b.categories = MISSING_TEXT.to_string();
                b
            }),
            (BookField::AverageRating, {
                let mut b = complete_book();
                b.average_rating = 0.0;
                b
            }),
            (BookField::PublishedDate, {
                let mut b = complete_book();
                b.published_date = MISSING_TEXT.to_string();
                b
            }),
            (BookField::PageCount, {
                let mut b = complete_book();
                b.page_count = 0;
                b
            }),
        ];

        for (field, book) in cases {
            assert_eq!(book.first_missing_field(), Some(field), "field {}", field);
            assert!(!book.is_complete());
        }
    }

    #[test]
    fn test_duplicate_key_ignores_other_fields() {
        let a = complete_book();
        let mut b = complete_book();
        b.page_count = 100;
        b.categories = "Science Fiction".to_string();
        assert_eq!(a.duplicate_key(), b.duplicate_key());

        let mut c = complete_book();
        c.authors.push("Brian Herbert".to_string());
        assert_ne!(a.duplicate_key(), c.duplicate_key());
    }

    #[test]
    fn test_from_item_full() {
        let item = json!({
            "id": "abc",
            "volumeInfo": {
                "title": "Dune",
                "authors": ["Frank Herbert"],
                "categories": ["Fiction", "Science Fiction"],
                "averageRating": 4.5,
                "publishedDate": "1965-08-01",
                "pageCount": 412
            }
        });

        let book = Book::from_item(&item).unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.authors, vec!["Frank Herbert"]);
        assert_eq!(book.categories, "Fiction, Science Fiction");
        assert_eq!(book.average_rating, 4.5);
        assert_eq!(book.page_count, 412);
        assert!(book.is_complete());
    }

    #[test]
    fn test_from_item_absent_fields_become_sentinels() {
        let item = json!({ "volumeInfo": { "title": "Untitled Draft" } });

        let book = Book::from_item(&item).unwrap();
        assert_eq!(book.categories, MISSING_TEXT);
        assert_eq!(book.published_date, MISSING_TEXT);
        assert_eq!(book.page_count, 0);
        assert_eq!(book.first_missing_field(), Some(BookField::Authors));
    }

    #[test]
    fn test_from_item_malformed() {
        let no_info = json!({ "id": "abc" });
        assert_eq!(
            Book::from_item(&no_info),
            Err(RecordError::MissingField("volumeInfo"))
        );

        let bad_pages = json!({ "volumeInfo": { "title": "X", "pageCount": "many" } });
        assert!(matches!(
            Book::from_item(&bad_pages),
            Err(RecordError::InvalidField { field: "pageCount", .. })
        ));

        let bad_authors = json!({ "volumeInfo": { "title": "X", "authors": "Someone" } });
        assert!(matches!(
            Book::from_item(&bad_authors),
            Err(RecordError::InvalidField { field: "authors", .. })
        ));
    }
}
