//! Display strings derived from a single book.
//!
//! These only format; they never filter.

use crate::models::{Book, LengthThresholds};

/// Genre that turns a category into a `fiction+<category>` search subject
pub const FICTION_GENRE: &str = "fiction";

/// Publication date as `DD-MM-YYYY`, or `N/A`
pub fn format_book_published(book: &Book) -> String {
    book.formatted_date()
}

/// Categories as supplied by the catalog
pub fn format_book_categories(book: &Book) -> String {
    book.categories.clone()
}

/// Rating as `<value> stars`
pub fn format_book_rating(book: &Book) -> String {
    format!("{} stars", book.average_rating)
}

/// Length as `<Bucket>, <n> pages`
///
/// Pass the thresholds the books were filtered with so the label agrees
/// with the requested bucket.
pub fn format_book_length(book: &Book, thresholds: &LengthThresholds) -> String {
    format!(
        "{}, {} pages",
        book.length_bucket(thresholds).label(),
        book.page_count
    )
}

/// Authors joined with commas
pub fn format_book_authors(book: &Book) -> String {
    book.author_names()
}

/// Build the subject handed to the catalog for a category
pub fn format_category_for_search(category: &str, selected_genre: &str) -> String {
    if selected_genre == FICTION_GENRE {
        format!("{}+{}", FICTION_GENRE, category)
    } else {
        category.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookBuilder;

    fn book() -> Book {
        BookBuilder::new("The Hobbit")
            .author("J. R. R. Tolkien")
            .categories("Fiction")
            .average_rating(4.0)
            .published_date("1937-09-21")
            .page_count(310)
            .build()
    }

    #[test]
    fn test_formatters() {
        let book = book();
        assert_eq!(format_book_published(&book), "21-09-1937");
        assert_eq!(format_book_categories(&book), "Fiction");
        assert_eq!(format_book_rating(&book), "4 stars");
        assert_eq!(
            format_book_length(&book, &LengthThresholds::default()),
            "Medium, 310 pages"
        );
        assert_eq!(format_book_authors(&book), "J. R. R. Tolkien");
    }

    #[test]
    fn test_rating_keeps_catalog_precision() {
        let mut book = book();
        book.average_rating = 3.75;
        assert_eq!(format_book_rating(&book), "3.75 stars");
        book.average_rating = 4.5;
        assert_eq!(format_book_rating(&book), "4.5 stars");
    }

    #[test]
    fn test_length_label_follows_thresholds() {
        let book = book();
        let thresholds = LengthThresholds {
            short_below: 350,
            medium_max: 500,
        };
        assert_eq!(format_book_length(&book, &thresholds), "Short, 310 pages");
    }

    #[test]
    fn test_malformed_date_formats_as_missing() {
        let mut book = book();
        book.published_date = "1937".to_string();
        assert_eq!(format_book_published(&book), "N/A");
    }

    #[test]
    fn test_category_for_search() {
        assert_eq!(format_category_for_search("horror", "fiction"), "fiction+horror");
        assert_eq!(format_category_for_search("history", "nonfiction"), "history");
        assert_eq!(format_category_for_search("horror", "Fiction"), "horror");
    }
}
