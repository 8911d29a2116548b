//! Basic usage example for the Book Finder library.
//!
//! Searches Google Books for medium-length history books published between
//! 1990 and 2020 and prints them with the display helpers.

use book_finder::display::{
    format_book_length, format_book_published, format_book_rating, format_category_for_search,
};
use book_finder::models::{LengthBucket, SearchCriteria};
use book_finder::search::BookCollector;
use book_finder::sources::{CatalogSource, GoogleBooksSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let source = GoogleBooksSource::new()?;
    println!("Using catalog: {}\n", source.name());

    let subject = format_category_for_search("history", "nonfiction");
    let criteria = SearchCriteria::new(subject, LengthBucket::Medium, 1990, 2020).min_results(5);

    let collector = BookCollector::new(&source);
    let report = collector.collect(&criteria).await?;
    let thresholds = collector.settings().length_thresholds;

    println!(
        "Found {} books after {} pages\n",
        report.books.len(),
        report.stats.pages_fetched
    );

    for (i, book) in report.books.iter().enumerate() {
        println!("{}. {}", i + 1, book.title);
        println!("   Authors: {}", book.author_names());
        println!("   Published: {}", format_book_published(book));
        println!("   Rating: {}", format_book_rating(book));
        println!("   Length: {}", format_book_length(book, &thresholds));
    }

    Ok(())
}
