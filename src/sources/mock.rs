//! Mock source for testing purposes.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::RawItem;
use crate::sources::{CatalogSource, SourceError};

/// A mock catalog that serves scripted pages.
///
/// Pages past the end of the script are empty. Every call is recorded, so
/// tests can assert how many fetches a search made and with which arguments.
#[derive(Debug, Default)]
pub struct MockSource {
    pages: Vec<Vec<RawItem>>,
    fail_on_page: Option<usize>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, usize)>>,
}

impl MockSource {
    /// Create a mock source that only ever returns empty pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source serving the given pages in order.
    pub fn with_pages(pages: Vec<Vec<RawItem>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    /// Make the fetch of `page` fail with a network error.
    pub fn fail_on_page(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    /// Number of fetches made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(subject, page)` of every fetch, in order.
    pub fn requests(&self) -> Vec<(String, usize)> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CatalogSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn fetch_page(&self, subject: &str, page: usize) -> Result<Vec<RawItem>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.requests.lock() {
            guard.push((subject.to_string(), page));
        }

        if self.fail_on_page == Some(page) {
            return Err(SourceError::Network(format!("mock failure on page {}", page)));
        }

        Ok(self.pages.get(page).cloned().unwrap_or_default())
    }
}

/// Helper function to create a complete Google Books style volume item.
pub fn make_item(
    title: &str,
    authors: &[&str],
    categories: &str,
    rating: f64,
    published: &str,
    pages: u32,
) -> RawItem {
    json!({
        "kind": "books#volume",
        "volumeInfo": {
            "title": title,
            "authors": authors,
            "categories": [categories],
            "averageRating": rating,
            "publishedDate": published,
            "pageCount": pages
        }
    })
}
