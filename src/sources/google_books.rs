//! Google Books catalog source implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::models::RawItem;
use crate::sources::{CatalogSource, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient, RetryConfig};

/// Public Google Books API endpoint
pub const GOOGLE_BOOKS_API_BASE: &str = "https://www.googleapis.com/books/v1";

/// Largest `maxResults` the volumes endpoint accepts
pub const MAX_PAGE_SIZE: u32 = 40;

/// Google Books catalog source
///
/// Pages through `volumes?q=subject:<subject>` using `startIndex`.
#[derive(Debug, Clone)]
pub struct GoogleBooksSource {
    client: Arc<HttpClient>,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
    retry: RetryConfig,
}

impl GoogleBooksSource {
    /// Create a source against the public endpoint
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&ApiConfig::default())
    }

    /// Create a source from API settings
    pub fn from_config(config: &ApiConfig) -> Result<Self, SourceError> {
        if config.page_size == 0 || config.page_size > MAX_PAGE_SIZE {
            return Err(SourceError::InvalidRequest(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, config.page_size
            )));
        }

        let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;
        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
            retry: api_retry_config().max_attempts(config.max_attempts),
        })
    }

    /// Override the retry policy
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Items requested per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn page_url(&self, subject: &str, page: usize) -> String {
        let start_index = page * self.page_size as usize;
        let mut url = format!(
            "{}/volumes?q=subject:{}&startIndex={}&maxResults={}",
            self.base_url,
            encode_subject(subject),
            start_index,
            self.page_size
        );

        if let Some(key) = &self.api_key {
            url = format!("{}&key={}", url, urlencoding::encode(key));
        }

        url
    }
}

#[async_trait]
impl CatalogSource for GoogleBooksSource {
    fn id(&self) -> &str {
        "google_books"
    }

    fn name(&self) -> &str {
        "Google Books"
    }

    async fn fetch_page(&self, subject: &str, page: usize) -> Result<Vec<RawItem>, SourceError> {
        let url = self.page_url(subject, page);
        tracing::debug!(subject, page, "Fetching Google Books page");

        let client = Arc::clone(&self.client);
        let response = with_retry(self.retry, || {
            let client = Arc::clone(&client);
            let url = url.clone();
            async move {
                let response = client.get(&url).send().await.map_err(|e| {
                    SourceError::Network(format!("Failed to query Google Books: {}", e))
                })?;

                let status = response.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(SourceError::RateLimit);
                }
                if !status.is_success() {
                    return Err(SourceError::Api(format!(
                        "Google Books returned status: {}",
                        status
                    )));
                }

                Ok(response)
            }
        })
        .await?;

        let data: VolumesResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        tracing::debug!(
            page,
            total_items = data.total_items,
            returned = data.items.len(),
            "Google Books page received"
        );

        Ok(data.items)
    }
}

/// Percent-encode each `+`-joined term, keeping `+` as the term separator
fn encode_subject(subject: &str) -> String {
    subject
        .split('+')
        .map(|term| urlencoding::encode(term.trim()).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

// ===== Google Books API Types =====

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(rename = "totalItems", default)]
    total_items: u64,
    #[serde(default)]
    items: Vec<RawItem>,
}
