//! Utility modules supporting catalog requests.
//!
//! - [`HttpClient`]: HTTP client with timeouts and a crate user agent
//! - [`RetryConfig`]: Configuration for retry logic with exponential backoff
//! - [`with_retry`]: Execute an operation with automatic retry on transient errors
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use book_finder::sources::SourceError;
//! use book_finder::utils::{with_retry, RetryConfig};
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), SourceError> {
//! let config = RetryConfig::default().max_attempts(3);
//! let result = with_retry(config, || fetch_data()).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod retry;

pub use http::{HttpClient, DEFAULT_TIMEOUT_SECS};
pub use retry::{api_retry_config, with_retry, RetryConfig, TransientError};
