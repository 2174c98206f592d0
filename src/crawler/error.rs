//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for crawler operations
///
/// Per-URL errors never leave the fetcher: [`HttpFetcher::fetch`](super::HttpFetcher)
/// logs them and hands back [`PageContent::Unavailable`](super::PageContent)
/// instead. Only building the client surfaces one, as a crate error.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP client error (connect, timeout, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The URL parsed but cannot be requested over HTTP
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Http(e) => CrateError::Http(e),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}
