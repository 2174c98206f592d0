//! Error types for the linkmeta crate

use thiserror::Error;

/// Result type for linkmeta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for linkmeta operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input table has no `URL` column
    #[error("Schema error: {0}")]
    Schema(String),

    /// Reading or writing a table failed
    #[error("Table error: {0}")]
    Table(String),

    /// Fetching a page failed
    #[error("Crawl error: {0}")]
    Crawl(String),
}
