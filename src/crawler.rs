//! # Page Crawler Module
//!
//! This module turns an ordered list of URLs into an ordered list of metadata
//! rows. It is the core of linkmeta: everything around it only moves tables
//! in and out.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: request timeout, user agent and progress throttling
//! - `PageFetcher` / `HttpFetcher`: retrieves a page or the `Unavailable` sentinel
//! - `extract`: pulls Open Graph fields out of fetched HTML
//! - `run_batch`: drives fetch + extract over a whole batch, one URL at a time
//!
//! ## Failure handling
//!
//! Nothing in here returns an error for a bad URL. A failed fetch becomes
//! [`PageContent::Unavailable`], a missing tag becomes an empty field, and a
//! panic inside one item becomes an empty row. Every input URL produces
//! exactly one [`ExtractionResult`], in input order.

mod batch;
mod config;
mod content_extraction;
mod error;
mod fetcher;

// Re-export important types and functions
pub use batch::{run_batch, run_batch_with, should_report_progress};
pub use config::{
    CrawlerConfig, CrawlerConfigBuilder, DEFAULT_PROGRESS_INTERVAL, DEFAULT_TIMEOUT_SECS,
};
pub use content_extraction::extract;
pub use error::CrawlError;
pub use fetcher::{HttpFetcher, PageFetcher};

use serde::{Deserialize, Serialize};

/// A page body as returned by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code, recorded but not interpreted
    pub status: u16,

    /// Decoded response body
    pub body: String,
}

/// Outcome of fetching a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// The server answered with a body
    Page(FetchedPage),

    /// Nothing could be fetched (bad URL, network error, timeout, ...)
    Unavailable,
}

impl PageContent {
    /// Whether this is the "no content" sentinel
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PageContent::Unavailable)
    }
}

/// One output row: the metadata extracted for one input URL
///
/// Missing values are empty strings, never absent, so a failed URL and a page
/// without any Open Graph tags look the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The input URL, echoed verbatim
    #[serde(rename = "URL")]
    pub url: String,

    /// `og:title`
    #[serde(rename = "Title")]
    pub title: String,

    /// `og:description`
    #[serde(rename = "Description")]
    pub description: String,

    /// Publish/update date in whatever format the page used
    #[serde(rename = "Date")]
    pub date: String,

    /// `og:image`, or `og:image:secure_url`
    #[serde(rename = "Image")]
    pub image: String,
}

impl ExtractionResult {
    /// Column headers, in output order
    pub const COLUMNS: [&'static str; 5] = ["URL", "Title", "Description", "Date", "Image"];

    /// A row for `url` with every other field empty
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Field values in the same order as [`Self::COLUMNS`]
    pub fn values(&self) -> [&str; 5] {
        [
            &self.url,
            &self.title,
            &self.description,
            &self.date,
            &self.image,
        ]
    }
}
