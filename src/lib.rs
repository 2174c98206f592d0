//! # linkmeta - Open Graph metadata for a spreadsheet of links
//!
//! This crate takes a table of URLs, fetches every page, and builds a table
//! with each page's title, description, date and preview image as published
//! in its Open Graph tags.
//!
//! ## Features
//!
//! - Sequential, order-preserving batch processing with throttled progress
//! - Per-URL failure isolation: a bad link becomes an empty row, never an abort
//! - Field fallbacks (`og:image:secure_url`, entry-date `time` elements,
//!   `og:updated_time`)
//! - XLSX, CSV and JSON tables behind small capability traits
//! - A transport-agnostic session that any front end can drive
//!
//! ## Example
//!
//! ```rust,no_run
//! use linkmeta::crawler::{run_batch, CrawlerConfig, HttpFetcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = HttpFetcher::new(&CrawlerConfig::default())?;
//!     let urls = vec!["https://example.com/".to_string()];
//!
//!     let results = run_batch(&fetcher, &urls, |done, total| {
//!         println!("Processed {}/{} links...", done, total);
//!     })
//!     .await;
//!
//!     for row in results {
//!         println!("{} -> {}", row.url, row.title);
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub mod crawler;
pub mod session;
pub mod table;

pub use error::Error;

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::crawler::{ExtractionResult, PageContent, PageFetcher};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::session::{Reporter, Session};
    pub use crate::table::{TableSink, TableSource};
}
