//! # Extraction Session
//!
//! The conversation a caller has with linkmeta, independent of how messages
//! travel. A transport (the CLI here; a chat bot or an upload endpoint would
//! work the same way) implements [`Reporter`] and hands the uploaded table to
//! [`Session::handle_table`]:
//!
//! 1. the URL column is read; a missing column is reported and nothing is fetched
//! 2. an acknowledgment with the number of URLs is sent
//! 3. the batch runs, with throttled "Processed X/Y links..." status updates
//! 4. the result table is sent back as a document with a caption

use tracing::{info, instrument, warn};

use crate::crawler::{run_batch_with, CrawlerConfig, PageFetcher};
use crate::error::Result;
use crate::table::{TableSink, TableSource};

/// Start/help text
pub const USAGE: &str = "Send a spreadsheet (.xlsx) with your URLs in a column whose header is 'URL'. \
Every page is fetched and a result spreadsheet is sent back with the columns \
URL, Title, Description, Date and Image, one row per URL.";

/// Reply when the input has no `URL` column
pub const MISSING_URL_COLUMN_REPLY: &str = "The spreadsheet must have a column named 'URL'!";

/// Caption attached to the result document
pub const RESULT_CAPTION: &str = "Metadata extracted from the submitted URLs.";

/// Base name of the result document
pub const RESULT_FILE_STEM: &str = "result";

/// Where a session's messages go
pub trait Reporter {
    /// Send a standalone message
    fn reply(&mut self, text: &str);

    /// Replace the current status line
    fn status(&mut self, text: &str);

    /// Deliver the result table
    fn send_document(&mut self, file_name: &str, bytes: Vec<u8>, caption: &str) -> Result<()>;
}

/// Status line sent before processing starts
pub fn acknowledgment(total: usize) -> String {
    format!("Processing {} URLs...", total)
}

/// Status line for a progress notification
pub fn progress_message(done: usize, total: usize) -> String {
    format!("Processed {}/{} links...", done, total)
}

/// Runs uploaded tables through the batch pipeline
pub struct Session<F> {
    fetcher: F,
    config: CrawlerConfig,
}

impl<F: PageFetcher> Session<F> {
    /// Create a session that fetches with `fetcher`
    pub fn new(fetcher: F, config: CrawlerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Answer a start/help request
    pub fn usage<R: Reporter>(&self, reporter: &mut R) {
        reporter.reply(USAGE);
    }

    /// Process one uploaded table and send the result back
    ///
    /// Returns the number of rows in the result. A table without a `URL`
    /// column is reported to the caller and returned as
    /// [`Error::Schema`](crate::Error::Schema) before any page is fetched.
    #[instrument(skip_all, fields(bytes = bytes.len()))]
    pub async fn handle_table<R: Reporter>(
        &self,
        source: &dyn TableSource,
        sink: &dyn TableSink,
        bytes: &[u8],
        reporter: &mut R,
    ) -> Result<usize> {
        let urls = match source.read_urls(bytes) {
            Ok(urls) => urls,
            Err(e) if e.is_schema_error() => {
                warn!("Rejected table without a URL column");
                reporter.reply(MISSING_URL_COLUMN_REPLY);
                return Err(e.into());
            }
            Err(e) => {
                warn!(error = %e, "Could not read table");
                reporter.reply(&format!("Could not read the spreadsheet: {}", e));
                return Err(e.into());
            }
        };

        let total = urls.len();
        reporter.status(&acknowledgment(total));

        let results = run_batch_with(&self.fetcher, &urls, &self.config, |done, of| {
            reporter.status(&progress_message(done, of));
        })
        .await;

        let payload = sink.write_results(&results)?;
        let file_name = format!("{}.{}", RESULT_FILE_STEM, sink.extension());
        info!(rows = results.len(), %file_name, "Sending result table");
        reporter.send_document(&file_name, payload, RESULT_CAPTION)?;

        Ok(results.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{HttpFetcher, PageContent};
    use crate::table::{CsvTable, XlsxTable};
    use crate::Error;
    use async_trait::async_trait;
    use mockito::Server;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Reply(String),
        Status(String),
        Document {
            file_name: String,
            bytes: Vec<u8>,
            caption: String,
        },
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Vec<Event>,
    }

    impl RecordingReporter {
        fn statuses(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|event| match event {
                    Event::Status(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn document(&self) -> Option<(&str, &[u8], &str)> {
            self.events.iter().find_map(|event| match event {
                Event::Document {
                    file_name,
                    bytes,
                    caption,
                } => Some((file_name.as_str(), bytes.as_slice(), caption.as_str())),
                _ => None,
            })
        }
    }

    impl Reporter for RecordingReporter {
        fn reply(&mut self, text: &str) {
            self.events.push(Event::Reply(text.to_string()));
        }

        fn status(&mut self, text: &str) {
            self.events.push(Event::Status(text.to_string()));
        }

        fn send_document(&mut self, file_name: &str, bytes: Vec<u8>, caption: &str) -> Result<()> {
            self.events.push(Event::Document {
                file_name: file_name.to_string(),
                bytes,
                caption: caption.to_string(),
            });
            Ok(())
        }
    }

    /// Counts requests and never returns content
    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for CountingFetcher {
        async fn fetch(&self, _url: &str) -> PageContent {
            self.calls.fetch_add(1, Ordering::SeqCst);
            PageContent::Unavailable
        }
    }

    fn csv_input(urls: &[String]) -> Vec<u8> {
        let mut input = String::from("URL\n");
        for url in urls {
            input.push_str(url);
            input.push('\n');
        }
        input.into_bytes()
    }

    #[test]
    fn test_usage_mentions_url_column() {
        let session = Session::new(CountingFetcher::default(), CrawlerConfig::default());
        let mut reporter = RecordingReporter::default();

        session.usage(&mut reporter);

        assert_eq!(reporter.events, vec![Event::Reply(USAGE.to_string())]);
        assert!(USAGE.contains("'URL'"));
    }

    #[tokio::test]
    async fn test_missing_url_column_stops_before_fetching() {
        let session = Session::new(CountingFetcher::default(), CrawlerConfig::default());
        let mut reporter = RecordingReporter::default();

        let result = session
            .handle_table(&CsvTable, &CsvTable, b"Link\nhttps://a.example\n", &mut reporter)
            .await;

        assert!(matches!(result, Err(Error::Schema(_))));
        assert_eq!(
            reporter.events,
            vec![Event::Reply(MISSING_URL_COLUMN_REPLY.to_string())]
        );
        assert_eq!(session.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unreadable_table_is_reported() {
        let session = Session::new(CountingFetcher::default(), CrawlerConfig::default());
        let mut reporter = RecordingReporter::default();

        let result = session
            .handle_table(&XlsxTable, &XlsxTable, b"definitely not a zip", &mut reporter)
            .await;

        assert!(matches!(result, Err(Error::Table(_))));
        assert!(matches!(&reporter.events[..], [Event::Reply(text)] if text.starts_with("Could not read")));
        assert_eq!(session.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_progress_messages_for_25_urls() {
        let urls: Vec<String> = (1..=25).map(|i| format!("https://a.example/{i}")).collect();
        let session = Session::new(CountingFetcher::default(), CrawlerConfig::default());
        let mut reporter = RecordingReporter::default();

        let rows = session
            .handle_table(&CsvTable, &CsvTable, &csv_input(&urls), &mut reporter)
            .await
            .unwrap();

        assert_eq!(rows, 25);
        assert_eq!(
            reporter.statuses(),
            vec![
                "Processing 25 URLs...",
                "Processed 10/25 links...",
                "Processed 20/25 links...",
                "Processed 25/25 links...",
            ]
        );
        assert_eq!(session.fetcher.calls.load(Ordering::SeqCst), 25);

        let (file_name, bytes, caption) = reporter.document().unwrap();
        assert_eq!(file_name, "result.csv");
        assert_eq!(caption, RESULT_CAPTION);
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text.lines().count(), 26);
    }

    #[tokio::test]
    async fn test_empty_url_column_sends_header_only() {
        let session = Session::new(CountingFetcher::default(), CrawlerConfig::default());
        let mut reporter = RecordingReporter::default();

        let rows = session
            .handle_table(&CsvTable, &CsvTable, b"URL\n\n  \n", &mut reporter)
            .await
            .unwrap();

        assert_eq!(rows, 0);
        assert_eq!(reporter.statuses(), vec!["Processing 0 URLs..."]);
        let (_, bytes, _) = reporter.document().unwrap();
        assert_eq!(bytes, b"URL,Title,Description,Date,Image\n");
    }

    #[tokio::test]
    async fn test_end_to_end_with_http() {
        let mut server = Server::new_async().await;
        let post = server
            .mock("GET", "/post")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(
                r#"<html><head>
                    <meta property="og:title" content="Post">
                    <meta property="og:image:secure_url" content="https://cdn.example/p.jpg">
                    <meta property="og:updated_time" content="2024-06-01">
                </head><body>
                    <time class="entry-date published updated" datetime="2024-01-01">Jan 1</time>
                </body></html>"#,
            )
            .create_async()
            .await;

        let urls = vec![
            format!("{}/post", server.url()),
            "http://127.0.0.1:1/unreachable".to_string(),
            "not a url".to_string(),
        ];
        let config = CrawlerConfig::builder().timeout_secs(5).build();
        let session = Session::new(HttpFetcher::new(&config).unwrap(), config);
        let mut reporter = RecordingReporter::default();

        session
            .handle_table(&CsvTable, &CsvTable, &csv_input(&urls), &mut reporter)
            .await
            .unwrap();

        let (_, bytes, _) = reporter.document().unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[1],
            format!("{},Post,,2024-01-01,https://cdn.example/p.jpg", urls[0])
        );
        assert_eq!(lines[2], "http://127.0.0.1:1/unreachable,,,,");
        assert_eq!(lines[3], "not a url,,,,");
        post.assert_async().await;
    }
}
