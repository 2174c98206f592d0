//! Sequential batch runner
//!
//! URLs are processed strictly one after another: the next fetch does not
//! start until the previous row has been pushed. That keeps outbound
//! concurrency at one request and the output in input order without any
//! coordination.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, error, info, instrument};

use crate::crawler::content_extraction::extract;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::{CrawlerConfig, ExtractionResult};

/// Whether progress should be reported after `done` of `total` items
///
/// True after every `interval`-th item and always after the last one. An
/// interval of 0 is treated as 1.
pub fn should_report_progress(done: usize, total: usize, interval: usize) -> bool {
    done == total || done % interval.max(1) == 0
}

/// Run a batch, reporting progress every 10 items
///
/// # Arguments
///
/// * `fetcher` - Retrieves each page
/// * `urls` - The URLs to process, in output order
/// * `on_progress` - Called with `(done, total)` per the throttling rule
///
/// # Returns
///
/// One row per input URL, in input order
pub async fn run_batch<F, P>(fetcher: &F, urls: &[String], on_progress: P) -> Vec<ExtractionResult>
where
    F: PageFetcher + ?Sized,
    P: FnMut(usize, usize),
{
    run_batch_with(fetcher, urls, &CrawlerConfig::default(), on_progress).await
}

/// Run a batch using the progress interval from `config`
#[instrument(skip_all, fields(total = urls.len()))]
pub async fn run_batch_with<F, P>(
    fetcher: &F,
    urls: &[String],
    config: &CrawlerConfig,
    mut on_progress: P,
) -> Vec<ExtractionResult>
where
    F: PageFetcher + ?Sized,
    P: FnMut(usize, usize),
{
    let total = urls.len();
    let mut results = Vec::with_capacity(total);
    let mut unavailable = 0usize;

    info!("Starting batch of {} URLs", total);

    for (idx, url) in urls.iter().enumerate() {
        let done = idx + 1;

        let outcome = AssertUnwindSafe(process_url(fetcher, url))
            .catch_unwind()
            .await;
        let result = match outcome {
            Ok((result, fetched)) => {
                if !fetched {
                    unavailable += 1;
                }
                result
            }
            Err(panic) => {
                error!(%url, panic = panic_message(&*panic), "Processing panicked, emitting empty row");
                unavailable += 1;
                ExtractionResult::empty(url.as_str())
            }
        };
        results.push(result);

        if should_report_progress(done, total, config.progress_interval) {
            debug!(done, total, "Reporting progress");
            on_progress(done, total);
        }
    }

    info!(total, unavailable, "Batch finished");
    results
}

/// Fetch and extract one URL; the flag is false when nothing was fetched
async fn process_url<F>(fetcher: &F, url: &str) -> (ExtractionResult, bool)
where
    F: PageFetcher + ?Sized,
{
    let content = fetcher.fetch(url).await;
    let fetched = !content.is_unavailable();
    (extract(url, &content), fetched)
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
