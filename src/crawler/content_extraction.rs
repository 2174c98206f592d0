//! Content extraction functionality for the crawler module

use crate::crawler::{ExtractionResult, PageContent};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Class tokens of the entry-date `time` element, in order.
///
/// Whitespace between tokens is free, but `published entry-date updated` or
/// an extra class does not match.
const ENTRY_DATE_CLASSES: [&str; 3] = ["entry-date", "published", "updated"];

/// Extract the metadata row for a page
///
/// # Arguments
///
/// * `url` - The URL the content was fetched from, echoed into the result
/// * `content` - The fetch outcome
///
/// # Returns
///
/// The extracted row. Fields that cannot be found are empty; an
/// [`PageContent::Unavailable`] input yields a row with only `url` set.
pub fn extract(url: &str, content: &PageContent) -> ExtractionResult {
    let mut result = ExtractionResult::empty(url);

    let PageContent::Page(page) = content else {
        debug!(%url, "No page content, emitting empty row");
        return result;
    };

    let document = Html::parse_document(&page.body);

    result.title = meta_tag(&document, "og:title")
        .map(content_of)
        .unwrap_or_default();
    result.description = meta_tag(&document, "og:description")
        .map(content_of)
        .unwrap_or_default();
    result.image = extract_image(&document);
    result.date = extract_date(&document);

    debug!(
        %url,
        status = page.status,
        has_title = !result.title.is_empty(),
        has_date = !result.date.is_empty(),
        "Extracted metadata"
    );
    result
}

/// `og:image`, falling back to `og:image:secure_url` only when the former tag is absent
fn extract_image(document: &Html) -> String {
    meta_tag(document, "og:image")
        .or_else(|| meta_tag(document, "og:image:secure_url"))
        .map(content_of)
        .unwrap_or_default()
}

/// Entry-date `time` element first, then `og:updated_time`
fn extract_date(document: &Html) -> String {
    if let Some(time) = entry_date_element(document) {
        return match time.value().attr("datetime") {
            Some(datetime) if !datetime.is_empty() => datetime.to_string(),
            _ => time.text().collect(),
        };
    }

    meta_tag(document, "og:updated_time")
        .map(content_of)
        .unwrap_or_default()
}

fn entry_date_element(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("time[class]").ok()?;
    document.select(&selector).find(|time| {
        time.value()
            .attr("class")
            .is_some_and(|class| class.split_whitespace().eq(ENTRY_DATE_CLASSES))
    })
}

fn meta_tag<'a>(document: &'a Html, property: &str) -> Option<ElementRef<'a>> {
    select_first(document, &format!(r#"meta[property="{}"]"#, property))
}

fn content_of(element: ElementRef<'_>) -> String {
    element
        .value()
        .attr("content")
        .unwrap_or_default()
        .to_string()
}

/// First element matching `selector_str`, or `None` if the selector is invalid
fn select_first<'a>(document: &'a Html, selector_str: &str) -> Option<ElementRef<'a>> {
    match Selector::parse(selector_str) {
        Ok(selector) => document.select(&selector).next(),
        Err(e) => {
            warn!("Failed to parse selector '{}': {}", selector_str, e);
            None
        }
    }
}
