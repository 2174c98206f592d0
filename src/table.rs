//! # Table I/O
//!
//! Moves tables in and out of the pipeline without the pipeline knowing the
//! file format. A [`TableSource`] turns uploaded bytes into the ordered list
//! of URLs; a [`TableSink`] turns the ordered results back into bytes.
//!
//! ## Formats
//!
//! - `xlsx` via calamine (read) and rust_xlsxwriter (write), the default
//! - `csv` via the csv crate
//! - `json` (write only), an array of row objects

mod delimited;
mod error;
mod json;
mod spreadsheet;

pub use delimited::CsvTable;
pub use error::TableError;
pub use json::JsonTable;
pub use spreadsheet::XlsxTable;

use std::path::Path;

use crate::crawler::ExtractionResult;

/// Header of the column URLs are read from
pub const URL_COLUMN: &str = "URL";

/// Reads the URL column out of an input table
pub trait TableSource: Send + Sync {
    /// The trimmed, non-empty `URL` cells in row order
    fn read_urls(&self, bytes: &[u8]) -> Result<Vec<String>, TableError>;
}

/// Serializes result rows into an output table
pub trait TableSink: Send + Sync {
    /// Encode `results` with columns `URL, Title, Description, Date, Image`
    fn write_results(&self, results: &[ExtractionResult]) -> Result<Vec<u8>, TableError>;

    /// File extension for the produced payload, without the dot
    fn extension(&self) -> &'static str;
}

/// Table formats known by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Xlsx,
    Csv,
    Json,
}

impl TableFormat {
    /// Pick the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" => Ok(TableFormat::Xlsx),
            "csv" => Ok(TableFormat::Csv),
            "json" => Ok(TableFormat::Json),
            _ => Err(TableError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// A source for this format
    pub fn source(self) -> Result<Box<dyn TableSource>, TableError> {
        match self {
            TableFormat::Xlsx => Ok(Box::new(XlsxTable)),
            TableFormat::Csv => Ok(Box::new(CsvTable)),
            TableFormat::Json => Err(TableError::ReadUnsupported("json")),
        }
    }

    /// A sink for this format
    pub fn sink(self) -> Box<dyn TableSink> {
        match self {
            TableFormat::Xlsx => Box::new(XlsxTable),
            TableFormat::Csv => Box::new(CsvTable),
            TableFormat::Json => Box::new(JsonTable),
        }
    }
}

/// Shared by the row-oriented sources: locate `URL` in the header row and
/// collect the trimmed, non-empty cells below it.
pub(crate) fn collect_urls<I>(mut rows: I) -> Result<Vec<String>, TableError>
where
    I: Iterator<Item = Vec<String>>,
{
    let header = rows.next().ok_or(TableError::MissingUrlColumn)?;
    let column = header
        .iter()
        .position(|cell| cell == URL_COLUMN)
        .ok_or(TableError::MissingUrlColumn)?;

    Ok(rows
        .filter_map(|row| row.into_iter().nth(column))
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect())
}
