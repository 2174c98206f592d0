//! Error types for the table module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for reading and writing tables
#[derive(Debug, Error)]
pub enum TableError {
    /// The header row has no cell that is exactly `URL`
    #[error("The spreadsheet must have a column named 'URL'")]
    MissingUrlColumn,

    /// The file extension does not name a known table format
    #[error("Unsupported table format: {0}")]
    UnsupportedFormat(String),

    /// The format can be written but not read
    #[error("Cannot read URLs from a {0} file")]
    ReadUnsupported(&'static str),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook could not be opened or a sheet could not be read
    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    /// Workbook could not be written
    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while flushing a buffer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableError {
    /// Whether this is the schema error users can fix by renaming a column
    pub fn is_schema_error(&self) -> bool {
        matches!(self, TableError::MissingUrlColumn)
    }
}

impl From<TableError> for CrateError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::MissingUrlColumn => CrateError::Schema(err.to_string()),
            TableError::Json(e) => CrateError::Json(e),
            TableError::Io(e) => CrateError::Io(e),
            _ => CrateError::Table(err.to_string()),
        }
    }
}
