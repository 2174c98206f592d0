//! XLSX workbooks

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use tracing::{debug, warn};

use crate::crawler::ExtractionResult;
use crate::table::{collect_urls, TableError, TableSink, TableSource};

/// Longest string Excel accepts in a single cell
const MAX_CELL_CHARS: usize = 32_767;

/// Reads the first worksheet of an `.xlsx` workbook and writes results as one
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxTable;

impl TableSource for XlsxTable {
    fn read_urls(&self, bytes: &[u8]) -> Result<Vec<String>, TableError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => return Err(TableError::MissingUrlColumn),
        };
        debug!(rows = range.height(), "Read first worksheet");

        collect_urls(range.rows().map(|row| row.iter().map(cell_text).collect()))
    }
}

impl TableSink for XlsxTable {
    fn write_results(&self, results: &[ExtractionResult]) -> Result<Vec<u8>, TableError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();

        for (col, header) in ExtractionResult::COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (idx, result) in results.iter().enumerate() {
            let row = (idx + 1) as u32;
            for (col, value) in result.values().into_iter().enumerate() {
                worksheet.write_string(row, col as u16, fit_cell(value, &result.url))?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Cut a value down to what a cell can hold
fn fit_cell<'a>(value: &'a str, url: &str) -> &'a str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            warn!(%url, "Value longer than {} characters truncated", MAX_CELL_CHARS);
            &value[..end]
        }
        None => value,
    }
}
