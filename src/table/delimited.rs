//! Comma-separated tables

use csv::{ReaderBuilder, Writer};

use crate::crawler::ExtractionResult;
use crate::table::{collect_urls, TableError, TableSink, TableSource};

/// CSV with a header row
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTable;

impl TableSource for CsvTable {
    fn read_urls(&self, bytes: &[u8]) -> Result<Vec<String>, TableError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

        collect_urls(rows.into_iter())
    }
}

impl TableSink for CsvTable {
    fn write_results(&self, results: &[ExtractionResult]) -> Result<Vec<u8>, TableError> {
        let mut writer = Writer::from_writer(Vec::new());

        writer.write_record(ExtractionResult::COLUMNS)?;
        for result in results {
            writer.write_record(result.values())?;
        }

        writer.into_inner().map_err(|e| TableError::Io(e.into_error()))
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}
