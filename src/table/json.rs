//! JSON output

use crate::crawler::ExtractionResult;
use crate::table::{TableError, TableSink};

/// Writes results as a pretty-printed array of row objects
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTable;

impl TableSink for JsonTable {
    fn write_results(&self, results: &[ExtractionResult]) -> Result<Vec<u8>, TableError> {
        Ok(serde_json::to_vec_pretty(results)?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
