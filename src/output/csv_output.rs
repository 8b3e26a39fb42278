//! CSV record sink

use crate::output::traits::{OutputResult, RecordSink, RECORD_COLUMNS};
use crate::scrape::PostRecord;
use std::io::Write;

/// Writes records as CSV with a header row
///
/// The header is written even when there are no records. Absent values
/// become empty cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSink;

impl RecordSink for CsvSink {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn write_records(&self, records: &[&PostRecord], out: &mut dyn Write) -> OutputResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);

        writer.write_record(RECORD_COLUMNS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
