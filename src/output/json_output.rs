//! JSON record sink

use crate::output::traits::{OutputResult, RecordSink};
use crate::scrape::PostRecord;
use std::io::Write;

/// Writes records as a pretty-printed JSON array
///
/// Absent `date` and `author` values are written as `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSink;

impl RecordSink for JsonSink {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write_records(&self, records: &[&PostRecord], out: &mut dyn Write) -> OutputResult<()> {
        serde_json::to_writer_pretty(&mut *out, records)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}
