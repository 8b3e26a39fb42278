//! Output sink traits and errors
//!
//! This module defines the trait interface for record sinks and the errors
//! shared by every output path.

use crate::scrape::PostRecord;
use std::io::Write;
use thiserror::Error;

/// Column order of tabular output; matches the field order of [`PostRecord`]
pub const RECORD_COLUMNS: [&str; 5] = ["title", "date", "author", "content", "source_url"];

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Per-seed output needs an output directory (set [output] path or pass --output)")]
    MissingPath,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for record serializers
///
/// A sink writes one complete document (all records it is given) to a
/// writer. Sinks hold no state between calls.
pub trait RecordSink {
    /// File extension for documents written by this sink, without the dot
    fn extension(&self) -> &'static str;

    /// Serializes records to the writer
    ///
    /// # Arguments
    ///
    /// * `records` - Records in output order
    /// * `out` - Destination; flushed before returning
    fn write_records(&self, records: &[&PostRecord], out: &mut dyn Write) -> OutputResult<()>;
}
