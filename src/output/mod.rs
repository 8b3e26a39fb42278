//! Output module for writing records and run summaries
//!
//! This module handles:
//! - Serializing records as JSON or CSV
//! - Combined or per-seed output files
//! - Printing and writing run summaries

mod csv_output;
mod json_output;
mod markdown;
pub mod stats;
mod traits;

pub use csv_output::CsvSink;
pub use json_output::JsonSink;
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_summary, RunSummary, SeedSummary};
pub use traits::{OutputError, OutputResult, RecordSink, RECORD_COLUMNS};

use crate::config::{OutputConfig, OutputFormat, OutputGrouping};
use crate::scrape::{PostRecord, ScrapeReport};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use url::Url;

/// Longest file stem produced by [`seed_slug`]
const MAX_SLUG_LEN: usize = 50;

/// Returns the sink for an output format
pub fn sink_for(format: OutputFormat) -> Box<dyn RecordSink> {
    match format {
        OutputFormat::Json => Box::new(JsonSink),
        OutputFormat::Csv => Box::new(CsvSink),
    }
}

/// Writes a report's records as configured
///
/// # Arguments
///
/// * `report` - The finished scrape report
/// * `config` - Output format, grouping and destination
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Files written; empty when records went to stdout
/// * `Err(OutputError)` - A file could not be written, or per-seed output has no directory
pub fn write_report(report: &ScrapeReport, config: &OutputConfig) -> OutputResult<Vec<PathBuf>> {
    let sink = sink_for(config.format);

    match config.grouping {
        OutputGrouping::Combined => {
            let records: Vec<&PostRecord> = report.records().collect();
            match &config.path {
                Some(path) => {
                    let path = PathBuf::from(path);
                    write_file(sink.as_ref(), &records, &path)?;
                    tracing::info!("Wrote {} records to {}", records.len(), path.display());
                    Ok(vec![path])
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut lock = stdout.lock();
                    sink.write_records(&records, &mut lock)?;
                    Ok(Vec::new())
                }
            }
        }

        OutputGrouping::PerSeed => {
            let dir = config.path.as_ref().ok_or(OutputError::MissingPath)?;
            let dir = Path::new(dir);
            std::fs::create_dir_all(dir)?;

            let mut used = HashSet::new();
            let mut written = Vec::with_capacity(report.sessions.len());
            for session in &report.sessions {
                let stem = unique_stem(seed_slug(&session.seed), &mut used);
                let path = dir.join(format!("{}.{}", stem, sink.extension()));
                let records: Vec<&PostRecord> = session.records.iter().collect();
                write_file(sink.as_ref(), &records, &path)?;
                tracing::info!(
                    "Wrote {} records for {} to {}",
                    records.len(),
                    session.seed,
                    path.display()
                );
                written.push(path);
            }
            Ok(written)
        }
    }
}

fn write_file(sink: &dyn RecordSink, records: &[&PostRecord], path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    sink.write_records(records, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// File stem for a seed's per-seed output
///
/// Host and path joined, every character outside `[A-Za-z0-9_-]` replaced
/// by `_`, cut to 50 characters.
///
/// # Examples
///
/// ```
/// use blog_scrape::output::seed_slug;
/// use url::Url;
///
/// let seed = Url::parse("https://example.com/mag/").unwrap();
/// assert_eq!(seed_slug(&seed), "example_com_mag");
/// ```
pub fn seed_slug(seed: &Url) -> String {
    let raw = format!(
        "{}{}",
        seed.host_str().unwrap_or(""),
        seed.path().trim_end_matches('/')
    );

    let slug: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_SLUG_LEN)
        .collect();

    if slug.is_empty() {
        "seed".to_string()
    } else {
        slug
    }
}

/// Appends `_2`, `_3`, ... until the stem is unused
fn unique_stem(stem: String, used: &mut HashSet<String>) -> String {
    if used.insert(stem.clone()) {
        return stem;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", stem, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
