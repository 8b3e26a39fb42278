//! Run statistics derived from a scrape report
//!
//! This module flattens a [`ScrapeReport`] into per-seed rows and totals,
//! and prints them to stdout.

use crate::scrape::{ScrapeReport, ScrapeSession};

/// Outcome of one seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub seed: String,
    pub site: Option<String>,
    pub records: usize,
    pub pages_fetched: u32,
    pub stop_reason: String,
    pub errors: Vec<String>,
}

impl SeedSummary {
    fn from_session(session: &ScrapeSession) -> Self {
        Self {
            seed: session.seed.to_string(),
            site: session.site.clone(),
            records: session.records.len(),
            pages_fetched: session.pages_fetched,
            stop_reason: session
                .stop_reason
                .map(|r| r.as_str().to_string())
                .unwrap_or_else(|| "unfinished".to_string()),
            errors: session.errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Summary of a whole run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: String,
    pub finished_at: String,
    pub duration_seconds: i64,
    pub config_hash: Option<String>,
    pub seeds: Vec<SeedSummary>,
    pub total_records: usize,
    pub total_pages: u64,
    pub total_errors: usize,
    pub failed_seeds: usize,
}

impl RunSummary {
    /// Builds a summary from a finished report
    ///
    /// # Arguments
    ///
    /// * `report` - The finished scrape report
    /// * `config_hash` - Hash of the configuration file, if loaded from disk
    pub fn from_report(report: &ScrapeReport, config_hash: Option<&str>) -> Self {
        Self {
            started_at: report.started_at.to_rfc3339(),
            finished_at: report.finished_at.to_rfc3339(),
            duration_seconds: report.duration_seconds(),
            config_hash: config_hash.map(String::from),
            seeds: report.sessions.iter().map(SeedSummary::from_session).collect(),
            total_records: report.total_records(),
            total_pages: report.total_pages(),
            total_errors: report.total_errors(),
            failed_seeds: report.failed_seeds(),
        }
    }
}

/// Prints a run summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &RunSummary) {
    println!("=== Scrape Summary ===\n");

    for seed in &summary.seeds {
        println!("{}", seed.seed);
        println!(
            "  Site: {}",
            seed.site.as_deref().unwrap_or("(no matching site)")
        );
        println!("  Records: {}", seed.records);
        println!("  Pages fetched: {}", seed.pages_fetched);
        println!("  Stopped: {}", seed.stop_reason);
        for error in &seed.errors {
            println!("  Error: {}", error);
        }
        println!();
    }

    println!("Totals:");
    println!("  Seeds: {}", summary.seeds.len());
    println!("  Records: {}", summary.total_records);
    println!("  Pages fetched: {}", summary.total_pages);
    println!(
        "  Errors: {} ({} seeds affected)",
        summary.total_errors, summary.failed_seeds
    );
    println!("  Duration: {}s", summary.duration_seconds);
    if let Some(hash) = &summary.config_hash {
        println!("  Config hash: {}", hash);
    }
}
