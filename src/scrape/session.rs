//! Per-seed sessions and the run-wide report

use crate::scrape::types::PostRecord;
use crate::state::StopReason;
use crate::url::visit_key;
use crate::{ConfigError, FetchError, ParseError};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// An error recorded against one seed's session
///
/// These never abort the run; they are reported in the summary.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Everything gathered while paginating one seed
#[derive(Debug)]
pub struct ScrapeSession {
    pub seed: Url,
    /// Site the seed was resolved to, if any
    pub site: Option<String>,
    pub records: Vec<PostRecord>,
    pub pages_fetched: u32,
    /// Final URL of the first fetched page; pagination stays on its host
    pub origin: Option<Url>,
    pub stop_reason: Option<StopReason>,
    pub errors: Vec<SessionError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    visited: HashSet<String>,
}

impl ScrapeSession {
    pub fn new(seed: Url, site: Option<String>) -> Self {
        Self {
            seed,
            site,
            records: Vec::new(),
            pages_fetched: 0,
            origin: None,
            stop_reason: None,
            errors: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
            visited: HashSet::new(),
        }
    }

    /// Creates an already finished session for a seed that could not start
    pub fn failed(seed: Url, error: ConfigError) -> Self {
        let mut session = Self::new(seed, None);
        session.errors.push(error.into());
        session.finish(StopReason::ConfigError);
        session
    }

    /// Records a URL as visited; returns false if it was seen before
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(visit_key(url))
    }

    pub fn has_visited(&self, url: &Url) -> bool {
        self.visited.contains(&visit_key(url))
    }

    pub fn record_error(&mut self, error: impl Into<SessionError>) {
        self.errors.push(error.into());
    }

    /// Finalizes the session
    pub fn finish(&mut self, reason: StopReason) {
        self.stop_reason = Some(reason);
        self.finished_at = Some(Utc::now());
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Results of a whole run, one session per seed in seed order
#[derive(Debug)]
pub struct ScrapeReport {
    pub sessions: Vec<ScrapeSession>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScrapeReport {
    /// All records across seeds, in seed order then page order
    pub fn records(&self) -> impl Iterator<Item = &PostRecord> {
        self.sessions.iter().flat_map(|s| s.records.iter())
    }

    pub fn total_records(&self) -> usize {
        self.sessions.iter().map(|s| s.records.len()).sum()
    }

    pub fn total_pages(&self) -> u64 {
        self.sessions.iter().map(|s| u64::from(s.pages_fetched)).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.sessions.iter().map(|s| s.errors.len()).sum()
    }

    /// Number of seeds whose session recorded at least one error
    pub fn failed_seeds(&self) -> usize {
        self.sessions.iter().filter(|s| s.has_errors()).count()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}
