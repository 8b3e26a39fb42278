//! Pagination driver
//!
//! Runs the per-seed state machine:
//!
//! ```text
//! Start -> Fetching -> Extracting -> Continue -> Fetching ...
//!             |                          |
//!             +--------> Done <----------+
//! ```
//!
//! The loop stops when a page has no next link, when `max_pages` fetches were
//! made, when `max_posts` records were collected, when the next link was
//! already visited, when it leaves the host the seed landed on (if
//! configured), or when a fetch fails. Records gathered before a failure are
//! kept.

use crate::config::SiteConfig;
use crate::scrape::extractor::extract;
use crate::scrape::fetcher::Fetcher;
use crate::scrape::session::ScrapeSession;
use crate::scrape::types::RawPage;
use crate::state::{DriverState, StopReason};
use crate::url::same_host;
use std::time::Duration;
use url::Url;

/// Pagination options shared by every seed
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Pause before each fetch after the first
    pub delay: Duration,

    /// Stop when the next link points at another host
    pub same_host_pagination: bool,

    /// Cap on records kept per seed
    pub max_posts: Option<u32>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            same_host_pagination: true,
            max_posts: None,
        }
    }
}

/// Drives fetch/extract cycles for one seed at a time
#[derive(Debug, Clone)]
pub struct Driver {
    fetcher: Fetcher,
    options: DriverOptions,
}

impl Driver {
    pub fn new(fetcher: Fetcher, options: DriverOptions) -> Self {
        Self { fetcher, options }
    }

    /// Paginates one seed and returns its finished session
    ///
    /// # Arguments
    ///
    /// * `seed` - First listing page
    /// * `site` - Site whose selectors apply to every page of this seed
    /// * `max_pages` - Upper bound on fetches for this seed
    pub async fn run(&self, seed: &Url, site: &SiteConfig, max_pages: u32) -> ScrapeSession {
        let mut session = ScrapeSession::new(seed.clone(), Some(site.name.clone()));
        let mut state = DriverState::Start;
        let mut current = seed.clone();
        let mut page: Option<RawPage> = None;
        let mut next_url: Option<Url> = None;

        tracing::info!("Scraping {} with site '{}'", seed, site.name);

        while !state.is_terminal() {
            let next_state = match state {
                DriverState::Start => {
                    session.mark_visited(&current);
                    DriverState::Fetching
                }

                DriverState::Fetching => match self.fetcher.fetch(&current).await {
                    Ok(fetched) => {
                        session.pages_fetched += 1;
                        session.mark_visited(&fetched.final_url);
                        if session.origin.is_none() {
                            session.origin = Some(fetched.final_url.clone());
                        }
                        page = Some(fetched);
                        DriverState::Extracting
                    }
                    Err(e) => {
                        tracing::warn!("Stopping {} after fetch failure: {}", seed, e);
                        session.record_error(e);
                        session.finish(StopReason::FetchFailed);
                        DriverState::Done
                    }
                },

                DriverState::Extracting => {
                    next_url = None;
                    if let Some(fetched) = page.take() {
                        match extract(&fetched, &site.selectors) {
                            Ok(result) => {
                                tracing::debug!(
                                    "{} yielded {} records",
                                    fetched.final_url,
                                    result.records.len()
                                );
                                session.records.extend(result.records);
                                if let Some(cap) = self.options.max_posts {
                                    session.records.truncate(cap as usize);
                                }
                                next_url = result.next_url;
                            }
                            Err(e) => {
                                tracing::warn!("{}", e);
                                session.record_error(e);
                            }
                        }
                    }
                    DriverState::Continue
                }

                DriverState::Continue => match self.decide(&session, seed, next_url.take(), max_pages) {
                    Ok(url) => {
                        if !self.options.delay.is_zero() {
                            tokio::time::sleep(self.options.delay).await;
                        }
                        session.mark_visited(&url);
                        current = url;
                        DriverState::Fetching
                    }
                    Err(reason) => {
                        session.finish(reason);
                        DriverState::Done
                    }
                },

                DriverState::Done => DriverState::Done,
            };

            debug_assert!(
                state.can_transition_to(next_state),
                "invalid transition {} -> {}",
                state,
                next_state
            );
            tracing::trace!("{}: {} -> {}", seed, state, next_state);
            state = next_state;
        }

        let reason = session.stop_reason.unwrap_or(StopReason::Exhausted);
        if reason.is_error() {
            tracing::warn!(
                "Finished {} with errors: {} records from {} pages ({})",
                seed,
                session.records.len(),
                session.pages_fetched,
                reason
            );
        } else {
            tracing::info!(
                "Finished {}: {} records from {} pages ({})",
                seed,
                session.records.len(),
                session.pages_fetched,
                reason
            );
        }

        session
    }

    /// Picks the next URL to fetch, or the reason to stop
    fn decide(
        &self,
        session: &ScrapeSession,
        seed: &Url,
        next_url: Option<Url>,
        max_pages: u32,
    ) -> Result<Url, StopReason> {
        if let Some(cap) = self.options.max_posts {
            if session.records.len() >= cap as usize {
                tracing::debug!("Post limit {} reached for {}", cap, seed);
                return Err(StopReason::PostLimit);
            }
        }

        let Some(next) = next_url else {
            return Err(StopReason::Exhausted);
        };

        if session.pages_fetched >= max_pages {
            tracing::debug!("Page limit {} reached for {}", max_pages, seed);
            return Err(StopReason::PageLimit);
        }

        if session.has_visited(&next) {
            tracing::warn!("Next link {} was already visited; stopping {}", next, seed);
            return Err(StopReason::CycleDetected);
        }

        // Redirects may move the seed to another host; follow where it landed
        let origin = session.origin.as_ref().unwrap_or(seed);
        if self.options.same_host_pagination && !same_host(origin, &next) {
            tracing::info!("Next link {} leaves {}; stopping", next, origin);
            return Err(StopReason::OffSite);
        }

        Ok(next)
    }
}
