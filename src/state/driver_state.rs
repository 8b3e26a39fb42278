/// Driver state definitions for the per-seed pagination loop
use std::fmt;

/// Represents where the pagination driver is for one seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverState {
    /// Session created, nothing fetched yet
    Start,

    /// Waiting on the fetcher for the current URL
    Fetching,

    /// Running the extractor on the fetched page
    Extracting,

    /// Deciding whether to follow the next page link
    Continue,

    /// Terminal; the session is finalized
    Done,
}

impl DriverState {
    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Checks whether the loop may move from `self` to `next`
    ///
    /// Valid transitions:
    /// - Start -> Fetching
    /// - Fetching -> Extracting | Done
    /// - Extracting -> Continue
    /// - Continue -> Fetching | Done
    pub fn can_transition_to(&self, next: DriverState) -> bool {
        matches!(
            (self, next),
            (Self::Start, Self::Fetching)
                | (Self::Fetching, Self::Extracting)
                | (Self::Fetching, Self::Done)
                | (Self::Extracting, Self::Continue)
                | (Self::Continue, Self::Fetching)
                | (Self::Continue, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Continue => "continue",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a seed's session stopped paginating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The last page had no next link
    Exhausted,

    /// `max_pages` fetches were made
    PageLimit,

    /// `max_posts` records were collected
    PostLimit,

    /// The next link pointed at an already visited page
    CycleDetected,

    /// The next link left the host of the first fetched page
    OffSite,

    /// A fetch failed; earlier records are kept
    FetchFailed,

    /// No usable site configuration for the seed
    ConfigError,
}

impl StopReason {
    /// Returns true if the session ended because of an error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::ConfigError)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
            Self::PageLimit => "page_limit",
            Self::PostLimit => "post_limit",
            Self::CycleDetected => "cycle_detected",
            Self::OffSite => "off_site",
            Self::FetchFailed => "fetch_failed",
            Self::ConfigError => "config_error",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
