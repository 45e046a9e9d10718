/// Page state definitions for tracking a crawl target through the orchestrator
///
/// Every target moves `Pending -> Gated`, then either ends `Skipped` or moves on to
/// `Fetching`. A fetch ends `Failed` or `Fetched -> Analyzed -> Dispatched`.
use crate::CrawlError;
use std::fmt;

/// Represents the current state of a crawl target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Target created, nothing checked yet
    Pending,

    /// Depth, visited-set and robots.txt checks are running
    Gated,

    /// HTTP request in flight
    Fetching,

    /// Body received, not yet analyzed
    Fetched,

    /// Metrics computed and links extracted
    Analyzed,

    // ===== Terminal States =====
    /// Children dispatched and merged into the result tree
    Dispatched,

    /// Excluded by depth, visited-set or robots.txt
    Skipped,

    /// Fetch failed (network, timeout, status or non-HTML body)
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dispatched | Self::Skipped | Self::Failed)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Dispatched)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Gated)
                | (Self::Gated, Self::Skipped)
                | (Self::Gated, Self::Fetching)
                | (Self::Fetching, Self::Fetched)
                | (Self::Fetching, Self::Failed)
                | (Self::Fetched, Self::Analyzed)
                | (Self::Analyzed, Self::Dispatched)
        )
    }

    /// Moves to `next`, rejecting transitions the state machine does not allow
    pub fn transition(self, next: PageState) -> Result<PageState, CrawlError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CrawlError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Gated => "gated",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::Analyzed => "analyzed",
            Self::Dispatched => "dispatched",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    /// Returns all states in lifecycle order
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Gated,
            Self::Fetching,
            Self::Fetched,
            Self::Analyzed,
            Self::Dispatched,
            Self::Skipped,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
