/// Crawl session state definitions
///
/// A session is `Seeded` right after construction, `Running` once the first
/// cycle pops a URL, and ends either `Exhausted` (frontier drained) or
/// `Suspended` (cancelled by the caller).
use std::fmt;

/// Represents the lifecycle state of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Main domain enqueued and robots.txt loaded; no cycle has run yet
    Seeded,

    /// At least one cycle has popped a URL from the frontier
    Running,

    // ===== Terminal States =====
    /// The frontier is empty; every further cycle returns nothing
    Exhausted,

    /// The session was cancelled; every further cycle returns nothing
    Suspended,
}

impl CrawlState {
    /// Returns true if no further pages will be produced
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Suspended)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Staying in the same state is always legal. Terminal states only
    /// accept themselves.
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        if *self == next {
            return true;
        }

        match self {
            Self::Seeded => true,
            Self::Running => matches!(next, Self::Exhausted | Self::Suspended),
            Self::Exhausted | Self::Suspended => false,
        }
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seeded => "seeded",
            Self::Running => "running",
            Self::Exhausted => "exhausted",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
