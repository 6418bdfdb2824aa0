use std::fmt;
use std::io;
use std::path::PathBuf;

use likers_core::InvalidTarget;

/// Failures raised by the device or its agent. All of them are treated as
/// transient by the crash-safe runner: the app is restarted and the job retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("application crashed: {0}")]
    AppCrashed(String),
    #[error("device disconnected: {0}")]
    Disconnected(String),
    #[error("device agent timed out")]
    Timeout,
    #[error("ui element not found: {0}")]
    ElementNotFound(String),
    #[error("device agent error {code}: {message}")]
    Agent { code: i64, message: String },
    #[error("malformed agent response: {0}")]
    Protocol(String),
}

/// The target list could not be loaded; the campaign does not start.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no target file specified")]
    NotSpecified,
    #[error("target file {0:?} does not exist")]
    NotFound(PathBuf),
    #[error("no targets found in {0:?}")]
    Empty(PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why iteration over a reactor list ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStop {
    /// Scrolling stopped revealing new entries.
    Exhausted,
    /// Too many entries skipped in a row with flinging disabled.
    SkipLimit,
    /// The source produced its share of successful interactions.
    InteractionsCount,
    /// A session-wide limit was reached mid-list.
    SessionLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSummary {
    pub seen: u32,
    pub interacted: u32,
    pub skipped: u32,
    pub stop: ListStop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    InvalidTarget(InvalidTarget),
    NavigationFailed,
    Completed(ListSummary),
    /// A global limit fired while the target's job was still being retried.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub target: String,
    pub outcome: TargetOutcome,
    /// Attempts that failed and were recovered before the outcome was reached.
    pub recoveries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CampaignReport {
    pub targets: Vec<TargetReport>,
    /// Counter summary when the campaign stopped on a session limit.
    pub limit_detail: Option<String>,
}

impl CampaignReport {
    pub fn stopped_on_limit(&self) -> bool {
        self.limit_detail.is_some()
    }

    pub fn count(&self, matches: impl Fn(&TargetOutcome) -> bool) -> usize {
        self.targets
            .iter()
            .filter(|report| matches(&report.outcome))
            .count()
    }
}

impl fmt::Display for TargetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetOutcome::InvalidTarget(err) => write!(f, "skipped ({err})"),
            TargetOutcome::NavigationFailed => write!(f, "navigation failed"),
            TargetOutcome::Completed(summary) => write!(
                f,
                "done: {} seen, {} interacted, {} skipped ({:?})",
                summary.seen, summary.interacted, summary.skipped, summary.stop
            ),
            TargetOutcome::Interrupted => write!(f, "interrupted by session limits"),
        }
    }
}
