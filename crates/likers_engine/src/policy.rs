use likers_core::{InteractionRecord, SessionState};
use serde::Serialize;

use crate::{Device, DeviceError};

/// Per-action probabilities (0..=100) resolved for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Percentages {
    pub likes: u32,
    pub follow: u32,
    pub stories: u32,
    pub comment: u32,
    pub pm: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionContext<'a> {
    pub source: &'a str,
    pub percentages: Percentages,
    /// Number of posts to like when the policy decides to like.
    pub likes_count: u32,
    /// `false` once the source's follow cap is reached.
    pub can_follow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    Acted(InteractionRecord),
    /// Filtered out or already known; nothing was done.
    Skipped,
    /// Opened but the interaction did not go through.
    Failed,
}

/// Decides and performs the engagement with one user of a reactor list.
///
/// Implementations record what they did in the session counters.
pub trait InteractionPolicy {
    fn interact(
        &mut self,
        device: &mut dyn Device,
        username: &str,
        ctx: &InteractionContext<'_>,
        session: &mut SessionState,
    ) -> Result<InteractionOutcome, DeviceError>;
}
