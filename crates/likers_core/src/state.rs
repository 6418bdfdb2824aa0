/// Per-target progress record, reset for every target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CampaignState {
    /// Set by the job once the target has been handled to completion.
    pub completed: bool,
}

impl CampaignState {
    pub fn new() -> Self {
        Self::default()
    }
}
