/// Follow cap applied to a source when none is configured.
///
/// An unset cap does not mean "unlimited": every source is still held to
/// this many follows per session.
pub const DEFAULT_SOURCE_FOLLOW_LIMIT: u32 = 15;

/// Decides whether a source may still produce follow actions this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFollowGate {
    source: String,
    cap: Option<u32>,
}

impl SourceFollowGate {
    pub fn new(source: impl Into<String>, cap: Option<u32>) -> Self {
        Self {
            source: source.into(),
            cap,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn effective_cap(&self) -> u32 {
        self.cap.unwrap_or(DEFAULT_SOURCE_FOLLOW_LIMIT)
    }

    /// `follows_for_source` is the number of follows already attributed to
    /// this gate's source in the current session.
    pub fn is_reached(&self, follows_for_source: u32) -> bool {
        follows_for_source >= self.effective_cap()
    }
}
