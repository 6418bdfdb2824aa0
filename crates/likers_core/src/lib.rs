//! Likers core: pure campaign decision logic, no device or file IO.
mod exhaustion;
mod follow_gate;
mod session;
mod state;
mod target;
mod value;

pub use exhaustion::{ListExhaustion, REACTOR_LIST_REPEAT_LIMIT};
pub use follow_gate::{SourceFollowGate, DEFAULT_SOURCE_FOLLOW_LIMIT};
pub use session::{InteractionRecord, LimitScope, LimitStatus, SessionLimits, SessionState};
pub use state::CampaignState;
pub use target::{
    extract_shortcode, parse_target_lines, InvalidReason, InvalidTarget, Shortcode,
    PLATFORM_DOMAIN,
};
pub use value::{resolve_or, ValueSpec, ValueSpecError};
