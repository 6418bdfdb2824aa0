//! Likers engine: device-facing campaign execution.
mod campaign;
mod crash;
mod device;
mod likers;
mod navigate;
mod pace;
mod policy;
mod rpc;
mod runner;
mod targets;
mod types;

pub use campaign::{
    Campaign, CampaignSettings, DEFAULT_FLING_WHEN_SKIPPED, DEFAULT_INTERACTIONS_COUNT,
    DEFAULT_LIKES_COUNT, DEFAULT_LIKES_PERCENTAGE, DEFAULT_SKIPPED_LIST_LIMIT,
};
pub use crash::{crash_filename, CrashDetails, CrashReporter, PersistError};
pub use device::{Device, Direction, Selector, LIKERS_FACEPILE, LIKES_COUNT};
pub use likers::{iterate_reactors, ListPlan};
pub use navigate::{open_reactor_list, Navigation};
pub use pace::{pause, DelayRange, Timings};
pub use policy::{InteractionContext, InteractionOutcome, InteractionPolicy, Percentages};
pub use rpc::{AgentClient, AgentSettings, RpcDevice, RpcInteraction};
pub use runner::{run_with_recovery, Attempt, JobContext, RecoveryPolicy};
pub use targets::load_targets;
pub use types::{
    CampaignReport, DeviceError, ListStop, ListSummary, SourceError, TargetOutcome, TargetReport,
};
