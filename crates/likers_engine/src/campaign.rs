use std::collections::HashSet;
use std::path::Path;

use campaign_logging::{campaign_error, campaign_info, set_current_source};
use likers_core::{
    extract_shortcode, resolve_or, CampaignState, LimitScope, LimitStatus, SessionState,
    SourceFollowGate, ValueSpec,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::likers::{iterate_reactors, ListPlan};
use crate::navigate::{open_reactor_list, Navigation};
use crate::pace::Timings;
use crate::policy::{InteractionPolicy, Percentages};
use crate::runner::{run_with_recovery, Attempt, JobContext, RecoveryPolicy};
use crate::targets::load_targets;
use crate::{CampaignReport, Device, DeviceError, SourceError, TargetOutcome, TargetReport};

pub const DEFAULT_SKIPPED_LIST_LIMIT: u32 = 15;
pub const DEFAULT_FLING_WHEN_SKIPPED: u32 = 0;
pub const DEFAULT_INTERACTIONS_COUNT: u32 = 70;
pub const DEFAULT_LIKES_COUNT: ValueSpec = ValueSpec::Range { low: 1, high: 2 };
pub const DEFAULT_LIKES_PERCENTAGE: u32 = 100;

/// Campaign knobs. Count-like values are resolved per target, so a range
/// such as `10-20` gives each post its own draw.
#[derive(Debug, Clone, Default)]
pub struct CampaignSettings {
    /// Follows allowed per source; unset falls back to the gate's default.
    pub follow_limit: Option<ValueSpec>,
    pub skipped_list_limit: Option<ValueSpec>,
    /// Non-zero enables flinging over runs of skipped users.
    pub fling_when_skipped: Option<ValueSpec>,
    /// Successful interactions per source.
    pub interactions_count: Option<ValueSpec>,
    pub likes_count: Option<ValueSpec>,
    pub likes_percentage: Option<ValueSpec>,
    pub follow_percentage: Option<ValueSpec>,
    pub stories_percentage: Option<ValueSpec>,
    pub comment_percentage: Option<ValueSpec>,
    pub pm_percentage: Option<ValueSpec>,
    pub timings: Timings,
    pub recovery: RecoveryPolicy,
}

/// Drives the whole campaign over the targets of one file.
pub struct Campaign {
    device: Box<dyn Device>,
    policy: Box<dyn InteractionPolicy>,
    session: SessionState,
    rng: StdRng,
    settings: CampaignSettings,
}

impl Campaign {
    pub fn new(
        device: Box<dyn Device>,
        policy: Box<dyn InteractionPolicy>,
        session: SessionState,
        rng: StdRng,
        settings: CampaignSettings,
    ) -> Self {
        Self {
            device,
            policy,
            session,
            rng,
            settings,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Process every target of the file in a random order until the list is
    /// consumed or a session limit stops the campaign.
    pub fn run(&mut self, targets_path: Option<&Path>) -> Result<CampaignReport, SourceError> {
        let mut targets = load_targets(targets_path).inspect_err(|err| {
            campaign_error!("{}", err);
        })?;
        campaign_info!("Found {} post links", targets.len());
        targets.shuffle(&mut self.rng);

        let mut report = CampaignReport::default();
        for target in targets {
            let limits = self.session.check_limits(LimitScope::All);

            campaign_info!("Handling post: {}", target);
            let shortcode = match extract_shortcode(&target) {
                Ok(shortcode) => shortcode,
                Err(err) => {
                    campaign_error!("Invalid Instagram URL: {}", err);
                    report.targets.push(TargetReport {
                        target,
                        outcome: TargetOutcome::InvalidTarget(err),
                        recoveries: 0,
                    });
                    continue;
                }
            };
            if limits.any_reached() {
                stop_on_limits(&mut report, limits);
                break;
            }

            let source = shortcode.source_name();
            set_current_source(Some(&source));
            let (outcome, recoveries, limits) = self.handle_target(&target, &source);
            campaign_info!("{}", outcome);
            set_current_source(None);

            report.targets.push(TargetReport {
                target,
                outcome,
                recoveries,
            });
            if let Some(limits) = limits {
                stop_on_limits(&mut report, limits);
                break;
            }
        }

        campaign_info!("Campaign finished after {} targets", report.targets.len());
        Ok(report)
    }

    /// Run the target's job until it completes, retrying after recovered
    /// failures. Limits are checked before every attempt.
    fn handle_target(
        &mut self,
        url: &str,
        source: &str,
    ) -> (TargetOutcome, u32, Option<LimitStatus>) {
        let (follow_cap, plan) = self.plan_target();
        let gate = SourceFollowGate::new(source, follow_cap);
        let timings = &self.settings.timings;
        let recovery = &self.settings.recovery;

        let mut state = CampaignState::new();
        let mut visited = HashSet::new();
        let mut outcome = TargetOutcome::Interrupted;
        let mut recoveries = 0;
        loop {
            if state.completed {
                return (outcome, recoveries, None);
            }
            let limits = self.session.check_limits(LimitScope::All);
            if limits.any_reached() {
                return (outcome, recoveries, Some(limits));
            }

            let policy = self.policy.as_mut();
            let mut ctx = JobContext {
                device: self.device.as_mut(),
                session: &mut self.session,
                rng: &mut self.rng,
            };
            let attempt = run_with_recovery(&mut ctx, recovery, source, |ctx| {
                let handled = handle_post(ctx, policy, url, &gate, &plan, timings, &mut visited)?;
                state.completed = true;
                Ok(handled)
            });
            match attempt {
                Attempt::Finished(handled) => outcome = handled,
                Attempt::Recovered(_) => recoveries += 1,
            }
        }
    }

    fn plan_target(&mut self) -> (Option<u32>, ListPlan) {
        let settings = &self.settings;
        let rng = &mut self.rng;
        let follow_cap = settings.follow_limit.map(|cap| cap.resolve(rng));
        let percentages = Percentages {
            likes: resolve_or(
                settings.likes_percentage.as_ref(),
                DEFAULT_LIKES_PERCENTAGE,
                rng,
            ),
            follow: resolve_or(settings.follow_percentage.as_ref(), 0, rng),
            stories: resolve_or(settings.stories_percentage.as_ref(), 0, rng),
            comment: resolve_or(settings.comment_percentage.as_ref(), 0, rng),
            pm: resolve_or(settings.pm_percentage.as_ref(), 0, rng),
        };
        let plan = ListPlan {
            percentages,
            likes_count: settings
                .likes_count
                .unwrap_or(DEFAULT_LIKES_COUNT)
                .resolve(rng),
            interactions_count: resolve_or(
                settings.interactions_count.as_ref(),
                DEFAULT_INTERACTIONS_COUNT,
                rng,
            ),
            skip_limit: resolve_or(
                settings.skipped_list_limit.as_ref(),
                DEFAULT_SKIPPED_LIST_LIMIT,
                rng,
            ),
            fling_threshold: resolve_or(
                settings.fling_when_skipped.as_ref(),
                DEFAULT_FLING_WHEN_SKIPPED,
                rng,
            ),
            scroll_delay: settings.timings.list_scroll,
        };
        (follow_cap, plan)
    }
}

fn handle_post(
    ctx: &mut JobContext<'_>,
    policy: &mut dyn InteractionPolicy,
    url: &str,
    gate: &SourceFollowGate,
    plan: &ListPlan,
    timings: &Timings,
    visited: &mut HashSet<String>,
) -> Result<TargetOutcome, DeviceError> {
    match open_reactor_list(ctx.device, ctx.rng, url, timings)? {
        Navigation::ListOpened => {}
        Navigation::PostNotOpened => {
            campaign_error!("Failed to navigate to post: {}", url);
            return Ok(TargetOutcome::NavigationFailed);
        }
        Navigation::ListControlMissing => {
            campaign_error!("Failed to open likers list!");
            return Ok(TargetOutcome::NavigationFailed);
        }
    }

    let summary = iterate_reactors(
        ctx.device,
        policy,
        ctx.session,
        ctx.rng,
        gate,
        plan,
        visited,
    )?;
    Ok(TargetOutcome::Completed(summary))
}

fn stop_on_limits(report: &mut CampaignReport, limits: LimitStatus) {
    campaign_info!("Limits reached for this session.");
    campaign_info!("Session limits: {}", limits.detail);
    report.limit_detail = Some(limits.detail);
}
