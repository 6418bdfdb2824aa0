use std::collections::HashSet;

use campaign_logging::{campaign_debug, campaign_info};
use likers_core::{LimitScope, ListExhaustion, SessionState, SourceFollowGate};
use rand::Rng;

use crate::device::Direction;
use crate::pace::{pause, DelayRange};
use crate::policy::{InteractionContext, InteractionOutcome, InteractionPolicy, Percentages};
use crate::{Device, DeviceError, ListStop, ListSummary};

const LIST_SCROLL_SCALE: f32 = 0.6;

/// Per-target knobs for walking a reactor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPlan {
    pub percentages: Percentages,
    pub likes_count: u32,
    /// Successful interactions after which the source is considered done.
    pub interactions_count: u32,
    pub skip_limit: u32,
    pub fling_threshold: u32,
    pub scroll_delay: DelayRange,
}

/// Walk the open reactor list, handing each newly rendered user to `policy`,
/// until the list is exhausted or a source or session limit stops it.
///
/// `handled` holds the users already given to the policy for this source. It
/// outlives a single attempt, so a walk resumed after a crash skips them.
pub fn iterate_reactors<R: Rng + ?Sized>(
    device: &mut dyn Device,
    policy: &mut dyn InteractionPolicy,
    session: &mut SessionState,
    rng: &mut R,
    gate: &SourceFollowGate,
    plan: &ListPlan,
    handled: &mut HashSet<String>,
) -> Result<ListSummary, DeviceError> {
    let source = gate.source();
    let mut detector = ListExhaustion::for_reactor_list(plan.skip_limit, plan.fling_threshold);
    let mut seen: HashSet<String> = HashSet::new();
    let mut summary = ListSummary {
        seen: 0,
        interacted: 0,
        skipped: 0,
        stop: ListStop::Exhausted,
    };
    let mut scrolled = false;

    loop {
        let fresh: Vec<String> = device
            .visible_entries()?
            .into_iter()
            .filter(|user| seen.insert(user.clone()))
            .collect();
        if scrolled && detector.record_scroll(fresh.len()) {
            campaign_info!("Reached the end of the likers list.");
            return Ok(summary);
        }

        for username in fresh {
            summary.seen += 1;
            if session.my_username() == Some(username.as_str()) {
                campaign_debug!("Skipping own account");
                detector.notify_skipped();
                summary.skipped += 1;
            } else if !handled.insert(username.clone()) {
                campaign_debug!("@{} was already handled for this source", username);
                detector.notify_skipped();
                summary.skipped += 1;
            } else {
                let ctx = InteractionContext {
                    source,
                    percentages: plan.percentages,
                    likes_count: plan.likes_count,
                    can_follow: !gate.is_reached(session.follows_for_source(source)),
                };
                match policy.interact(device, &username, &ctx, session)? {
                    InteractionOutcome::Skipped => {
                        detector.notify_skipped();
                        summary.skipped += 1;
                    }
                    InteractionOutcome::Acted(_) | InteractionOutcome::Failed => {
                        detector.notify_processed();
                        summary.interacted += 1;
                    }
                }

                if session.successful_for_source(source) >= plan.interactions_count {
                    campaign_info!(
                        "{} successful interactions reached for this source.",
                        plan.interactions_count
                    );
                    summary.stop = ListStop::InteractionsCount;
                    return Ok(summary);
                }
                if session.check_limits(LimitScope::All).any_reached() {
                    summary.stop = ListStop::SessionLimit;
                    return Ok(summary);
                }
            }

            if detector.is_skip_limit_reached() {
                campaign_info!("Skipped list limit reached, moving to next source.");
                summary.stop = ListStop::SkipLimit;
                return Ok(summary);
            }
        }

        if detector.take_fling() {
            campaign_info!("Flinging over already seen users.");
            device.fling(Direction::Up)?;
        } else {
            device.swipe(Direction::Up, LIST_SCROLL_SCALE)?;
        }
        scrolled = true;
        pause(rng, plan.scroll_delay);
    }
}
