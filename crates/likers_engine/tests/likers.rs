mod support;

use std::collections::HashSet;

use likers_core::{SessionLimits, SessionState, SourceFollowGate};
use likers_engine::{iterate_reactors, DelayRange, ListPlan, ListStop, Percentages};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use support::{init_logging, list_swipe, Call, FakeDevice, FakePolicy};

fn plan() -> ListPlan {
    ListPlan {
        percentages: Percentages {
            likes: 100,
            ..Percentages::default()
        },
        likes_count: 1,
        interactions_count: 100,
        skip_limit: 15,
        fling_threshold: 0,
        scroll_delay: DelayRange::ZERO,
    }
}

fn walk(
    device: &mut FakeDevice,
    policy: &mut FakePolicy,
    session: &mut SessionState,
    gate: &SourceFollowGate,
    plan: &ListPlan,
) -> likers_engine::ListSummary {
    let mut rng = StdRng::seed_from_u64(3);
    iterate_reactors(device, policy, session, &mut rng, gate, plan, &mut HashSet::new())
        .expect("list walk")
}

#[test]
fn list_ends_after_two_scrolls_without_new_users() {
    init_logging();
    let mut device = FakeDevice::new().with_pages(&[&["a", "b"], &["b", "c"], &["c"]]);
    let mut policy = FakePolicy::new();
    let mut session = SessionState::new(SessionLimits::default());
    let gate = SourceFollowGate::new("post_x", None);

    let summary = walk(&mut device, &mut policy, &mut session, &gate, &plan());

    assert_eq!(policy.usernames(), vec!["a", "b", "c"]);
    assert_eq!(summary.seen, 3);
    assert_eq!(summary.interacted, 3);
    assert_eq!(summary.stop, ListStop::Exhausted);
    // One scroll brought "c", two more brought nothing.
    assert_eq!(device.count(list_swipe), 3);
}

#[test]
fn own_account_is_never_handed_to_the_policy() {
    init_logging();
    let mut device = FakeDevice::new().with_pages(&[&["me", "a"]]);
    let mut policy = FakePolicy::new();
    let mut session = SessionState::new(SessionLimits::default()).with_username("me");
    let gate = SourceFollowGate::new("post_x", None);

    let summary = walk(&mut device, &mut policy, &mut session, &gate, &plan());

    assert_eq!(policy.usernames(), vec!["a"]);
    assert_eq!(summary.seen, 2);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn follow_gate_closes_once_cap_is_reached() {
    init_logging();
    let mut device = FakeDevice::new().with_pages(&[&["a", "b", "c"]]);
    let mut policy = FakePolicy::new();
    let mut session = SessionState::new(SessionLimits::default());
    let gate = SourceFollowGate::new("post_x", Some(1));

    walk(&mut device, &mut policy, &mut session, &gate, &plan());

    let can_follow: Vec<bool> = policy.seen().iter().map(|seen| seen.can_follow).collect();
    assert_eq!(can_follow, vec![true, false, false]);
    assert_eq!(session.follows_for_source("post_x"), 1);
}

#[test]
fn interactions_count_ends_the_source() {
    init_logging();
    let mut device = FakeDevice::new().with_pages(&[&["a", "b", "c"]]);
    let mut policy = FakePolicy::new();
    let mut session = SessionState::new(SessionLimits::default());
    let gate = SourceFollowGate::new("post_x", None);
    let plan = ListPlan {
        interactions_count: 2,
        ..plan()
    };

    let summary = walk(&mut device, &mut policy, &mut session, &gate, &plan);

    assert_eq!(policy.usernames(), vec!["a", "b"]);
    assert_eq!(summary.stop, ListStop::InteractionsCount);
}

#[test]
fn session_limit_stops_mid_list() {
    init_logging();
    let mut device = FakeDevice::new().with_pages(&[&["a", "b", "c"]]);
    let mut policy = FakePolicy::new();
    let mut session = SessionState::new(SessionLimits {
        total_interactions: Some(1),
        ..SessionLimits::default()
    });
    let gate = SourceFollowGate::new("post_x", None);

    let summary = walk(&mut device, &mut policy, &mut session, &gate, &plan());

    assert_eq!(policy.usernames(), vec!["a"]);
    assert_eq!(summary.stop, ListStop::SessionLimit);
}

#[test]
fn skipped_run_ends_the_list_when_fling_is_disabled() {
    init_logging();
    let mut device =
        FakeDevice::new().with_pages(&[&["skip1", "skip2", "skip3", "a"], &["b"]]);
    let mut policy = FakePolicy::new();
    let mut session = SessionState::new(SessionLimits::default());
    let gate = SourceFollowGate::new("post_x", None);
    let plan = ListPlan {
        skip_limit: 2,
        ..plan()
    };

    let summary = walk(&mut device, &mut policy, &mut session, &gate, &plan);

    assert_eq!(policy.usernames(), vec!["skip1", "skip2"]);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.stop, ListStop::SkipLimit);
}

#[test]
fn skipped_run_triggers_a_fling_when_enabled() {
    init_logging();
    let mut device = FakeDevice::new().with_pages(&[&["skip1", "skip2"], &["a"]]);
    let mut policy = FakePolicy::new();
    let mut session = SessionState::new(SessionLimits::default());
    let gate = SourceFollowGate::new("post_x", None);
    let plan = ListPlan {
        skip_limit: 2,
        fling_threshold: 1,
        ..plan()
    };

    let summary = walk(&mut device, &mut policy, &mut session, &gate, &plan);

    assert_eq!(policy.usernames(), vec!["skip1", "skip2", "a"]);
    assert_eq!(summary.stop, ListStop::Exhausted);
    assert_eq!(device.count(|call| matches!(call, Call::Fling(_))), 1);
}
