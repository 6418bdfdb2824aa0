use likers_core::{SourceFollowGate, DEFAULT_SOURCE_FOLLOW_LIMIT};

#[test]
fn unset_cap_falls_back_to_default() {
    let gate = SourceFollowGate::new("post_abc", None);
    assert_eq!(DEFAULT_SOURCE_FOLLOW_LIMIT, 15);
    assert_eq!(gate.effective_cap(), 15);
    assert!(!gate.is_reached(14));
    assert!(gate.is_reached(15));
}

#[test]
fn configured_cap_is_inclusive() {
    let gate = SourceFollowGate::new("post_abc", Some(5));
    assert_eq!(gate.source(), "post_abc");
    assert!(!gate.is_reached(4));
    assert!(gate.is_reached(5));
    assert!(gate.is_reached(6));
}

#[test]
fn zero_cap_blocks_every_follow() {
    let gate = SourceFollowGate::new("post_abc", Some(0));
    assert!(gate.is_reached(0));
}
