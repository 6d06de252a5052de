use super::*;

#[test]
fn starts_initializing_with_blocking_reason() {
    let stab = Stabilization::new(0.0);
    assert_eq!(stab.phase(), StabilizationPhase::Initializing);
    assert!(!stab.is_settled());
    assert!(stab.blocking_reason().is_some());
}

#[test]
fn init_complete_picks_short_window_without_return_evidence() {
    let mut stab = Stabilization::new(0.0);
    let arm = stab.on_init_complete(10.0, false).unwrap();
    assert_eq!(arm.window_ms, SETTLE_WINDOW_COLD_MS);
    assert_eq!(stab.phase(), StabilizationPhase::Settling);
    assert!(stab.blocking_reason().is_some());
}

#[test]
fn init_complete_picks_long_window_with_return_evidence() {
    let mut stab = Stabilization::new(0.0);
    let arm = stab.on_init_complete(10.0, true).unwrap();
    assert_eq!(arm.window_ms, SETTLE_WINDOW_RETURN_MS);
}

#[test]
fn duplicate_init_complete_is_ignored() {
    let mut stab = Stabilization::new(0.0);
    assert!(stab.on_init_complete(10.0, false).is_some());
    assert!(stab.on_init_complete(20.0, true).is_none());
}

#[test]
fn identity_during_settling_commits_before_timer() {
    let mut stab = Stabilization::new(0.0);
    let arm = stab.on_init_complete(0.0, false).unwrap();

    // Identity appears 100ms in, well inside the 300ms window.
    assert!(stab.on_identity_valid(100.0));
    assert_eq!(stab.phase(), StabilizationPhase::SettledAuthenticated);
    assert!(stab.phase_started_at() < f64::from(arm.window_ms));

    // The original timer is now stale and must not recommit.
    assert!(!stab.on_settle_timer(arm.epoch, 300.0, false));
    assert_eq!(stab.phase(), StabilizationPhase::SettledAuthenticated);
}

#[test]
fn timer_expiry_commits_unauthenticated_without_identity() {
    let mut stab = Stabilization::new(0.0);
    let arm = stab.on_init_complete(0.0, false).unwrap();
    assert!(stab.on_settle_timer(arm.epoch, 300.0, false));
    assert_eq!(stab.phase(), StabilizationPhase::SettledUnauthenticated);
    assert!(stab.is_settled());
    assert!(!stab.is_authenticated());
    assert!(stab.blocking_reason().is_none());
}

#[test]
fn timer_expiry_commits_authenticated_with_identity() {
    let mut stab = Stabilization::new(0.0);
    let arm = stab.on_init_complete(0.0, true).unwrap();
    assert!(stab.on_settle_timer(arm.epoch, 1_500.0, true));
    assert!(stab.is_authenticated());
}

#[test]
fn late_identity_upgrades_unauthenticated() {
    let mut stab = Stabilization::new(0.0);
    let arm = stab.on_init_complete(0.0, false).unwrap();
    stab.on_settle_timer(arm.epoch, 300.0, false);
    assert_eq!(stab.phase(), StabilizationPhase::SettledUnauthenticated);

    assert!(stab.on_identity_valid(900.0));
    assert_eq!(stab.phase(), StabilizationPhase::SettledAuthenticated);
}

#[test]
fn authenticated_phase_never_regresses() {
    let mut stab = Stabilization::new(0.0);
    let arm = stab.on_init_complete(0.0, false).unwrap();
    stab.on_identity_valid(50.0);

    stab.on_identity_lost();
    assert_eq!(stab.phase(), StabilizationPhase::SettledAuthenticated);

    // A stale timer firing with no identity must not demote either.
    assert!(!stab.on_settle_timer(arm.epoch, 400.0, false));
    assert_eq!(stab.phase(), StabilizationPhase::SettledAuthenticated);

    // Further identity arrivals are no-ops.
    assert!(!stab.on_identity_valid(500.0));
}

#[test]
fn stale_epoch_timer_is_ignored() {
    let mut stab = Stabilization::new(0.0);
    let first = stab.on_init_complete(0.0, false).unwrap();
    // Identity commits and bumps the epoch.
    stab.on_identity_valid(10.0);
    assert!(!stab.on_settle_timer(first.epoch, 300.0, false));
}
