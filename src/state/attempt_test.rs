use super::*;

#[test]
fn start_attempt_locks_and_records_metadata() {
    let mut guard = AttemptGuard::default();
    assert!(guard.start_attempt(None, 1_000.0));
    assert!(guard.is_locked());
    assert_eq!(guard.started_at(), Some(1_000.0));
    assert!(guard.correlation_id().is_some());
}

#[test]
fn second_start_is_rejected_until_end_attempt() {
    let mut guard = AttemptGuard::default();
    assert!(guard.start_attempt(None, 0.0));
    let first_id = guard.correlation_id().map(str::to_owned);

    // Re-entrant start: rejected, no state change.
    assert!(!guard.start_attempt(Some("auth-other".to_owned()), 50.0));
    assert_eq!(guard.correlation_id().map(str::to_owned), first_id);
    assert_eq!(guard.started_at(), Some(0.0));

    guard.end_attempt();
    assert!(guard.start_attempt(None, 100.0));
}

#[test]
fn explicit_correlation_id_is_kept() {
    let mut guard = AttemptGuard::default();
    assert!(guard.start_attempt(Some("auth-fixed".to_owned()), 0.0));
    assert_eq!(guard.correlation_id(), Some("auth-fixed"));
}

#[test]
fn end_attempt_clears_everything() {
    let mut guard = AttemptGuard::default();
    guard.start_attempt(None, 10.0);
    guard.end_attempt();

    assert!(!guard.is_locked());
    assert!(guard.correlation_id().is_none());
    assert!(guard.started_at().is_none());
}

#[test]
fn force_reset_is_safe_when_idle() {
    let mut guard = AttemptGuard::default();
    guard.force_reset();
    assert!(!guard.is_locked());
    assert!(guard.start_attempt(None, 0.0));
    guard.force_reset();
    assert!(!guard.is_locked());
}

#[test]
fn elapsed_ms_tracks_attempt_lifetime() {
    let mut guard = AttemptGuard::default();
    assert_eq!(guard.elapsed_ms(500.0), None);
    guard.start_attempt(None, 500.0);
    assert_eq!(guard.elapsed_ms(1_750.0), Some(1_250.0));
    guard.end_attempt();
    assert_eq!(guard.elapsed_ms(2_000.0), None);
}

#[test]
fn correlation_ids_are_unique_per_attempt() {
    let a = generate_correlation_id();
    let b = generate_correlation_id();
    assert_ne!(a, b);
    assert!(a.starts_with("auth-"));
}
