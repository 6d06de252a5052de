use super::*;

#[test]
fn popup_open_budget_fails_fast() {
    assert_eq!(step_budget_ms(AuthStep::PopupOpen), Some(1_000));
    assert_eq!(step_budget_ms(AuthStep::IdentityValidation), Some(2_000));
    assert_eq!(step_budget_ms(AuthStep::RbacBootstrap), Some(8_000));
    assert_eq!(step_budget_ms(AuthStep::Idle), None);
    assert_eq!(step_budget_ms(AuthStep::Success), None);
    // Navigation is synchronous client-side routing; it has no watchdog.
    assert_eq!(step_budget_ms(AuthStep::Navigation), None);
}

#[test]
fn timer_expiry_without_progress_flags_stall() {
    let mut detector = StallDetector::default();
    let arm = detector.arm(AuthStep::PopupOpen).unwrap();
    assert_eq!(arm.timeout_ms, 1_000);

    assert!(detector.on_timer(arm, ProviderStatus::LoggingIn, false));
    assert!(detector.state.is_stalled);
    assert!(detector.state.timeout_reached);
    assert_eq!(detector.state.stalled_step, Some(AuthStep::PopupOpen));
    assert_eq!(detector.state.configured_timeout_ms, 1_000);
    assert_eq!(
        detector.state.stalled_reason,
        Some(stall_reason(AuthStep::PopupOpen))
    );
}

#[test]
fn timer_after_identity_appears_is_ignored() {
    let mut detector = StallDetector::default();
    let arm = detector.arm(AuthStep::PopupOpen).unwrap();
    assert!(!detector.on_timer(arm, ProviderStatus::LoggingIn, true));
    assert!(!detector.state.is_stalled);
}

#[test]
fn timer_after_terminal_status_is_ignored() {
    let mut detector = StallDetector::default();
    let arm = detector.arm(AuthStep::IdentityValidation).unwrap();
    assert!(!detector.on_timer(arm, ProviderStatus::Success, false));
    assert!(!detector.on_timer(arm, ProviderStatus::LoginError, false));
    assert!(!detector.on_timer(arm, ProviderStatus::Idle, false));
    assert!(!detector.state.is_stalled);
}

#[test]
fn rearming_invalidates_prior_timer() {
    let mut detector = StallDetector::default();
    let first = detector.arm(AuthStep::PopupOpen).unwrap();
    let second = detector.arm(AuthStep::IdentityValidation).unwrap();

    // The popup-open timer fires late, after the step moved on.
    assert!(!detector.on_timer(first, ProviderStatus::LoggingIn, false));
    assert!(!detector.state.is_stalled);

    assert!(detector.on_timer(second, ProviderStatus::LoggingIn, false));
    assert_eq!(detector.state.stalled_step, Some(AuthStep::IdentityValidation));
}

#[test]
fn observe_clears_stall_on_terminal_signals() {
    let mut detector = StallDetector::default();
    let arm = detector.arm(AuthStep::PopupOpen).unwrap();
    detector.on_timer(arm, ProviderStatus::LoggingIn, false);
    assert!(detector.state.is_stalled);

    detector.observe(ProviderStatus::LoggingIn, true);
    assert_eq!(detector.state, StalledAuthState::default());
}

#[test]
fn observe_after_success_prevents_later_stall() {
    let mut detector = StallDetector::default();
    let arm = detector.arm(AuthStep::OnboardingCheck).unwrap();

    // Terminal success observed before the timer fires: epoch bumped,
    // the armed timer can never report a stall afterwards.
    detector.observe(ProviderStatus::Success, false);
    assert!(!detector.on_timer(arm, ProviderStatus::LoggingIn, false));
    assert!(!detector.state.is_stalled);
}

#[test]
fn disarm_discards_pending_timer() {
    let mut detector = StallDetector::default();
    let arm = detector.arm(AuthStep::ActorReady).unwrap();
    detector.disarm();
    assert!(!detector.on_timer(arm, ProviderStatus::LoggingIn, false));
}

#[test]
fn steps_without_budget_do_not_arm() {
    let mut detector = StallDetector::default();
    assert!(detector.arm(AuthStep::Success).is_none());
    assert!(detector.arm(AuthStep::Error).is_none());
}
