use super::*;

#[test]
fn start_attempt_opens_click_step() {
    let mut flow = AuthFlow::default();
    let id = flow.start_attempt(None, 1_000.0);
    assert!(id.starts_with("auth-"));
    assert_eq!(flow.current_step, AuthStep::Click);
    assert_eq!(flow.steps.len(), 1);
    assert!(flow.steps[0].end_time.is_none());
    assert_eq!(flow.step_label(), "Starting...");
}

#[test]
fn transition_closes_previous_step_and_computes_duration() {
    let mut flow = AuthFlow::default();
    flow.start_attempt(None, 0.0);
    flow.transition_step(AuthStep::ProviderInitiation, 40.0, None);
    flow.transition_step(AuthStep::PopupOpen, 90.0, Some("popup".to_owned()));

    assert_eq!(flow.steps.len(), 3);
    assert_eq!(flow.steps[0].duration, Some(40.0));
    assert_eq!(flow.steps[1].duration, Some(50.0));
    assert_eq!(flow.steps[1].metadata.as_deref(), Some("popup"));

    // Exactly one open step at any time.
    let open = flow.steps.iter().filter(|s| s.end_time.is_none()).count();
    assert_eq!(open, 1);
    assert_eq!(flow.current_step, AuthStep::PopupOpen);
}

#[test]
fn transition_without_attempt_is_a_no_op() {
    let mut flow = AuthFlow::default();
    flow.transition_step(AuthStep::PopupOpen, 10.0, None);
    assert!(flow.steps.is_empty());
    assert_eq!(flow.current_step, AuthStep::Idle);
}

#[test]
fn slow_step_is_classified_against_threshold() {
    let mut flow = AuthFlow::default();
    flow.start_attempt(None, 0.0);
    flow.transition_step(AuthStep::IdentityValidation, 10.0, None);
    // Identity validation takes 2.5s against a 2s threshold.
    flow.transition_step(AuthStep::ActorReady, 2_510.0, None);

    assert_eq!(flow.slow_step, Some((AuthStep::IdentityValidation, 2_500.0)));
}

#[test]
fn fast_steps_are_not_flagged_slow() {
    let mut flow = AuthFlow::default();
    flow.start_attempt(None, 0.0);
    flow.transition_step(AuthStep::IdentityValidation, 10.0, None);
    flow.transition_step(AuthStep::ActorReady, 500.0, None);
    assert!(flow.slow_step.is_none());
}

#[test]
fn complete_attempt_closes_timeline_with_outcome() {
    let mut flow = AuthFlow::default();
    flow.start_attempt(None, 0.0);
    flow.transition_step(AuthStep::ProviderInitiation, 20.0, None);
    flow.complete_attempt(AuthOutcome::Success, None, 300.0);

    assert_eq!(flow.current_step, AuthStep::Success);
    assert_eq!(flow.outcome, Some(AuthOutcome::Success));
    assert!(flow.steps.iter().all(|s| s.end_time.is_some()));
    assert_eq!(flow.elapsed_ms(300.0), Some(300.0));
}

#[test]
fn error_outcome_carries_message() {
    let mut flow = AuthFlow::default();
    flow.start_attempt(None, 0.0);
    flow.complete_attempt(AuthOutcome::Error, Some("popup blocked".to_owned()), 1_000.0);
    assert_eq!(flow.current_step, AuthStep::Error);
    assert_eq!(flow.outcome_message.as_deref(), Some("popup blocked"));
}

#[test]
fn reset_returns_to_idle() {
    let mut flow = AuthFlow::default();
    flow.start_attempt(None, 0.0);
    flow.reset();
    assert_eq!(flow.current_step, AuthStep::Idle);
    assert!(flow.correlation_id.is_none());
    assert!(flow.steps.is_empty());
    assert_eq!(flow.elapsed_ms(10.0), None);
}
