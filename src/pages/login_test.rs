use super::{button_label, is_processing};
use crate::state::attempt::AttemptPhase;

#[test]
fn idle_and_error_offer_sign_in() {
    assert_eq!(button_label(AttemptPhase::Idle), "Sign in");
    assert_eq!(button_label(AttemptPhase::Error), "Sign in");
    assert!(!is_processing(AttemptPhase::Idle));
    assert!(!is_processing(AttemptPhase::Error));
}

#[test]
fn in_flight_phases_disable_the_button() {
    for phase in [
        AttemptPhase::Connecting,
        AttemptPhase::Validating,
        AttemptPhase::CheckingAccess,
        AttemptPhase::Redirecting,
    ] {
        assert!(is_processing(phase), "{phase:?} should disable the button");
        assert_ne!(button_label(phase), "Sign in");
    }
}
