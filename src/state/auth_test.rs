use super::*;

#[test]
fn terminal_statuses() {
    assert!(ProviderStatus::Success.is_terminal());
    assert!(ProviderStatus::LoginError.is_terminal());
    assert!(!ProviderStatus::Initializing.is_terminal());
    assert!(!ProviderStatus::Idle.is_terminal());
    assert!(!ProviderStatus::LoggingIn.is_terminal());
}

#[test]
fn default_state_has_no_identity() {
    let state = AuthState::default();
    assert!(!state.has_identity());
    assert_eq!(state.provider_status, ProviderStatus::Initializing);
    assert!(state.login_error.is_none());
}
