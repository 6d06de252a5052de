//! Raw identity-provider signals.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the unfiltered view of the provider: its lifecycle status, the
//! identity it currently exposes (possibly anonymous or expired), and the last
//! raw login error. Nothing here is safe to route on directly; the
//! stabilization tracker in `state::stabilization` converts these flickering
//! signals into one settled outcome.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::auth::identity::Identity;

/// Identity-provider lifecycle status, as reported by the provider itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderStatus {
    /// The provider client is still restoring a prior session from storage.
    #[default]
    Initializing,
    /// Initialized, no login in flight.
    Idle,
    /// A login call is in flight; the popup may or may not be open.
    LoggingIn,
    /// The login call completed successfully.
    Success,
    /// The login call reported an error.
    LoginError,
}

impl ProviderStatus {
    /// True for states in which no further provider callback is expected.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::LoginError)
    }
}

/// Raw provider-facing auth state. Written by the login flow and the provider
/// bridge; read by every watchdog.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    /// Identity currently exposed by the provider, if any.
    pub identity: Option<Identity>,
    /// Provider lifecycle status.
    pub provider_status: ProviderStatus,
    /// Last raw error string from the login call.
    pub login_error: Option<String>,
}

impl AuthState {
    /// Whether the provider exposes any identity object at all, valid or not.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        self.identity.is_some()
    }
}
