//! Post-auth router: the single navigation decision after a settled login.
//!
//! DESIGN
//! ======
//! The decision function runs only once stabilization reports
//! settled-authenticated AND the profile-existence query has reached a
//! terminal result. A query that is merely loading is never read as "no
//! profile"; that misreading would send existing users back through
//! onboarding. A monotonic one-shot gate is set synchronously before the
//! navigate call so a re-run of the driving effect with unchanged state can
//! never navigate twice.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::auth::flow::AuthSignals;
use crate::net::types::UserProfile;
use crate::state::attempt::AttemptPhase;
use crate::state::diagnostics::{AuthOutcome, AuthStep};
use crate::util::time::now_ms;

/// Navigation target computed once per attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// No backend profile yet: the user must complete onboarding.
    Onboarding,
    /// Profile exists but the celebration screen has not been seen.
    Summit,
    /// Profile exists and the celebration has been seen.
    Dashboard,
}

impl Destination {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Onboarding => "/onboarding",
            Self::Summit => "/summit",
            Self::Dashboard => "/dashboard",
        }
    }
}

/// Profile-existence query state. `Loading` is distinct from `Ready(None)`
/// so callers can never act on a not-yet-fetched result.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ProfileQuery {
    #[default]
    Loading,
    Ready(Option<UserProfile>),
    Failed(String),
}

impl ProfileQuery {
    /// Settled with a success or error, as opposed to still in flight.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// Compute the destination, or `None` when no routing may happen yet.
///
/// `Failed` is terminal but produces no destination; the downstream-error
/// path owns that surface.
#[must_use]
pub fn route_after_auth(
    is_settled: bool,
    is_authenticated: bool,
    profile: &ProfileQuery,
    summit_seen: bool,
) -> Option<Destination> {
    if !is_settled || !is_authenticated {
        return None;
    }
    match profile {
        ProfileQuery::Loading | ProfileQuery::Failed(_) => None,
        ProfileQuery::Ready(None) => Some(Destination::Onboarding),
        ProfileQuery::Ready(Some(_)) => {
            if summit_seen {
                Some(Destination::Dashboard)
            } else {
                Some(Destination::Summit)
            }
        }
    }
}

/// Monotonic navigated-once gate for one attempt.
#[derive(Clone, Copy, Debug, Default)]
pub struct NavigationGate {
    fired: bool,
}

impl NavigationGate {
    /// Claim the navigation. Returns `true` exactly once.
    pub fn try_fire(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

/// Install the effect that issues the single post-auth navigation.
///
/// Idempotent under repeated invocation: the gate is claimed synchronously
/// before `navigate` runs.
pub fn install_post_auth_router<F>(sig: AuthSignals, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let (is_settled, is_authenticated) = sig
            .stabilization
            .with(|s| (s.is_settled(), s.is_authenticated()));
        let profile = sig.profile.get();
        let summit_seen = crate::util::storage::summit_seen();

        let Some(destination) = route_after_auth(is_settled, is_authenticated, &profile, summit_seen)
        else {
            return;
        };

        // Claim the gate before navigating; a concurrent re-run sees it taken.
        let claimed = sig
            .nav_gate
            .try_update(NavigationGate::try_fire)
            .unwrap_or(false);
        if !claimed {
            return;
        }

        let now = now_ms();
        sig.phase.set(AttemptPhase::Redirecting);
        sig.flow.update(|f| {
            if f.correlation_id.is_some() {
                f.transition_step(AuthStep::Navigation, now, None);
                f.complete_attempt(AuthOutcome::Success, None, now);
            }
        });
        sig.attempt.update(crate::state::attempt::AttemptGuard::end_attempt);

        navigate(destination.path(), NavigateOptions::default());
    });
}
