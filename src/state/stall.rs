//! Stall detector: per-step watchdog for the auth pipeline.
//!
//! DESIGN
//! ======
//! A single global timeout cannot distinguish "popup blocked instantly" from
//! "slow backend check eight seconds in". Each step gets its own budget so the
//! UI fails fast on the most common failure (a blocked popup) while tolerating
//! legitimately slow downstream steps.
//!
//! The watchdog timer is re-armed on every step change; `arm` hands back an
//! epoch the timer callback must echo so a timer that fires after the step
//! has moved on is discarded.

#[cfg(test)]
#[path = "stall_test.rs"]
mod stall_test;

use crate::state::auth::ProviderStatus;
use crate::state::diagnostics::AuthStep;

/// Budget for each step, where one applies. Terminal and idle steps have none.
#[must_use]
pub fn step_budget_ms(step: AuthStep) -> Option<u32> {
    match step {
        AuthStep::ProviderInitiation => Some(1_500),
        AuthStep::PopupOpen => Some(1_000),
        AuthStep::ProviderCallback | AuthStep::IdentityValidation => Some(2_000),
        AuthStep::ActorReady | AuthStep::OnboardingCheck => Some(5_000),
        AuthStep::RbacBootstrap => Some(8_000),
        _ => None,
    }
}

/// Fixed per-step guidance shown when that step stalls.
#[must_use]
pub fn stall_reason(step: AuthStep) -> &'static str {
    match step {
        AuthStep::ProviderInitiation => "The identity provider did not respond to the login request.",
        AuthStep::PopupOpen => {
            "The sign-in popup may have been blocked. Allow popups for this site and try again."
        }
        AuthStep::ProviderCallback => "The identity provider opened but never completed sign-in.",
        AuthStep::IdentityValidation => "Your identity could not be validated in time.",
        AuthStep::ActorReady => "The backend is taking too long to respond.",
        AuthStep::RbacBootstrap => "Permission setup is taking too long.",
        AuthStep::OnboardingCheck => "The account-status check is taking too long.",
        _ => "Authentication is taking longer than expected.",
    }
}

/// Derived stalled-attempt state, recomputed from raw provider signals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StalledAuthState {
    pub is_stalled: bool,
    pub timeout_reached: bool,
    pub stalled_step: Option<AuthStep>,
    pub configured_timeout_ms: u32,
    pub stalled_reason: Option<&'static str>,
}

/// Arm request returned by [`StallDetector::arm`]; the watchdog timer echoes
/// the epoch back on expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StallArm {
    pub step: AuthStep,
    pub timeout_ms: u32,
    pub epoch: u64,
}

/// Watchdog over the in-flight attempt's current step.
#[derive(Clone, Debug, Default)]
pub struct StallDetector {
    pub state: StalledAuthState,
    epoch: u64,
}

impl StallDetector {
    /// (Re)arm the watchdog for `step`. Any previously armed timer becomes
    /// stale. Returns `None` when the step has no budget.
    pub fn arm(&mut self, step: AuthStep) -> Option<StallArm> {
        self.epoch += 1;
        let timeout_ms = step_budget_ms(step)?;
        Some(StallArm {
            step,
            timeout_ms,
            epoch: self.epoch,
        })
    }

    /// Disarm without re-arming; pending timers become stale.
    pub fn disarm(&mut self) {
        self.epoch += 1;
    }

    /// The watchdog timer fired. Flags a stall only when the arm is current
    /// and the raw signals still show no forward progress.
    pub fn on_timer(
        &mut self,
        arm: StallArm,
        status: ProviderStatus,
        identity_present: bool,
    ) -> bool {
        if arm.epoch != self.epoch {
            return false;
        }
        if identity_present || status.is_terminal() || status == ProviderStatus::Idle {
            return false;
        }
        self.state = StalledAuthState {
            is_stalled: true,
            timeout_reached: true,
            stalled_step: Some(arm.step),
            configured_timeout_ms: arm.timeout_ms,
            stalled_reason: Some(stall_reason(arm.step)),
        };
        true
    }

    /// Recompute from the raw signals. Clears the stalled flag the moment a
    /// terminal state is observed: identity present, provider error, provider
    /// success, or status back to idle.
    pub fn observe(&mut self, status: ProviderStatus, identity_present: bool) {
        if identity_present || status.is_terminal() || status == ProviderStatus::Idle {
            if self.state.is_stalled {
                self.state = StalledAuthState::default();
            }
            self.epoch += 1;
        }
    }
}
