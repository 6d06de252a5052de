//! Stabilization tracker: settles the provider's flickering identity signal.
//!
//! DESIGN
//! ======
//! Restoring a delegation from storage after a cross-window provider redirect
//! is measurably slower than reading an identity that was never serialized, so
//! the settle window is longer when there is evidence of a provider return
//! (authorize fragment in the URL, or the visit-scoped user-initiated flag).
//!
//! Once `SettledAuthenticated` is reached the phase is monotonic: a momentary
//! loss of identity from unrelated provider bookkeeping must not flap routes.
//! The unauthenticated-to-authenticated direction stays open for late-arriving
//! identity. This asymmetry is a deliberate product decision.
//!
//! The tracker is the sole writer of this state; route guards, the callback
//! handler, and the init gate are read-only observers.

#[cfg(test)]
#[path = "stabilization_test.rs"]
mod stabilization_test;

use leptos::logging::warn;

/// Settle window when evidence suggests a return from the provider.
pub const SETTLE_WINDOW_RETURN_MS: u32 = 1_500;
/// Settle window for a cold start with no return evidence.
pub const SETTLE_WINDOW_COLD_MS: u32 = 300;

/// Phase of the process-wide stabilization machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StabilizationPhase {
    /// Provider has not finished initializing yet.
    #[default]
    Initializing,
    /// Initialization complete; waiting out the settle window.
    Settling,
    /// Committed: a valid, non-anonymous identity is present.
    SettledAuthenticated,
    /// Committed: no usable identity at settle time.
    SettledUnauthenticated,
}

/// Request to arm the settle timer, returned when settling begins.
///
/// The `epoch` must be passed back to [`Stabilization::on_settle_timer`] so a
/// timer that fires after the machine has moved on is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettleArm {
    pub window_ms: u32,
    pub epoch: u64,
}

/// Process-wide provider settle status. Created at application start and
/// never destroyed except on full reload.
#[derive(Clone, Debug)]
pub struct Stabilization {
    phase: StabilizationPhase,
    phase_started_at: f64,
    epoch: u64,
}

impl Stabilization {
    #[must_use]
    pub fn new(now_ms: f64) -> Self {
        Self {
            phase: StabilizationPhase::Initializing,
            phase_started_at: now_ms,
            epoch: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> StabilizationPhase {
        self.phase
    }

    #[must_use]
    pub fn phase_started_at(&self) -> f64 {
        self.phase_started_at
    }

    /// Phase is one of the two settled states.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(
            self.phase,
            StabilizationPhase::SettledAuthenticated | StabilizationPhase::SettledUnauthenticated
        )
    }

    /// Settled with a valid identity.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase == StabilizationPhase::SettledAuthenticated
    }

    /// Why routing is still blocked, for UI/diagnostic consumption.
    /// `None` once settled.
    #[must_use]
    pub fn blocking_reason(&self) -> Option<&'static str> {
        match self.phase {
            StabilizationPhase::Initializing => Some("waiting for identity provider initialization"),
            StabilizationPhase::Settling => Some("waiting for identity restoration to settle"),
            _ => None,
        }
    }

    /// The provider reported initialization complete.
    ///
    /// Fires `Initializing -> Settling` and picks the settle window from the
    /// return evidence. Returns the timer arm request, or `None` when the
    /// machine is not in `Initializing` (duplicate signal).
    pub fn on_init_complete(&mut self, now_ms: f64, return_evidence: bool) -> Option<SettleArm> {
        if self.phase != StabilizationPhase::Initializing {
            return None;
        }
        self.phase = StabilizationPhase::Settling;
        self.phase_started_at = now_ms;
        self.epoch += 1;
        let window_ms = if return_evidence {
            SETTLE_WINDOW_RETURN_MS
        } else {
            SETTLE_WINDOW_COLD_MS
        };
        Some(SettleArm {
            window_ms,
            epoch: self.epoch,
        })
    }

    /// A valid, non-anonymous identity appeared.
    ///
    /// During `Settling` this commits `SettledAuthenticated` immediately; the
    /// user does not wait out the window once the answer is known. From
    /// `SettledUnauthenticated` it performs the permitted late-arrival upgrade.
    /// Returns `true` when the phase changed.
    pub fn on_identity_valid(&mut self, now_ms: f64) -> bool {
        match self.phase {
            StabilizationPhase::Settling | StabilizationPhase::SettledUnauthenticated => {
                self.phase = StabilizationPhase::SettledAuthenticated;
                self.phase_started_at = now_ms;
                self.epoch += 1;
                true
            }
            _ => false,
        }
    }

    /// The identity disappeared or became invalid.
    ///
    /// Suppressed after `SettledAuthenticated`: the loss is logged and the
    /// phase kept, preventing flicker-driven re-routing.
    pub fn on_identity_lost(&mut self) {
        if self.phase == StabilizationPhase::SettledAuthenticated {
            warn!("stabilization: identity lost after settled-authenticated; keeping phase");
        }
    }

    /// The settle timer fired. Ignored unless `epoch` matches the arm epoch
    /// and the machine is still settling; otherwise commits from the identity
    /// validity at this instant. Returns `true` when a commit happened.
    pub fn on_settle_timer(&mut self, epoch: u64, now_ms: f64, identity_valid: bool) -> bool {
        if epoch != self.epoch || self.phase != StabilizationPhase::Settling {
            return false;
        }
        self.phase = if identity_valid {
            StabilizationPhase::SettledAuthenticated
        } else {
            StabilizationPhase::SettledUnauthenticated
        };
        self.phase_started_at = now_ms;
        self.epoch += 1;
        true
    }
}

impl Default for Stabilization {
    fn default() -> Self {
        Self::new(0.0)
    }
}
