//! Initialization gate: blocks the authenticated app shell until the
//! provider settles, with a deterministic timeout and a distinct
//! stale-session surface.
//!
//! The gate is monotonic: once `Ready`, later signal flicker cannot pull the
//! shell back down. The timeout covers the entire blocking period regardless
//! of which condition is blocking.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use crate::auth::identity::{Identity, is_identity_valid};

/// Whole-gate timeout before surfacing the timeout error.
pub const GATE_TIMEOUT_MS: u32 = 15_000;

pub const GATE_LOADING_MESSAGE: &str = "Validating identity";
pub const GATE_TIMEOUT_ERROR_MESSAGE: &str = "Authentication is taking longer than expected. \
    This might be due to a network issue or an expired session. Please try reloading the page.";
pub const GATE_STALE_SESSION_ERROR_MESSAGE: &str =
    "Your session has expired or is invalid. Please log in again to continue.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Loading,
    Ready,
    TimeoutError,
    StaleSessionError,
}

/// Recompute the gate from the settled auth signals.
///
/// `Ready` and the error states are sticky; error states are only left via
/// their explicit retry paths (reload / clear-and-restart).
#[must_use]
pub fn evaluate_gate(
    current: GateState,
    is_settled: bool,
    identity: Option<&Identity>,
    now_ms: f64,
) -> GateState {
    if current != GateState::Loading {
        return current;
    }
    if !is_settled {
        return GateState::Loading;
    }
    // Settled with an identity object that is anonymous or expired: the
    // restored session is stale and must be cleared, not routed on.
    if identity.is_some() && !is_identity_valid(identity, now_ms) {
        return GateState::StaleSessionError;
    }
    GateState::Ready
}

/// The whole-gate timer expired. Only a still-loading gate times out.
#[must_use]
pub fn gate_timeout(current: GateState) -> GateState {
    if current == GateState::Loading {
        GateState::TimeoutError
    } else {
        current
    }
}
