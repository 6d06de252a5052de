//! Identity and delegation validity checks.
//!
//! The provider vouches for a session with a time-bounded delegation that can
//! expire independently of the popup flow, and it can also hand back an
//! anonymous identity after a failed or replayed restoration. Neither is
//! usable for authenticated operations.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use serde::{Deserialize, Serialize};

/// Time-bounded credential proving the provider vouched for this session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Delegation {
    /// Expiry instant, epoch milliseconds.
    pub expires_at_ms: f64,
}

impl Delegation {
    #[must_use]
    pub fn is_valid(&self, now_ms: f64) -> bool {
        now_ms < self.expires_at_ms
    }
}

/// Identity exposed by the provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque principal identifier.
    pub principal: String,
    /// Anonymous principals are never valid authenticated identities.
    pub anonymous: bool,
    /// Present for delegation-backed identities; checked for expiry.
    pub delegation: Option<Delegation>,
}

/// Whether `identity` is usable for authenticated operations: present,
/// non-anonymous, and with an unexpired delegation where one exists.
#[must_use]
pub fn is_identity_valid(identity: Option<&Identity>, now_ms: f64) -> bool {
    let Some(identity) = identity else {
        return false;
    };
    if identity.anonymous {
        return false;
    }
    match &identity.delegation {
        Some(delegation) => delegation.is_valid(now_ms),
        None => true,
    }
}

/// A present-but-invalid identity is a stale session that needs a fresh
/// login. Absence of identity is not staleness.
#[must_use]
pub fn is_session_stale(identity: Option<&Identity>, now_ms: f64) -> bool {
    identity.is_some() && !is_identity_valid(identity, now_ms)
}
