//! Shared wire DTOs for the client/backend boundary.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// A caller's profile as returned by the backend.
///
/// Existence of a profile is what distinguishes a returning user from a
/// fresh signup; the routing layer treats `None` as "needs onboarding".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name chosen during onboarding.
    pub display_name: String,
    /// Profile creation instant, epoch milliseconds.
    pub created_at_ms: f64,
}
