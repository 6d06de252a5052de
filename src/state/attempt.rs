//! Attempt guard: re-entrancy lock and metadata for one login attempt.
//!
//! DESIGN
//! ======
//! Exactly one attempt may be active process-wide. The guard owns the lock,
//! the attempt start timestamp, and the correlation id. It deliberately does
//! NOT own the page-visit-scoped
//! "user initiated auth" storage flag (`crate::util::storage`): that flag must
//! survive `end_attempt` so a late provider callback can still be attributed
//! to a real user gesture.

#[cfg(test)]
#[path = "attempt_test.rs"]
mod attempt_test;

/// Coarse phase of the active attempt, for button labels and gating.
///
/// Lives in its own signal rather than inside [`AttemptGuard`]: a terminal
/// `Error` phase must remain visible after the guard has been unlocked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttemptPhase {
    /// No attempt in flight.
    #[default]
    Idle,
    /// Login call issued; waiting on the provider popup.
    Connecting,
    /// Provider returned; validating the restored identity.
    Validating,
    /// Valid identity; waiting on the backend profile-existence check.
    CheckingAccess,
    /// Destination computed; navigation issued.
    Redirecting,
    /// Terminal error; retriable.
    Error,
}

/// Re-entrancy lock plus metadata for the single in-flight login attempt.
#[derive(Clone, Debug, Default)]
pub struct AttemptGuard {
    locked: bool,
    correlation_id: Option<String>,
    started_at: Option<f64>,
}

impl AttemptGuard {
    /// Try to start a new attempt at `now_ms`.
    ///
    /// Returns `false` and changes nothing when an attempt is already locked.
    /// A caller-supplied correlation id is stored as-is; otherwise a fresh
    /// one is generated.
    pub fn start_attempt(&mut self, correlation_id: Option<String>, now_ms: f64) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        self.started_at = Some(now_ms);
        self.correlation_id = Some(correlation_id.unwrap_or_else(generate_correlation_id));
        true
    }

    /// Unconditionally unlock and clear attempt metadata.
    pub fn end_attempt(&mut self) {
        self.locked = false;
        self.correlation_id = None;
        self.started_at = None;
    }

    /// Identical to [`Self::end_attempt`], safe from error-recovery paths even
    /// when no attempt is believed active.
    pub fn force_reset(&mut self) {
        self.end_attempt();
    }

    /// Milliseconds since the attempt started, or `None` when idle.
    #[must_use]
    pub fn elapsed_ms(&self, now_ms: f64) -> Option<f64> {
        self.started_at.map(|t| now_ms - t)
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<f64> {
        self.started_at
    }
}

/// Generate an opaque, unique correlation id for one attempt.
#[must_use]
pub fn generate_correlation_id() -> String {
    format!("auth-{}", uuid::Uuid::new_v4())
}
