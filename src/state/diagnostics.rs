//! Step-labeled timing recorder for one login attempt.
//!
//! Maps the auth pipeline into explicit step states with per-step timings,
//! correlation-id-prefixed logging, and slow-step classification against
//! configured thresholds. The step sequence is append-only within an attempt
//! and at most one step is ever open.

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod diagnostics_test;

use leptos::logging::{log, warn};

use crate::state::attempt::generate_correlation_id;

/// Fine-grained step of the auth pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStep {
    #[default]
    Idle,
    /// User gesture received.
    Click,
    /// Login call handed to the provider.
    ProviderInitiation,
    /// Waiting for the provider popup to produce a callback.
    PopupOpen,
    /// Provider callback received; completion being processed.
    ProviderCallback,
    /// Restored identity being validated (anonymity, delegation expiry).
    IdentityValidation,
    /// Backend connectivity being established.
    ActorReady,
    /// Permission bootstrap on the backend.
    RbacBootstrap,
    /// Profile-existence / account-status check.
    OnboardingCheck,
    /// Navigation issued.
    Navigation,
    Success,
    Error,
    Stalled,
}

impl AuthStep {
    /// Human-readable label for banner display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Click => "Starting...",
            Self::ProviderInitiation => "Opening identity provider...",
            Self::PopupOpen => "Waiting for authentication...",
            Self::ProviderCallback => "Processing authentication...",
            Self::IdentityValidation => "Validating identity...",
            Self::ActorReady => "Connecting to backend...",
            Self::RbacBootstrap => "Initializing permissions...",
            Self::OnboardingCheck => "Checking account status...",
            Self::Navigation => "Redirecting...",
            Self::Success => "Success!",
            Self::Error => "Error",
            Self::Stalled => "Stalled",
        }
    }

    /// Slow-step threshold, where one is configured.
    #[must_use]
    pub fn slow_threshold_ms(self) -> Option<f64> {
        match self {
            Self::IdentityValidation => Some(2_000.0),
            Self::ActorReady => Some(3_000.0),
            Self::RbacBootstrap | Self::OnboardingCheck => Some(5_000.0),
            _ => None,
        }
    }
}

/// Terminal outcome of one attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    Error,
    Stalled,
}

impl AuthOutcome {
    #[must_use]
    pub fn terminal_step(self) -> AuthStep {
        match self {
            Self::Success => AuthStep::Success,
            Self::Error => AuthStep::Error,
            Self::Stalled => AuthStep::Stalled,
        }
    }
}

/// One entry of the step timeline. At most one entry has no `end_time`.
#[derive(Clone, Debug, PartialEq)]
pub struct StepTiming {
    pub step: AuthStep,
    pub start_time: f64,
    pub end_time: Option<f64>,
    pub duration: Option<f64>,
    pub metadata: Option<String>,
}

/// Diagnostics recorder for the current attempt.
#[derive(Clone, Debug, Default)]
pub struct AuthFlow {
    pub correlation_id: Option<String>,
    pub current_step: AuthStep,
    pub start_time: Option<f64>,
    pub steps: Vec<StepTiming>,
    pub outcome: Option<AuthOutcome>,
    pub outcome_message: Option<String>,
    /// Slowest step that exceeded its threshold, with its duration.
    pub slow_step: Option<(AuthStep, f64)>,
}

impl AuthFlow {
    /// Begin recording a new attempt at `now_ms`. Returns the correlation id.
    pub fn start_attempt(&mut self, correlation_id: Option<String>, now_ms: f64) -> String {
        let correlation_id = correlation_id.unwrap_or_else(generate_correlation_id);
        *self = Self {
            correlation_id: Some(correlation_id.clone()),
            current_step: AuthStep::Click,
            start_time: Some(now_ms),
            steps: vec![StepTiming {
                step: AuthStep::Click,
                start_time: now_ms,
                end_time: None,
                duration: None,
                metadata: None,
            }],
            outcome: None,
            outcome_message: None,
            slow_step: None,
        };
        log!("[{correlation_id}] {}", AuthStep::Click.label());
        correlation_id
    }

    /// Close the open step and open `step` at `now_ms`.
    ///
    /// No-op when no attempt is active.
    pub fn transition_step(&mut self, step: AuthStep, now_ms: f64, metadata: Option<String>) {
        let Some(correlation_id) = self.correlation_id.clone() else {
            warn!("cannot transition auth step: no active attempt");
            return;
        };

        let duration = self.close_open_step(now_ms, metadata);
        if let (Some(duration), Some(threshold)) = (duration, self.current_step.slow_threshold_ms())
            && duration > threshold
        {
            warn!(
                "[{correlation_id}] slow step: {} took {duration}ms (threshold {threshold}ms)",
                self.current_step.label()
            );
            self.slow_step = Some((self.current_step, duration));
        }

        log!(
            "[{correlation_id}] {} -> {}{}",
            self.current_step.label(),
            step.label(),
            duration.map(|d| format!(" ({d}ms)")).unwrap_or_default()
        );

        self.steps.push(StepTiming {
            step,
            start_time: now_ms,
            end_time: None,
            duration: None,
            metadata: None,
        });
        self.current_step = step;
    }

    /// Close the attempt with a terminal outcome.
    pub fn complete_attempt(&mut self, outcome: AuthOutcome, message: Option<String>, now_ms: f64) {
        let Some(correlation_id) = self.correlation_id.clone() else {
            return;
        };
        self.close_open_step(now_ms, None);
        self.current_step = outcome.terminal_step();
        self.outcome = Some(outcome);
        self.outcome_message = message;

        let total = self.elapsed_ms(now_ms).unwrap_or(0.0);
        log!(
            "[{correlation_id}] terminal: {outcome:?} after {total}ms{}",
            self.outcome_message
                .as_deref()
                .map(|m| format!(" ({m})"))
                .unwrap_or_default()
        );
    }

    /// Reset to idle, dropping the timeline.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Total attempt time so far, or `None` when idle.
    #[must_use]
    pub fn elapsed_ms(&self, now_ms: f64) -> Option<f64> {
        self.start_time.map(|t| now_ms - t)
    }

    /// Label of the current step, for banner display.
    #[must_use]
    pub fn step_label(&self) -> &'static str {
        self.current_step.label()
    }

    fn close_open_step(&mut self, now_ms: f64, metadata: Option<String>) -> Option<f64> {
        let last = self.steps.last_mut()?;
        if last.end_time.is_some() {
            return None;
        }
        let duration = now_ms - last.start_time;
        last.end_time = Some(now_ms);
        last.duration = Some(duration);
        last.metadata = metadata;
        Some(duration)
    }
}
