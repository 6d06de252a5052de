//! Login flow orchestration.
//!
//! SYSTEM CONTEXT
//! ==============
//! One user gesture runs the whole pipeline: lock the attempt guard, start
//! diagnostics and the stall watchdog, open the provider popup synchronously
//! (the popup must be opened inside the gesture, before any await), then
//! reconcile the asynchronous completion with identity validation and the
//! backend profile check. Every terminal path (success, provider error,
//! stall, downstream-check error, cancellation) unlocks the guard and makes
//! all pending timers stale.
//!
//! ERROR HANDLING
//! ==============
//! Raw provider errors are remapped to user-friendly copy (cancelled /
//! network / timeout / generic). A downstream profile-check failure is a
//! separate, recoverable surface whose retry re-runs only the check, never
//! the popup.

#[cfg(test)]
#[path = "flow_test.rs"]
mod flow_test;

use leptos::prelude::*;

use crate::auth::router::{NavigationGate, ProfileQuery};
use crate::state::attempt::{AttemptGuard, AttemptPhase};
use crate::state::auth::AuthState;
use crate::state::diagnostics::AuthFlow;
use crate::state::gate::GateState;
use crate::state::stabilization::Stabilization;
use crate::state::stall::StallDetector;

#[cfg(feature = "hydrate")]
use crate::auth::identity::is_identity_valid;
#[cfg(feature = "hydrate")]
use crate::net::provider;
#[cfg(feature = "hydrate")]
use crate::state::auth::ProviderStatus;
#[cfg(feature = "hydrate")]
use crate::state::diagnostics::{AuthOutcome, AuthStep};
#[cfg(feature = "hydrate")]
use crate::util::time::now_ms;

pub const LOGIN_CANCELLED_MESSAGE: &str =
    "Login was cancelled. Please try again when you're ready.";
pub const POPUP_BLOCKED_MESSAGE: &str =
    "The sign-in popup was blocked. Please allow popups and try again.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";
pub const LOGIN_TIMEOUT_MESSAGE: &str = "Login timed out. Please try again.";
pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your session has expired. Please sign in again.";
pub const GENERIC_LOGIN_ERROR_MESSAGE: &str =
    "Unable to connect to the identity provider. Please try again.";

/// Remap a raw provider error to user-facing copy.
///
/// Returns `None` for errors that should not be surfaced at all
/// ("already authenticated" is handled by clearing the stale session).
#[must_use]
pub fn login_error_message(raw: &str) -> Option<&'static str> {
    let lower = raw.to_lowercase();
    if lower.contains("already authenticated") {
        return None;
    }
    if lower.contains("interrupt") || lower.contains("cancel") {
        return Some(LOGIN_CANCELLED_MESSAGE);
    }
    if lower.contains("popup") || lower.contains("blocked") {
        return Some(POPUP_BLOCKED_MESSAGE);
    }
    if lower.contains("expired") {
        return Some(SESSION_EXPIRED_MESSAGE);
    }
    if lower.contains("network") || lower.contains("fetch") {
        return Some(NETWORK_ERROR_MESSAGE);
    }
    if lower.contains("timeout") {
        return Some(LOGIN_TIMEOUT_MESSAGE);
    }
    Some(GENERIC_LOGIN_ERROR_MESSAGE)
}

/// Message for a profile-check failure after a valid identity was obtained.
#[must_use]
pub fn downstream_check_error_message(raw: &str) -> String {
    format!(
        "Failed to check your account status: {raw}. Please try again or return to the landing page."
    )
}

/// The shared signal bundle for the auth engine, provided once as context.
///
/// `RwSignal` is `Copy`, so the bundle is passed by value into closures and
/// timers. Write ownership per field is documented in `crate::state`.
#[derive(Clone, Copy)]
pub struct AuthSignals {
    /// Raw provider signals. Written by the flow and the provider bridge.
    pub auth: RwSignal<AuthState>,
    /// Re-entrancy lock. Written by the flow and the router.
    pub attempt: RwSignal<AttemptGuard>,
    /// Coarse attempt phase for UI labels.
    pub phase: RwSignal<AttemptPhase>,
    /// Settle machine. Written only by the stabilization driver.
    pub stabilization: RwSignal<Stabilization>,
    /// Stall watchdog. Written only by the stall arm sites.
    pub stall: RwSignal<StallDetector>,
    /// Step diagnostics for the current attempt.
    pub flow: RwSignal<AuthFlow>,
    /// Profile-existence query state.
    pub profile: RwSignal<ProfileQuery>,
    /// Navigated-once gate, reset per attempt.
    pub nav_gate: RwSignal<NavigationGate>,
    /// Blur/visibility evidence that the popup actually opened.
    pub popup_opened: RwSignal<bool>,
    /// Initialization gate for the app shell.
    pub gate: RwSignal<GateState>,
    /// Attempt-scoped error message for the UI.
    pub error_message: RwSignal<Option<String>>,
}

impl AuthSignals {
    #[must_use]
    pub fn new() -> Self {
        Self {
            auth: RwSignal::new(AuthState::default()),
            attempt: RwSignal::new(AttemptGuard::default()),
            phase: RwSignal::new(AttemptPhase::Idle),
            stabilization: RwSignal::new(Stabilization::default()),
            stall: RwSignal::new(StallDetector::default()),
            flow: RwSignal::new(AuthFlow::default()),
            profile: RwSignal::new(ProfileQuery::Loading),
            nav_gate: RwSignal::new(NavigationGate::default()),
            popup_opened: RwSignal::new(false),
            gate: RwSignal::new(GateState::Loading),
            error_message: RwSignal::new(None),
        }
    }
}

impl Default for AuthSignals {
    fn default() -> Self {
        Self::new()
    }
}

/// Start a login attempt from a user gesture.
///
/// Rejected silently when an attempt is already in flight. The provider popup
/// is opened synchronously, before this function returns, to preserve the
/// user gesture for the browser's popup policy.
#[cfg(feature = "hydrate")]
pub fn start_login(sig: AuthSignals) {
    let now = now_ms();
    let started = sig
        .attempt
        .try_update(|a| a.start_attempt(None, now))
        .unwrap_or(false);
    if !started {
        return;
    }
    let Some(correlation_id) = sig
        .attempt
        .with_untracked(|a| a.correlation_id().map(str::to_owned))
    else {
        return;
    };

    // Visit-scoped, survives end_attempt: a later asynchronous callback can
    // still be attributed to this gesture.
    crate::util::storage::set_user_initiated_auth();

    sig.error_message.set(None);
    sig.phase.set(AttemptPhase::Connecting);
    sig.popup_opened.set(false);
    sig.nav_gate.set(NavigationGate::default());
    sig.auth.update(|a| {
        a.login_error = None;
        a.provider_status = ProviderStatus::LoggingIn;
    });
    sig.flow.update(|f| {
        f.start_attempt(Some(correlation_id.clone()), now);
        f.transition_step(AuthStep::ProviderInitiation, now, None);
    });

    // Platforms without a detachable popup leave through a same-window
    // redirect; the session comes back via the authorize fragment and the
    // background profile driver finishes routing on return.
    let platform = crate::util::platform::current_platform();
    if provider::login_mode(&platform) == provider::LoginMode::Redirect {
        if let Err(raw) = provider::begin_login_redirect(&correlation_id) {
            fail_attempt(sig, &raw);
        }
        return;
    }

    arm_stall(sig, AuthStep::ProviderInitiation);
    crate::auth::popup::watch_popup_open(sig);

    // Synchronous popup open inside the gesture.
    let handle = match provider::begin_login(&correlation_id) {
        Ok(handle) => handle,
        Err(raw) => {
            fail_attempt(sig, &raw);
            return;
        }
    };

    sig.flow
        .update(|f| f.transition_step(AuthStep::PopupOpen, now_ms(), None));
    arm_stall(sig, AuthStep::PopupOpen);

    leptos::task::spawn_local(async move {
        let outcome = handle.completion().await;
        // A completion landing after this attempt was stalled out or
        // cancelled must not restart the pipeline.
        let still_current = sig.attempt.with_untracked(|a| {
            a.is_locked() && a.correlation_id() == Some(correlation_id.as_str())
        });
        if !still_current {
            leptos::logging::warn!("ignoring provider completion for an ended attempt");
            return;
        }
        match outcome {
            Ok(identity) => {
                sig.auth.update(|a| {
                    a.identity = Some(identity);
                    a.provider_status = ProviderStatus::Success;
                });
                sig.stall
                    .update(|s| s.observe(ProviderStatus::Success, true));
                provider::store_session(&sig.auth.with_untracked(|a| a.identity.clone()));
                run_post_auth(sig).await;
            }
            Err(raw) => fail_attempt(sig, &raw),
        }
    });
}

/// Validate the settled identity, then run the profile-existence check.
///
/// Public so the downstream-error retry path can re-run it without
/// re-invoking the login popup.
#[cfg(feature = "hydrate")]
pub async fn run_post_auth(sig: AuthSignals) {
    let now = now_ms();
    sig.phase.set(AttemptPhase::Validating);
    sig.flow.update(|f| {
        f.transition_step(AuthStep::ProviderCallback, now, None);
        f.transition_step(AuthStep::IdentityValidation, now, None);
    });
    arm_stall(sig, AuthStep::IdentityValidation);

    let identity = sig.auth.with_untracked(|a| a.identity.clone());
    if !is_identity_valid(identity.as_ref(), now_ms()) {
        fail_attempt(sig, "session expired");
        return;
    }
    sig.stabilization.update(|s| {
        s.on_identity_valid(now_ms());
    });

    sig.phase.set(AttemptPhase::CheckingAccess);
    sig.flow.update(|f| {
        f.transition_step(AuthStep::ActorReady, now_ms(), None);
        f.transition_step(AuthStep::OnboardingCheck, now_ms(), None);
    });
    arm_stall(sig, AuthStep::OnboardingCheck);

    sig.profile.set(ProfileQuery::Loading);
    match crate::net::api::fetch_caller_profile().await {
        Ok(profile) => {
            sig.stall.update(|s| s.observe(ProviderStatus::Success, true));
            sig.profile.set(ProfileQuery::Ready(profile));
            // The post-auth router effect issues the navigation.
        }
        Err(raw) => {
            sig.profile.set(ProfileQuery::Failed(raw.clone()));
            sig.stall.update(|s| s.disarm());
            sig.error_message
                .set(Some(downstream_check_error_message(&raw)));
            sig.phase.set(AttemptPhase::Error);
            sig.flow.update(|f| {
                f.complete_attempt(
                    AuthOutcome::Error,
                    Some(downstream_check_error_message(&raw)),
                    now_ms(),
                );
            });
            sig.attempt.update(AttemptGuard::force_reset);
        }
    }
}

/// Terminal provider-error path: remap, surface, unlock, disarm.
#[cfg(feature = "hydrate")]
pub fn fail_attempt(sig: AuthSignals, raw: &str) {
    let now = now_ms();
    let message = login_error_message(raw);

    sig.auth.update(|a| {
        a.provider_status = ProviderStatus::LoginError;
        a.login_error = Some(raw.to_owned());
    });
    sig.stall
        .update(|s| s.observe(ProviderStatus::LoginError, false));

    match message {
        Some(message) => {
            sig.error_message.set(Some(message.to_owned()));
            sig.phase.set(AttemptPhase::Error);
            sig.flow.update(|f| {
                f.complete_attempt(AuthOutcome::Error, Some(message.to_owned()), now);
            });
        }
        None => {
            // "already authenticated": clear the stale session instead of
            // alarming the user.
            provider::clear_session();
            sig.auth.update(|a| a.identity = None);
            sig.phase.set(AttemptPhase::Idle);
            sig.flow.update(AuthFlow::reset);
        }
    }
    sig.attempt.update(AttemptGuard::force_reset);
}

/// User cancellation (popup closed without completing): back to idle, no
/// error surface.
#[cfg(feature = "hydrate")]
pub fn cancel_attempt(sig: AuthSignals) {
    sig.auth.update(|a| {
        a.provider_status = ProviderStatus::Idle;
        a.login_error = None;
    });
    sig.stall.update(|s| s.observe(ProviderStatus::Idle, false));
    sig.error_message.set(None);
    sig.phase.set(AttemptPhase::Idle);
    sig.flow.update(AuthFlow::reset);
    sig.attempt.update(AttemptGuard::force_reset);
}

/// (Re)arm the stall watchdog for `step` and spawn its timer.
#[cfg(feature = "hydrate")]
pub fn arm_stall(sig: AuthSignals, step: AuthStep) {
    let Some(arm) = sig.stall.try_update(|s| s.arm(step)).flatten() else {
        return;
    };
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(arm.timeout_ms)))
            .await;
        let (status, has_identity) = sig
            .auth
            .with_untracked(|a| (a.provider_status, a.has_identity()));
        let stalled = sig
            .stall
            .try_update(|s| s.on_timer(arm, status, has_identity))
            .unwrap_or(false);
        if stalled {
            let reason = crate::state::stall::stall_reason(arm.step);
            leptos::logging::warn!("auth stalled at {:?}: {reason}", arm.step);
            sig.flow.update(|f| {
                f.complete_attempt(AuthOutcome::Stalled, Some(reason.to_owned()), now_ms());
            });
            sig.phase.set(AttemptPhase::Idle);
            sig.attempt.update(AttemptGuard::force_reset);
        }
    });
}

/// Drive the stabilization machine from the raw provider signals.
///
/// `return_evidence` is captured once at startup, before the authorize
/// marker is consumed from the URL.
#[cfg(feature = "hydrate")]
pub fn install_stabilization_driver(sig: AuthSignals, return_evidence: bool) {
    Effect::new(move || {
        let auth = sig.auth.get();
        let now = now_ms();

        if auth.provider_status != ProviderStatus::Initializing {
            let arm = sig
                .stabilization
                .try_update(|s| s.on_init_complete(now, return_evidence))
                .flatten();
            if let Some(arm) = arm {
                leptos::task::spawn_local(async move {
                    gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(
                        arm.window_ms,
                    )))
                    .await;
                    let valid = sig
                        .auth
                        .with_untracked(|a| is_identity_valid(a.identity.as_ref(), now_ms()));
                    sig.stabilization.update(|s| {
                        s.on_settle_timer(arm.epoch, now_ms(), valid);
                    });
                });
            }
        }

        if is_identity_valid(auth.identity.as_ref(), now) {
            let changes = sig.stabilization.with_untracked(|s| !s.is_authenticated());
            if changes {
                sig.stabilization.update(|s| {
                    s.on_identity_valid(now);
                });
            }
        } else if sig.stabilization.with_untracked(Stabilization::is_authenticated) {
            sig.stabilization.update(Stabilization::on_identity_lost);
        }
    });
}

/// Whether the background profile driver should start a fetch: the session
/// has settled authenticated without a click-initiated attempt owning the
/// pipeline (restored session, same-window provider return), and the query
/// has not been run yet.
#[must_use]
pub fn should_fetch_profile(
    is_authenticated: bool,
    attempt_locked: bool,
    profile: &ProfileQuery,
) -> bool {
    is_authenticated && !attempt_locked && matches!(profile, ProfileQuery::Loading)
}

/// Drive the profile-existence query for sessions that did not come from a
/// click-initiated attempt, so the post-auth router can fire for them too.
#[cfg(feature = "hydrate")]
pub fn install_profile_driver(sig: AuthSignals) {
    let fetching = StoredValue::new(false);
    Effect::new(move || {
        let is_authenticated = sig.stabilization.with(Stabilization::is_authenticated);
        let locked = sig.attempt.with(AttemptGuard::is_locked);
        let start = sig
            .profile
            .with(|p| should_fetch_profile(is_authenticated, locked, p));
        if !start || fetching.get_value() {
            return;
        }
        fetching.set_value(true);
        leptos::task::spawn_local(async move {
            let outcome = crate::net::api::fetch_caller_profile().await;
            fetching.set_value(false);
            match outcome {
                Ok(profile) => sig.profile.set(ProfileQuery::Ready(profile)),
                Err(raw) => {
                    sig.error_message
                        .set(Some(downstream_check_error_message(&raw)));
                    sig.profile.set(ProfileQuery::Failed(raw));
                }
            }
        });
    });
}

/// Drive the initialization gate: whole-gate timeout plus settled evaluation.
#[cfg(feature = "hydrate")]
pub fn install_gate_driver(sig: AuthSignals) {
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(
            crate::state::gate::GATE_TIMEOUT_MS,
        )))
        .await;
        sig.gate.update(|g| *g = crate::state::gate::gate_timeout(*g));
    });

    Effect::new(move || {
        let is_settled = sig.stabilization.with(Stabilization::is_settled);
        let auth = sig.auth.get();
        let next = crate::state::gate::evaluate_gate(
            sig.gate.get_untracked(),
            is_settled,
            auth.identity.as_ref(),
            now_ms(),
        );
        if next != sig.gate.get_untracked() {
            sig.gate.set(next);
        }
    });
}

/// Restore any persisted provider session, then report init complete.
#[cfg(feature = "hydrate")]
pub fn restore_provider_session(sig: AuthSignals) {
    leptos::task::spawn_local(async move {
        let restored = provider::restore_session().await;
        sig.auth.update(|a| {
            a.identity = restored;
            a.provider_status = ProviderStatus::Idle;
        });
    });
}

/// Clear a stale restored session outside the user-gesture path.
#[cfg(feature = "hydrate")]
pub fn sweep_stale_session(sig: AuthSignals) {
    let now = now_ms();
    let stale = sig.auth.with_untracked(|a| {
        crate::auth::identity::is_session_stale(a.identity.as_ref(), now)
    });
    if stale && sig.phase.get_untracked() == AttemptPhase::Idle {
        leptos::logging::warn!("clearing stale restored session");
        provider::clear_session();
        sig.auth.update(|a| a.identity = None);
    }
}
