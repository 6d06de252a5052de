//! Login page: the single entry point for an auth attempt.
//!
//! The sign-in button reflects the coarse attempt phase, a stall panel
//! surfaces watchdog guidance, and a downstream-check failure gets its own
//! retry that re-runs only the backend check, never the popup.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::auth::flow::AuthSignals;
use crate::auth::router::ProfileQuery;
use crate::state::attempt::AttemptPhase;

/// Button label for the coarse attempt phase.
#[must_use]
pub fn button_label(phase: AttemptPhase) -> &'static str {
    match phase {
        AttemptPhase::Idle | AttemptPhase::Error => "Sign in",
        AttemptPhase::Connecting => "Connecting...",
        AttemptPhase::Validating => "Validating...",
        AttemptPhase::CheckingAccess => "Checking account...",
        AttemptPhase::Redirecting => "Redirecting...",
    }
}

/// Whether an attempt is in flight and the button must be disabled.
#[must_use]
pub fn is_processing(phase: AttemptPhase) -> bool {
    !matches!(phase, AttemptPhase::Idle | AttemptPhase::Error)
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let sig = expect_context::<AuthSignals>();

    let on_sign_in = move |_| {
        #[cfg(feature = "hydrate")]
        crate::auth::flow::start_login(sig);
    };

    let on_retry_check = move |_| {
        #[cfg(feature = "hydrate")]
        {
            sig.error_message.set(None);
            sig.phase.set(AttemptPhase::Validating);
            leptos::task::spawn_local(async move {
                crate::auth::flow::run_post_auth(sig).await;
            });
        }
    };

    let check_failed = move || matches!(sig.profile.get(), ProfileQuery::Failed(_));
    let stalled = move || sig.stall.with(|s| s.state.clone());

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Ridgeline"</h1>
                <p class="login-card__subtitle">"Small steps, every day."</p>
                <button
                    class="login-button"
                    disabled=move || is_processing(sig.phase.get())
                    on:click=on_sign_in
                >
                    {move || button_label(sig.phase.get())}
                </button>
                <Show when=move || is_processing(sig.phase.get())>
                    <p class="login-status">{move || sig.flow.with(|f| f.step_label())}</p>
                </Show>
                <Show when=move || sig.error_message.get().is_some() && !check_failed()>
                    <p class="login-message login-message--error">
                        {move || sig.error_message.get().unwrap_or_default()}
                    </p>
                </Show>
                <Show when=check_failed>
                    <div class="login-message login-message--error">
                        <p>{move || sig.error_message.get().unwrap_or_default()}</p>
                        <button class="login-button login-button--secondary" on:click=on_retry_check>
                            "Retry check"
                        </button>
                    </div>
                </Show>
                <Show when=move || stalled().is_stalled>
                    <div class="login-message login-message--stalled">
                        <p>{move || stalled().stalled_reason.unwrap_or_default()}</p>
                        <p class="login-message__hint">
                            "You can close this tab and try again, or reload the page."
                        </p>
                    </div>
                </Show>
            </div>
        </div>
    }
}
