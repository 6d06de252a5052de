//! Popup lifecycle heuristics.
//!
//! The identity provider popup is cross-origin, so its state cannot be
//! inspected directly. Three window-level signals substitute:
//!
//! * `blur` or `visibilitychange` while a login is in flight means the popup
//!   actually opened and took focus.
//! * No such signal within the grace period means the popup was blocked.
//! * `focus` returning while the login is still in flight and no identity has
//!   arrived means the user closed the popup without completing sign-in.
//!
//! Platforms where the provider redirects in the same window instead of
//! opening a popup never blur, so the heuristics are disabled there.

#[cfg(test)]
#[path = "popup_test.rs"]
mod popup_test;

use crate::state::auth::ProviderStatus;
use crate::util::platform::PlatformInfo;

#[cfg(feature = "hydrate")]
use crate::auth::flow::AuthSignals;

/// How long a blur/visibility signal is awaited before declaring the popup
/// blocked.
pub const POPUP_OPEN_GRACE_MS: u32 = 1_000;
/// Focus return is debounced before cancelling: provider callbacks can land
/// just after focus.
pub const FOCUS_CANCEL_DEBOUNCE_MS: u32 = 500;

/// Whether the popup heuristics apply on this platform.
#[must_use]
pub fn heuristics_enabled(platform: &PlatformInfo) -> bool {
    !platform.same_window_redirect
}

/// Grace period elapsed. Declares the popup blocked only when the login is
/// still in flight and no open evidence arrived.
#[must_use]
pub fn popup_blocked_verdict(popup_opened: bool, status: ProviderStatus) -> bool {
    !popup_opened && status == ProviderStatus::LoggingIn
}

/// Focus returned, debounce elapsed. Cancels only when the popup demonstrably
/// opened, the login is still in flight, and no identity has arrived.
#[must_use]
pub fn focus_cancel_verdict(
    popup_opened: bool,
    status: ProviderStatus,
    identity_present: bool,
) -> bool {
    popup_opened && status == ProviderStatus::LoggingIn && !identity_present
}

/// Arm the blocked-popup grace timer for the attempt just started.
#[cfg(feature = "hydrate")]
pub fn watch_popup_open(sig: AuthSignals) {
    if !heuristics_enabled(&crate::util::platform::current_platform()) {
        return;
    }
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(
            POPUP_OPEN_GRACE_MS,
        )))
        .await;
        let opened = sig.popup_opened.get_untracked();
        let status = sig.auth.with_untracked(|a| a.provider_status);
        if popup_blocked_verdict(opened, status) {
            crate::auth::flow::fail_attempt(sig, "popup blocked");
        }
    });
}

/// Install the window-level blur/visibility/focus listeners. Called once at
/// application start; the closures are leaked intentionally since they live
/// for the page lifetime.
#[cfg(feature = "hydrate")]
pub fn install_popup_watch(sig: AuthSignals) {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    if !heuristics_enabled(&crate::util::platform::current_platform()) {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };

    let on_blur = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
        if sig.auth.with_untracked(|a| a.provider_status) == ProviderStatus::LoggingIn {
            sig.popup_opened.set(true);
        }
    });
    let _ = window
        .add_event_listener_with_callback("blur", on_blur.as_ref().unchecked_ref());
    on_blur.forget();

    if let Some(document) = window.document() {
        let on_visibility = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
            let hidden = web_sys::window()
                .and_then(|w| w.document())
                .is_some_and(|d| d.hidden());
            if hidden && sig.auth.with_untracked(|a| a.provider_status) == ProviderStatus::LoggingIn
            {
                sig.popup_opened.set(true);
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", on_visibility.as_ref().unchecked_ref());
        on_visibility.forget();
    }

    let on_focus = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
        let opened = sig.popup_opened.get_untracked();
        let status = sig.auth.with_untracked(|a| a.provider_status);
        if !focus_cancel_verdict(opened, status, sig.auth.with_untracked(|a| a.has_identity())) {
            return;
        }
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(
                FOCUS_CANCEL_DEBOUNCE_MS,
            )))
            .await;
            let opened = sig.popup_opened.get_untracked();
            let (status, has_identity) = sig
                .auth
                .with_untracked(|a| (a.provider_status, a.has_identity()));
            if focus_cancel_verdict(opened, status, has_identity) {
                leptos::logging::log!("popup closed without completion; cancelling attempt");
                crate::auth::flow::cancel_attempt(sig);
            }
        });
    });
    let _ = window
        .add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref());
    on_focus.forget();
}
