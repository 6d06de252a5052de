//! Identity-provider popup bridge and session persistence.
//!
//! SYSTEM CONTEXT
//! ==============
//! The provider runs in a separate, cross-origin popup window and reports
//! completion by posting a message back to the opener. `begin_login` must
//! open the popup synchronously inside the user gesture or the browser's
//! popup policy blocks it; only the completion wait is asynchronous.
//!
//! The window message bus carries unrelated traffic (extensions, devtools),
//! so completion parsing first checks a source marker and silently ignores
//! anything else.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use serde::Deserialize;

use crate::auth::identity::Identity;
use crate::util::platform::PlatformInfo;

/// Entry point the popup (or redirect) is opened on.
pub const PROVIDER_LOGIN_URL: &str = "/auth/provider/start";
/// Source marker a genuine completion message must carry.
pub const COMPLETION_SOURCE: &str = "ridgeline-auth";
/// Storage key for the persisted provider session.
pub const SESSION_KEY: &str = "ridgeline_session";

/// How the provider is entered on this platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginMode {
    /// Detachable popup posting a completion message to the opener.
    Popup,
    /// Same-window redirect; completion is observed via the authorize
    /// fragment after the provider sends the user back.
    Redirect,
}

/// Pick the provider entry for the platform. Chrome on Android drops the
/// opener relationship, so the popup's completion message can never arrive
/// there.
#[must_use]
pub fn login_mode(platform: &PlatformInfo) -> LoginMode {
    if platform.same_window_redirect {
        LoginMode::Redirect
    } else {
        LoginMode::Popup
    }
}

/// Provider entry URL carrying the attempt binding the provider echoes back.
#[must_use]
pub fn login_url(correlation_id: &str) -> String {
    format!("{PROVIDER_LOGIN_URL}?attempt={correlation_id}")
}

#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    source: String,
    status: String,
    attempt: Option<String>,
    identity: Option<Identity>,
    message: Option<String>,
}

/// Interpret a window message as a provider completion for the attempt
/// identified by `expected_attempt`.
///
/// `None` means the message is unrelated traffic, or a completion for a
/// different attempt (a leftover listener from an earlier login); both must
/// be ignored. `Some(Err(_))` is a genuine provider failure.
#[must_use]
pub fn parse_completion(raw: &str, expected_attempt: &str) -> Option<Result<Identity, String>> {
    let envelope: CompletionEnvelope = serde_json::from_str(raw).ok()?;
    if envelope.source != COMPLETION_SOURCE {
        return None;
    }
    if envelope.attempt.as_deref() != Some(expected_attempt) {
        return None;
    }
    match envelope.status.as_str() {
        "success" => match envelope.identity {
            Some(identity) => Some(Ok(identity)),
            None => Some(Err("provider success without identity".to_owned())),
        },
        "error" => Some(Err(envelope
            .message
            .unwrap_or_else(|| "provider error".to_owned()))),
        _ => None,
    }
}

/// In-flight login whose completion can be awaited.
#[cfg(feature = "hydrate")]
pub struct LoginHandle {
    rx: futures::channel::oneshot::Receiver<Result<Identity, String>>,
}

#[cfg(feature = "hydrate")]
impl LoginHandle {
    /// Wait for the provider to report completion.
    ///
    /// # Errors
    ///
    /// Returns the provider's error message, or a synthetic one when the
    /// popup channel closed without reporting.
    pub async fn completion(self) -> Result<Identity, String> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err("provider window closed without completing".to_owned()),
        }
    }
}

/// Open the provider popup and install the completion listener.
///
/// Must be called synchronously from a user gesture.
///
/// # Errors
///
/// Returns an error string when the popup could not be opened (blocked by
/// the browser) or no window object exists.
#[cfg(feature = "hydrate")]
pub fn begin_login(correlation_id: &str) -> Result<LoginHandle, String> {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let window = web_sys::window().ok_or_else(|| "no window".to_owned())?;
    let popup = window
        .open_with_url_and_target(&login_url(correlation_id), "_blank")
        .map_err(|_| "popup blocked".to_owned())?;
    if popup.is_none() {
        return Err("popup blocked".to_owned());
    }

    let (tx, rx) = futures::channel::oneshot::channel();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let expected_attempt = correlation_id.to_owned();

    let on_message = Closure::<dyn FnMut(web_sys::MessageEvent)>::new({
        let tx = Rc::clone(&tx);
        move |event: web_sys::MessageEvent| {
            let Some(raw) = event.data().as_string() else {
                return;
            };
            // The attempt binding keeps a leaked listener from an earlier
            // attempt from swallowing a later attempt's completion.
            let Some(outcome) = parse_completion(&raw, &expected_attempt) else {
                return;
            };
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(outcome);
            }
        }
    });
    let _ = window.add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref());
    on_message.forget();

    Ok(LoginHandle { rx })
}

/// Leave for the provider through a same-window redirect.
///
/// The page unloads on success; state written before this call is gone with
/// it, except for the visit- and browser-scoped storage flags.
///
/// # Errors
///
/// Returns an error string when no window object exists or the navigation
/// was rejected.
#[cfg(feature = "hydrate")]
pub fn begin_login_redirect(correlation_id: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_owned())?;
    window
        .location()
        .set_href(&login_url(correlation_id))
        .map_err(|_| "redirect to identity provider failed".to_owned())
}

/// Persist the provider session for restoration on the next visit.
pub fn store_session(identity: &Option<Identity>) {
    #[cfg(feature = "hydrate")]
    {
        let Some(identity) = identity else {
            return;
        };
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        else {
            return;
        };
        let Ok(raw) = serde_json::to_string(identity) else {
            return;
        };
        let _ = storage.set_item(SESSION_KEY, &raw);
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = identity;
    }
}

/// Drop the persisted provider session.
pub fn clear_session() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.remove_item(SESSION_KEY);
        }
    }
}

/// Restore a previously persisted provider session, if any.
pub async fn restore_session() -> Option<Identity> {
    #[cfg(feature = "hydrate")]
    {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
        let raw = storage.get_item(SESSION_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}
