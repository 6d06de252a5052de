//! Browser storage flags for the auth flow.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two flags with deliberately different lifetimes:
//!
//! * the user-initiated-auth flag lives in `sessionStorage`, scoped to the
//!   visit, and deliberately survives the end of an attempt so a late
//!   asynchronous provider callback can still be attributed to a gesture;
//! * the summit-seen marker lives in `localStorage` and persists across
//!   visits, recording that the post-signup celebration was shown once.

/// Visit-scoped flag: a login gesture happened this visit.
pub const USER_INITIATED_AUTH_KEY: &str = "ridgeline_user_initiated_auth";
/// Durable marker: the post-signup celebration page was already shown.
pub const SUMMIT_SEEN_KEY: &str = "ridgeline_summit_seen";

#[cfg(feature = "hydrate")]
fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.session_storage().ok().flatten())
}

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Record that the current visit contains a login gesture.
pub fn set_user_initiated_auth() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = session_storage() {
            let _ = storage.set_item(USER_INITIATED_AUTH_KEY, "true");
        }
    }
}

/// Whether a login gesture happened this visit.
#[must_use]
pub fn user_initiated_auth() -> bool {
    #[cfg(feature = "hydrate")]
    {
        session_storage()
            .and_then(|s| s.get_item(USER_INITIATED_AUTH_KEY).ok().flatten())
            .as_deref()
            == Some("true")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

/// Mark the celebration page as shown. Idempotent.
pub fn mark_summit_seen() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(SUMMIT_SEEN_KEY, "true");
        }
    }
}

/// Whether the celebration page was already shown on this browser.
/// Only an explicit `"true"` counts; an absent or foreign value does not.
#[must_use]
pub fn summit_seen() -> bool {
    #[cfg(feature = "hydrate")]
    {
        local_storage()
            .and_then(|s| s.get_item(SUMMIT_SEEN_KEY).ok().flatten())
            .as_deref()
            == Some("true")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

/// Drop all client-side auth flags. Used by the session reset path.
pub fn clear_client_session() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = session_storage() {
            let _ = storage.remove_item(USER_INITIATED_AUTH_KEY);
        }
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(SUMMIT_SEEN_KEY);
        }
    }
}
