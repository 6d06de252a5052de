//! Detection of an in-progress return from the identity provider.
//!
//! The provider writes a single-use `authorize=` marker into the URL fragment
//! when redirecting back. The marker is consumed exactly once (read and
//! clear) so unrelated re-renders cannot re-trigger routing; evidence checks
//! on the raw hash are read-only.
//!
//! The second evidence source is the page-visit-scoped "user initiated auth"
//! flag: the authenticating popup and the returning tab are different
//! execution contexts that only share browser storage.

#[cfg(test)]
#[path = "return_detection_test.rs"]
mod return_detection_test;

/// Fragment key written by the provider on return.
const AUTHORIZE_MARKER: &str = "authorize=";

/// Read-only check: does `hash` carry the provider's authorize marker?
#[must_use]
pub fn hash_carries_authorize(hash: &str) -> bool {
    !hash.is_empty() && hash.contains(AUTHORIZE_MARKER)
}

/// Extract the marker's value from a fragment like `#authorize=xyz&k=v`.
#[must_use]
pub fn authorize_value(hash: &str) -> Option<&str> {
    let start = hash.find(AUTHORIZE_MARKER)? + AUTHORIZE_MARKER.len();
    let rest = &hash[start..];
    let end = rest.find('&').unwrap_or(rest.len());
    let value = &rest[..end];
    if value.is_empty() { None } else { Some(value) }
}

/// Combined return evidence: authorize marker in the fragment, or the
/// visit-scoped user-initiated-auth flag.
#[must_use]
pub fn has_return_evidence(hash: &str, user_initiated_auth: bool) -> bool {
    hash_carries_authorize(hash) || user_initiated_auth
}

/// Descriptive reason for the evidence, for diagnostic logging.
#[must_use]
pub fn return_evidence_reason(hash: &str, user_initiated_auth: bool) -> Option<&'static str> {
    if hash_carries_authorize(hash) {
        Some("authorize callback in URL fragment")
    } else if user_initiated_auth {
        Some("user-initiated auth visit flag")
    } else {
        None
    }
}

/// Consume the authorize marker from the current URL: returns its value and
/// clears the fragment so the marker is observed exactly once.
#[cfg(feature = "hydrate")]
pub fn consume_authorize_marker() -> Option<String> {
    let window = web_sys::window()?;
    let location = window.location();
    let hash = location.hash().ok()?;
    let value = authorize_value(&hash)?.to_owned();
    if location.set_hash("").is_err() {
        leptos::logging::warn!("return detection: failed to clear authorize fragment");
    }
    Some(value)
}
