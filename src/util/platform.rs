//! Platform detection for provider flow selection.
//!
//! Chrome on Android does not keep the opener relationship across the
//! provider popup, so the provider falls back to a same-window redirect
//! there. The popup heuristics (blur/focus/visibility) are meaningless for a
//! same-window flow and must be switched off.

#[cfg(test)]
#[path = "platform_test.rs"]
mod platform_test;

/// Traits of the current browser that affect the login flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlatformInfo {
    /// Provider redirects in the current window instead of a popup.
    pub same_window_redirect: bool,
}

/// Classify a user-agent string.
#[must_use]
pub fn detect_platform(user_agent: &str) -> PlatformInfo {
    let ua = user_agent.to_lowercase();
    let chrome_android = ua.contains("android")
        && ua.contains("chrome/")
        && !ua.contains("firefox")
        && !ua.contains("edg/");
    PlatformInfo {
        same_window_redirect: chrome_android,
    }
}

/// Platform of the running browser. Defaults to popup-capable outside the
/// browser.
#[must_use]
pub fn current_platform() -> PlatformInfo {
    #[cfg(feature = "hydrate")]
    {
        let ua = web_sys::window()
            .map(|w| w.navigator().user_agent().unwrap_or_default())
            .unwrap_or_default();
        detect_platform(&ua)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        PlatformInfo::default()
    }
}
