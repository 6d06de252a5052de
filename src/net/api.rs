//! REST API helpers for the application backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning errors since these endpoints are only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! The profile check distinguishes "no profile exists" (a routing answer)
//! from "the check failed" (a recoverable error surface), so callers get
//! `Result<Option<_>, String>` rather than a collapsed `Option`.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::UserProfile;

pub const CALLER_PROFILE_ENDPOINT: &str = "/api/profile/me";

#[cfg(any(test, feature = "hydrate"))]
fn profile_check_failed_message(status: u16) -> String {
    format!("profile check failed: {status}")
}

/// Fetch the calling user's profile.
///
/// `Ok(None)` means the backend answered and no profile exists yet.
///
/// # Errors
///
/// Returns an error string when the request fails or the backend answers
/// with an unexpected status.
pub async fn fetch_caller_profile() -> Result<Option<UserProfile>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(CALLER_PROFILE_ENDPOINT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if resp.status() == 404 {
            return Ok(None);
        }
        if !resp.ok() {
            return Err(profile_check_failed_message(resp.status()));
        }
        let profile: UserProfile = resp.json().await.map_err(|e| e.to_string())?;
        Ok(Some(profile))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

/// Create the calling user's profile during onboarding.
///
/// # Errors
///
/// Returns an error string when the request fails or the backend rejects the
/// profile.
pub async fn create_caller_profile(display_name: &str) -> Result<UserProfile, String> {
    #[cfg(feature = "hydrate")]
    {
        #[derive(serde::Serialize)]
        struct CreateProfileRequest<'a> {
            display_name: &'a str,
        }
        let resp = gloo_net::http::Request::post(CALLER_PROFILE_ENDPOINT)
            .json(&CreateProfileRequest { display_name })
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(profile_check_failed_message(resp.status()));
        }
        resp.json().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = display_name;
        Err("not available on server".to_owned())
    }
}
