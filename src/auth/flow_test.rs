use super::{
    downstream_check_error_message, login_error_message, should_fetch_profile,
    GENERIC_LOGIN_ERROR_MESSAGE, LOGIN_CANCELLED_MESSAGE, LOGIN_TIMEOUT_MESSAGE,
    NETWORK_ERROR_MESSAGE, POPUP_BLOCKED_MESSAGE, SESSION_EXPIRED_MESSAGE,
};
use crate::auth::router::ProfileQuery;
use crate::net::types::UserProfile;

#[test]
fn already_authenticated_is_suppressed() {
    assert_eq!(login_error_message("User is already authenticated"), None);
    assert_eq!(login_error_message("ALREADY AUTHENTICATED"), None);
}

#[test]
fn cancellation_maps_to_cancelled_copy() {
    // The provider reports cancellation as camel-case "UserInterrupt".
    assert_eq!(
        login_error_message("UserInterrupt"),
        Some(LOGIN_CANCELLED_MESSAGE)
    );
    assert_eq!(
        login_error_message("login cancelled by user"),
        Some(LOGIN_CANCELLED_MESSAGE)
    );
}

#[test]
fn popup_errors_map_to_popup_copy() {
    assert_eq!(
        login_error_message("popup window failed to open"),
        Some(POPUP_BLOCKED_MESSAGE)
    );
    assert_eq!(
        login_error_message("request blocked"),
        Some(POPUP_BLOCKED_MESSAGE)
    );
}

#[test]
fn network_errors_map_to_network_copy() {
    assert_eq!(
        login_error_message("network unreachable"),
        Some(NETWORK_ERROR_MESSAGE)
    );
    assert_eq!(
        login_error_message("Failed to fetch"),
        Some(NETWORK_ERROR_MESSAGE)
    );
}

#[test]
fn timeout_maps_to_timeout_copy() {
    assert_eq!(
        login_error_message("request timeout after 30s"),
        Some(LOGIN_TIMEOUT_MESSAGE)
    );
}

#[test]
fn expired_session_maps_to_session_expired_copy() {
    assert_eq!(
        login_error_message("session expired"),
        Some(SESSION_EXPIRED_MESSAGE)
    );
    assert_eq!(
        login_error_message("delegation expired during validation"),
        Some(SESSION_EXPIRED_MESSAGE)
    );
}

#[test]
fn unknown_errors_map_to_generic_copy() {
    assert_eq!(
        login_error_message("something exploded"),
        Some(GENERIC_LOGIN_ERROR_MESSAGE)
    );
}

#[test]
fn cancel_takes_precedence_over_network_wording() {
    // A cancelled request may also mention the connection; the user's own
    // action wins.
    assert_eq!(
        login_error_message("user interrupt during network call"),
        Some(LOGIN_CANCELLED_MESSAGE)
    );
}

#[test]
fn downstream_message_carries_the_cause() {
    let msg = downstream_check_error_message("HTTP 503");
    assert!(msg.contains("HTTP 503"));
    assert!(msg.contains("account status"));
}

#[test]
fn restored_session_starts_the_profile_check() {
    // Settled-authenticated without a click-initiated attempt (a restored
    // session or a same-window provider return) must still get routed.
    assert!(should_fetch_profile(true, false, &ProfileQuery::Loading));
}

#[test]
fn profile_check_waits_for_authentication() {
    assert!(!should_fetch_profile(false, false, &ProfileQuery::Loading));
}

#[test]
fn click_initiated_attempts_own_their_own_profile_check() {
    assert!(!should_fetch_profile(true, true, &ProfileQuery::Loading));
}

#[test]
fn terminal_profile_query_is_not_refetched() {
    let ready = ProfileQuery::Ready(Some(UserProfile {
        display_name: "Avery".to_owned(),
        created_at_ms: 0.0,
    }));
    assert!(!should_fetch_profile(true, false, &ready));
    assert!(!should_fetch_profile(true, false, &ProfileQuery::Ready(None)));
    assert!(!should_fetch_profile(
        true,
        false,
        &ProfileQuery::Failed("boom".to_owned())
    ));
}
