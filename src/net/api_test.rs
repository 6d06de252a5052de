use super::profile_check_failed_message;

#[test]
fn failure_message_carries_status() {
    assert_eq!(profile_check_failed_message(503), "profile check failed: 503");
}
