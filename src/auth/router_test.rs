use super::*;

fn some_profile() -> ProfileQuery {
    ProfileQuery::Ready(Some(UserProfile {
        display_name: "Avery".to_owned(),
        created_at_ms: 0.0,
    }))
}

#[test]
fn no_routing_before_settled() {
    assert_eq!(route_after_auth(false, false, &some_profile(), true), None);
    assert_eq!(route_after_auth(false, true, &some_profile(), true), None);
}

#[test]
fn no_routing_when_settled_unauthenticated() {
    assert_eq!(route_after_auth(true, false, &some_profile(), true), None);
}

#[test]
fn loading_profile_is_never_treated_as_absent() {
    assert_eq!(
        route_after_auth(true, true, &ProfileQuery::Loading, false),
        None
    );
}

#[test]
fn failed_profile_query_produces_no_destination() {
    let failed = ProfileQuery::Failed("boom".to_owned());
    assert_eq!(route_after_auth(true, true, &failed, false), None);
    assert!(failed.is_terminal());
}

#[test]
fn missing_profile_routes_to_onboarding() {
    assert_eq!(
        route_after_auth(true, true, &ProfileQuery::Ready(None), false),
        Some(Destination::Onboarding)
    );
    // The celebration marker is irrelevant without a profile.
    assert_eq!(
        route_after_auth(true, true, &ProfileQuery::Ready(None), true),
        Some(Destination::Onboarding)
    );
}

#[test]
fn profile_without_celebration_marker_routes_to_summit() {
    assert_eq!(
        route_after_auth(true, true, &some_profile(), false),
        Some(Destination::Summit)
    );
}

#[test]
fn profile_with_celebration_seen_routes_to_dashboard() {
    assert_eq!(
        route_after_auth(true, true, &some_profile(), true),
        Some(Destination::Dashboard)
    );
}

#[test]
fn destinations_map_to_paths() {
    assert_eq!(Destination::Onboarding.path(), "/onboarding");
    assert_eq!(Destination::Summit.path(), "/summit");
    assert_eq!(Destination::Dashboard.path(), "/dashboard");
}

#[test]
fn navigation_gate_fires_exactly_once() {
    let mut gate = NavigationGate::default();
    assert!(!gate.has_fired());
    assert!(gate.try_fire());
    assert!(gate.has_fired());

    // Re-running the same committed decision must not navigate again.
    assert!(!gate.try_fire());
    assert!(!gate.try_fire());
}
