use dashboard_gate::{
    RenderMode, Session,
    models::{DecideRequest, NavigationResponse},
    navigation::{RouteMatch, RouteTarget, View},
    role::Role,
    session::Identity,
};
use serde_json::json;
use std::collections::BTreeMap;

// --- Wire shapes ---

#[test]
fn test_render_mode_is_tagged_by_mode() {
    assert_eq!(
        serde_json::to_value(RenderMode::Loading).unwrap(),
        json!({ "mode": "loading" })
    );
    assert_eq!(
        serde_json::to_value(RenderMode::UnknownRole).unwrap(),
        json!({ "mode": "unknownRole" })
    );

    let authorized = RenderMode::Authorized {
        role: Role::FamilySpace,
        route: RouteMatch {
            pattern: "/ressources/:resourceId".to_string(),
            target: RouteTarget::View {
                view: View::ResourceDetail,
            },
            params: BTreeMap::from([("resourceId".to_string(), "9".to_string())]),
        },
    };
    assert_eq!(
        serde_json::to_value(&authorized).unwrap(),
        json!({
            "mode": "authorized",
            "role": "familySpace",
            "route": {
                "pattern": "/ressources/:resourceId",
                "target": { "kind": "view", "view": "resource-detail" },
                "params": { "resourceId": "9" }
            }
        })
    );
}

#[test]
fn test_redirect_target_shape() {
    let target = RouteTarget::Redirect {
        to: "/login".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&target).unwrap(),
        json!({ "kind": "redirect", "to": "/login" })
    );
}

#[test]
fn test_session_deserializes_with_defaults() {
    let session: Session = serde_json::from_value(json!({ "isAuthenticated": true })).unwrap();
    assert!(session.is_authenticated);
    assert!(!session.loading);
    assert!(session.role_claims.is_empty());
    assert!(session.identity.is_none());

    // A session still loading may omit everything else.
    let session: Session = serde_json::from_value(json!({ "loading": true })).unwrap();
    assert!(session.loading);
    assert!(!session.is_authenticated);

    // Duplicate claims collapse into the set.
    let session: Session = serde_json::from_value(json!({
        "isAuthenticated": true,
        "roleClaims": ["parent", "parent", "teacher"]
    }))
    .unwrap();
    assert_eq!(session.role_claims.len(), 2);
    assert_eq!(session.effective_role(), Some(Role::Teacher));
}

#[test]
fn test_session_serializes_camel_case_without_empty_identity() {
    let value = serde_json::to_value(Session::starting()).unwrap();
    assert_eq!(
        value,
        json!({ "isAuthenticated": false, "roleClaims": [], "loading": true })
    );

    let value = serde_json::to_value(
        Session::authenticated(["student"]).with_identity(Identity {
            given_name: Some("Ines".to_string()),
            ..Identity::default()
        }),
    )
    .unwrap();
    assert_eq!(value["identity"]["givenName"], "Ines");
}

#[test]
fn test_decide_request_rejects_missing_session() {
    let result: Result<DecideRequest, _> =
        serde_json::from_value(json!({ "requestedPath": "/" }));
    assert!(result.is_err());

    let request: DecideRequest = serde_json::from_value(json!({
        "session": { "isAuthenticated": false },
        "requestedPath": "/evaluations/notes"
    }))
    .unwrap();
    assert_eq!(request.requested_path, "/evaluations/notes");
}

#[test]
fn test_navigation_response_omits_absent_parts() {
    let response = NavigationResponse {
        decision: RenderMode::UnknownRole,
        redirect: None,
        shell: None,
        capabilities: None,
    };
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({ "decision": { "mode": "unknownRole" } })
    );
}
