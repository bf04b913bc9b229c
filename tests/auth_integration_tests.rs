use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use dashboard_gate::{
    AppState, JwtIdentitySource, Registry, Role,
    auth::{AuthUser, Claims, CurrentSession, RealmAccess},
    config::{AppConfig, Env},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use uuid::Uuid;

const TEST_JWT_SECRET: &str = "auth-integration-test-secret";

// --- Helpers ---

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// Mints an HS256 token; `exp_offset` is added to the current time.
fn create_token(sub: Uuid, roles: &[&str], realm: &[&str], exp_offset: i64) -> String {
    let iat = now();
    let claims = Claims {
        sub,
        exp: (iat as i64 + exp_offset) as usize,
        iat,
        given_name: Some("Awa".to_string()),
        family_name: Some("Ndiaye".to_string()),
        email: None,
        roles: roles.iter().map(|r| r.to_string()).collect(),
        realm_access: (!realm.is_empty()).then(|| RealmAccess {
            roles: realm.iter().map(|r| r.to_string()).collect(),
        }),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

fn create_app_state(env: Env) -> AppState {
    let config = AppConfig {
        env,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    };

    AppState {
        identity: Arc::new(JwtIdentitySource::new(TEST_JWT_SECRET)),
        registry: Arc::new(Registry::build().unwrap()),
        config,
    }
}

fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_bearer(parts: &mut Parts, token: &str) {
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let user_id = Uuid::new_v4();
    let token = create_token(user_id, &["teacher", "parent"], &[], 3600);
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/me".parse().unwrap());
    with_bearer(&mut parts, &token);

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.role, Some(Role::Teacher));
    assert!(user.session.role_claims.contains("parent"));

    let identity = user.session.identity.expect("token carries identity");
    assert_eq!(identity.subject, Some(user_id));
    assert_eq!(identity.given_name.as_deref(), Some("Awa"));
}

#[tokio::test]
async fn test_realm_admin_joins_application_roles() {
    let token = create_token(Uuid::new_v4(), &["student"], &["ROLE_ADMIN", "offline_access"], 3600);
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/me".parse().unwrap());
    with_bearer(&mut parts, &token);

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(user.role, Some(Role::Administrator));
    assert_eq!(user.session.role_claims.len(), 2);
    assert!(!user.session.role_claims.contains("offline_access"));
}

#[tokio::test]
async fn test_other_realm_roles_grant_nothing() {
    let token = create_token(
        Uuid::new_v4(),
        &[],
        &["teacher", "parent", "uma_authorization", "default-roles-edconnekt"],
        3600,
    );
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/me".parse().unwrap());
    with_bearer(&mut parts, &token);

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert!(user.session.is_authenticated);
    assert!(user.session.role_claims.is_empty());
    assert_eq!(user.role, None);
}

#[tokio::test]
async fn test_missing_header_yields_unauthenticated_session() {
    let app_state = create_app_state(Env::Production);
    let mut parts = get_request_parts(Method::GET, "/navigate".parse().unwrap());

    let Ok(CurrentSession(session)) =
        CurrentSession::from_request_parts(&mut parts, &app_state).await;
    assert!(!session.is_authenticated);
    assert!(!session.loading);
    assert!(session.role_claims.is_empty());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    // Well past the default validation leeway.
    let token = create_token(Uuid::new_v4(), &["teacher"], &[], -3600);
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/me".parse().unwrap());
    with_bearer(&mut parts, &token);

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_foreign_signature() {
    let claims = Claims {
        sub: Uuid::new_v4(),
        exp: now() + 3600,
        iat: now(),
        given_name: None,
        family_name: None,
        email: None,
        roles: vec!["administrator".to_string()],
        realm_access: None,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/me".parse().unwrap());
    with_bearer(&mut parts, &token);

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_authenticated_without_known_role_has_no_role() {
    let token = create_token(Uuid::new_v4(), &["unknown-claim"], &[], 3600);
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/me".parse().unwrap());
    with_bearer(&mut parts, &token);

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert!(user.session.is_authenticated);
    assert_eq!(user.role, None);
}

#[tokio::test]
async fn test_local_bypass_success() {
    let app_state = create_app_state(Env::Local);

    let mut parts = get_request_parts(Method::GET, "/me".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-role-claims"),
        header::HeaderValue::from_static("parent, familySpace"),
    );

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(user.role, Some(Role::Parent));
    assert!(user.session.role_claims.contains("familySpace"));
    assert!(user.session.identity.is_none());
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let app_state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/me".parse().unwrap());
    // Provide ONLY the local bypass header
    parts.headers.insert(
        header::HeaderName::from_static("x-role-claims"),
        header::HeaderValue::from_static("administrator"),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}
