use crate::{
    RegistryState,
    auth::{AuthUser, CurrentSession},
    config::{AppConfig, Env},
    gate::decide_render_mode,
    models::{
        DecideRequest, NavigateQuery, NavigationResponse, RoleTablesSnapshot, RouteSummary,
        UserProfile,
    },
    navigation::{HOME_PATH, MenuEntry, Registry},
    role::{Capabilities, ROLE_PRIORITY, Role},
    session::Session,
    shell::{build_profile, compose_shell},
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

// --- Helpers ---

/// navigation_response
///
/// Runs the gate for one (session, path) pair and composes the shell when the
/// decision renders an authorized view.
pub fn navigation_response(
    session: &Session,
    requested_path: &str,
    registry: &Registry,
    menu_open: bool,
) -> NavigationResponse {
    let decision = decide_render_mode(session, requested_path, registry);
    let redirect = decision.redirect().map(str::to_string);
    let shell = compose_shell(&decision, session, registry, menu_open);
    let capabilities = decision.role().map(|role| role.capabilities());

    NavigationResponse {
        decision,
        redirect,
        shell,
        capabilities,
    }
}

fn known_role(user: &AuthUser) -> Result<Role, StatusCode> {
    user.role.ok_or(StatusCode::FORBIDDEN)
}

// --- Handlers ---

/// decide
///
/// [Public Route] Simulates the gate for a caller-supplied session, which is
/// the only way to observe the `loading` mode over HTTP. The session is taken
/// at face value, so any role's shell can be rendered: the endpoint exists in
/// `Env::Local` only and answers 404 in production.
#[utoipa::path(
    post,
    path = "/gate/decide",
    request_body = DecideRequest,
    responses(
        (status = 200, description = "Gate decision", body = NavigationResponse),
        (status = 404, description = "Not available outside local runs")
    )
)]
pub async fn decide(
    State(config): State<AppConfig>,
    State(registry): State<RegistryState>,
    Json(payload): Json<DecideRequest>,
) -> Result<Json<NavigationResponse>, StatusCode> {
    if config.env != Env::Local {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(Json(navigation_response(
        &payload.session,
        &payload.requested_path,
        &registry,
        false,
    )))
}

/// navigate
///
/// [Public Route] Evaluates the gate for the caller's own session. Anonymous
/// callers are redirected to the login path.
#[utoipa::path(
    get,
    path = "/navigate",
    params(NavigateQuery),
    responses((status = 200, description = "Navigation for the requested path", body = NavigationResponse))
)]
pub async fn navigate(
    CurrentSession(session): CurrentSession,
    State(registry): State<RegistryState>,
    Query(query): Query<NavigateQuery>,
) -> Json<NavigationResponse> {
    let path = query.path.as_deref().unwrap_or(HOME_PATH);
    let menu_open = query.menu.as_deref() == Some("open");
    Json(navigation_response(&session, path, &registry, menu_open))
}

/// logout
///
/// [Public Route] Returns the decision for a reset session. Token revocation
/// belongs to the identity provider; the client drops its token and follows the
/// redirect.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 200, description = "Signed-out navigation", body = NavigationResponse))
)]
pub async fn logout(
    CurrentSession(session): CurrentSession,
    State(registry): State<RegistryState>,
) -> Json<NavigationResponse> {
    if session.is_authenticated {
        tracing::info!(role = ?session.effective_role(), "Session signed out");
    }
    Json(navigation_response(
        &Session::signed_out(),
        HOME_PATH,
        &registry,
        false,
    ))
}

/// get_me
///
/// [Authenticated Route] Display profile for the caller's effective role.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Unknown role")
    )
)]
pub async fn get_me(user: AuthUser) -> Result<Json<UserProfile>, StatusCode> {
    let role = known_role(&user)?;
    Ok(Json(build_profile(role, user.session.identity.as_ref())))
}

/// get_my_menu
///
/// [Authenticated Route] Menu table of the caller's effective role.
#[utoipa::path(
    get,
    path = "/me/menu",
    responses(
        (status = 200, description = "Menu entries", body = [MenuEntry]),
        (status = 403, description = "Unknown role")
    )
)]
pub async fn get_my_menu(
    user: AuthUser,
    State(registry): State<RegistryState>,
) -> Result<Json<Vec<MenuEntry>>, StatusCode> {
    let role = known_role(&user)?;
    Ok(Json(registry.menu_table(role).entries().to_vec()))
}

/// get_my_routes
///
/// [Authenticated Route] Route table of the caller's effective role, catch-all last.
#[utoipa::path(
    get,
    path = "/me/routes",
    responses(
        (status = 200, description = "Route entries", body = [RouteSummary]),
        (status = 403, description = "Unknown role")
    )
)]
pub async fn get_my_routes(
    user: AuthUser,
    State(registry): State<RegistryState>,
) -> Result<Json<Vec<RouteSummary>>, StatusCode> {
    let role = known_role(&user)?;
    Ok(Json(route_summaries(&registry, role)))
}

/// get_my_capabilities
///
/// [Authenticated Route] Feature switches for the caller's effective role.
#[utoipa::path(
    get,
    path = "/me/capabilities",
    responses(
        (status = 200, description = "Capabilities", body = Capabilities),
        (status = 403, description = "Unknown role")
    )
)]
pub async fn get_my_capabilities(user: AuthUser) -> Result<Json<Capabilities>, StatusCode> {
    let role = known_role(&user)?;
    Ok(Json(role.capabilities()))
}

/// get_registry
///
/// [Admin Route] Both projections for every role, in priority order.
///
/// *Authorization*: the caller's effective role must be `administrator`.
#[utoipa::path(
    get,
    path = "/admin/registry",
    responses(
        (status = 200, description = "All role tables", body = [RoleTablesSnapshot]),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn get_registry(
    user: AuthUser,
    State(registry): State<RegistryState>,
) -> Result<Json<Vec<RoleTablesSnapshot>>, StatusCode> {
    if user.role != Some(Role::Administrator) {
        return Err(StatusCode::FORBIDDEN);
    }

    let snapshot = ROLE_PRIORITY
        .into_iter()
        .map(|role| RoleTablesSnapshot {
            role,
            routes: route_summaries(&registry, role),
            menu: registry.menu_table(role).entries().to_vec(),
        })
        .collect();
    Ok(Json(snapshot))
}

fn route_summaries(registry: &Registry, role: Role) -> Vec<RouteSummary> {
    registry
        .route_table(role)
        .entries()
        .iter()
        .map(|entry| RouteSummary {
            pattern: entry.pattern.as_str().to_string(),
            target: entry.target.clone(),
        })
        .collect()
}
