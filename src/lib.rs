use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// The navigation engine: pure functions of the session, no HTTP.
pub mod error;
pub mod gate;
pub mod navigation;
pub mod path;
pub mod role;
pub mod session;
pub mod shell;

// Service plumbing around the engine.
pub mod auth;
pub mod config;
pub mod handlers;
pub mod identity;
pub mod models;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use gate::{RenderMode, decide_render_mode};
pub use identity::{IdentityState, JwtIdentitySource, StaticIdentitySource};
pub use navigation::Registry;
pub use role::{Role, resolve_effective_role};
pub use session::Session;

/// ApiDoc
///
/// OpenAPI document for every handler and schema, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::decide, handlers::navigate, handlers::logout, handlers::get_me,
        handlers::get_my_menu, handlers::get_my_routes, handlers::get_my_capabilities,
        handlers::get_registry
    ),
    components(
        schemas(
            models::DecideRequest, models::NavigationResponse, models::UserProfile,
            models::Gender, models::RouteSummary, models::RoleTablesSnapshot,
            session::Session, session::Identity, gate::RenderMode, role::Role,
            role::Capabilities, navigation::View, navigation::Icon, navigation::MenuEntry,
            navigation::RouteMatch, navigation::RouteTarget, shell::Shell, shell::TopBar,
            shell::SideMenu,
        )
    ),
    tags(
        (name = "dashboard-gate", description = "Role resolution and navigation API")
    )
)]
struct ApiDoc;

/// RegistryState
///
/// The validated navigation registry, shared read-only by every request.
pub type RegistryState = Arc<Registry>;

/// AppState
///
/// Single shared container for the services every request may need.
#[derive(Clone)]
pub struct AppState {
    /// Identity Layer: turns request credentials into a session.
    pub identity: IdentityState,
    /// Navigation Layer: route and menu tables for every role.
    pub registry: RegistryState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for IdentityState {
    fn from_ref(app_state: &AppState) -> IdentityState {
        app_state.identity.clone()
    }
}

impl FromRef<AppState> for RegistryState {
    fn from_ref(app_state: &AppState) -> RegistryState {
        app_state.registry.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Guards `authenticated_routes`: extracting `AuthUser` rejects with 401 before
/// the handler runs when the session is not authenticated.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing structure, scoped and global middleware, and state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .nest("/admin", admin::admin_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer`, tagged with the `x-request-id` so every log line of a
/// request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
