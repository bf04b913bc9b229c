use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that accept anonymous callers. The gate runs on every one of
/// them; an unauthenticated session is an expected input, not a failure.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /gate/decide
        // Gate decision for an explicit session value (loading, signed out, any claims).
        // Local runs only; 404 in production.
        .route("/gate/decide", post(handlers::decide))
        // GET /navigate?path=...&menu=open
        // Gate decision and shell for the caller's own session.
        .route("/navigate", get(handlers::navigate))
        // POST /logout
        // Decision for the reset session: always a redirect to the login path.
        .route("/logout", post(handlers::logout))
}
