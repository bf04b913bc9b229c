use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Oversight of the navigation registry. The administrator check is performed
/// inside the handlers after the request passes the authentication layer.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/registry
        // Route and menu projections of every role, in priority order.
        .route("/registry", get(handlers::get_registry))
}
