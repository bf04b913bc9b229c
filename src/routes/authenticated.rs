use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Views of the caller's own effective role. Mounted behind `auth_middleware`,
/// so every handler here sees an authenticated session; a session whose claims
/// map to no known role gets 403 from the handlers.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // Display profile (placeholder data where the identity provider is silent).
        .route("/me", get(handlers::get_me))
        // GET /me/menu
        // Side menu entries, in display order.
        .route("/me/menu", get(handlers::get_my_menu))
        // GET /me/routes
        // Authorized route patterns, catch-all last.
        .route("/me/routes", get(handlers::get_my_routes))
        // GET /me/capabilities
        .route("/me/capabilities", get(handlers::get_my_capabilities))
}
