use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    navigation::{HOME_PATH, LOGIN_PATH, Registry, RouteMatch, RouteTable, RouteTarget},
    path::{PathParams, normalize_path},
    role::Role,
    session::Session,
};

/// RenderMode
///
/// The four mutually exclusive top-level states of the dashboard. Exactly one
/// applies to any (session, path) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "mode", rename_all = "camelCase")]
#[ts(export)]
pub enum RenderMode {
    /// Identity check still in flight; nothing is mounted.
    Loading,
    /// Only the login table is mounted.
    Unauthenticated { route: RouteMatch },
    /// Authenticated, but no claim maps to a known role. Terminal.
    UnknownRole,
    /// The role's route table is mounted under the shell.
    Authorized { role: Role, route: RouteMatch },
}

impl RenderMode {
    pub fn role(&self) -> Option<Role> {
        match self {
            RenderMode::Authorized { role, .. } => Some(*role),
            _ => None,
        }
    }

    pub fn route(&self) -> Option<&RouteMatch> {
        match self {
            RenderMode::Unauthenticated { route } | RenderMode::Authorized { route, .. } => {
                Some(route)
            }
            RenderMode::Loading | RenderMode::UnknownRole => None,
        }
    }

    /// Where the address bar must go instead of rendering, if anywhere.
    pub fn redirect(&self) -> Option<&str> {
        match self.route().map(|r| &r.target) {
            Some(RouteTarget::Redirect { to }) => Some(to),
            _ => None,
        }
    }
}

fn resolve(table: &RouteTable, path: &str) -> RouteMatch {
    // Registry::build rejects any table without a trailing catch-all.
    table
        .resolve(path)
        .expect("route table is missing its catch-all; Registry::build should have rejected it")
}

/// decide_render_mode
///
/// Pure function of the current session and requested path. Re-run it from
/// scratch on every session change; it keeps no history.
pub fn decide_render_mode(
    session: &Session,
    requested_path: &str,
    registry: &Registry,
) -> RenderMode {
    if session.loading {
        return RenderMode::Loading;
    }

    if !session.is_authenticated {
        return RenderMode::Unauthenticated {
            route: resolve(registry.login_table(), requested_path),
        };
    }

    let Some(role) = session.effective_role() else {
        tracing::debug!(claims = ?session.role_claims, "No recognized role claim");
        return RenderMode::UnknownRole;
    };

    // An authenticated user never sees the login view.
    if registry.is_login_path(requested_path) {
        return RenderMode::Authorized {
            role,
            route: RouteMatch {
                pattern: LOGIN_PATH.to_string(),
                target: RouteTarget::Redirect {
                    to: HOME_PATH.to_string(),
                },
                params: PathParams::new(),
            },
        };
    }

    let route = resolve(registry.route_table(role), requested_path);
    tracing::debug!(
        %role,
        path = %normalize_path(requested_path),
        pattern = %route.pattern,
        "Authorized route"
    );
    RenderMode::Authorized { role, route }
}
