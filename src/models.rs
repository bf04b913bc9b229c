use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    gate::RenderMode,
    navigation::{MenuEntry, RouteTarget},
    role::{Capabilities, Role},
    session::Session,
    shell::Shell,
};

// --- Profile Schemas ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// UserProfile
///
/// Display-only record passed to leaf views (GET /me, and inside every shell).
/// Never consulted for authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub id: Option<Uuid>,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub avatar_url: String,
}

// --- Request Payloads (Input Schemas) ---

/// DecideRequest
///
/// Input for POST /gate/decide: an arbitrary session (including one still
/// loading) and the path the browser asked for.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DecideRequest {
    pub session: Session,
    #[schema(example = "/evaluations/notes")]
    pub requested_path: String,
}

/// NavigateQuery
///
/// Query parameters for GET /navigate.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct NavigateQuery {
    /// Requested path; defaults to `/`.
    pub path: Option<String>,
    /// Side menu state, `open` or `closed` (default). Display only.
    pub menu: Option<String>,
}

// --- Output Schemas ---

/// NavigationResponse
///
/// Everything the dashboard needs to render one path: the gate decision, the
/// redirect to follow (if any) and the composed shell for authorized views.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NavigationResponse {
    pub decision: RenderMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<Shell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,
}

/// RouteSummary
///
/// One route table entry as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RouteSummary {
    pub pattern: String,
    pub target: RouteTarget,
}

/// RoleTablesSnapshot
///
/// Both projections of one role (GET /admin/registry).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoleTablesSnapshot {
    pub role: Role,
    pub routes: Vec<RouteSummary>,
    pub menu: Vec<MenuEntry>,
}
