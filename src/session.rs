use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::role::{Role, resolve_effective_role};

/// Identity
///
/// Display attributes the identity provider knows about the subject. Only the
/// shell reads these; they play no part in authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Identity {
    pub subject: Option<Uuid>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: Option<String>,
}

/// Session
///
/// Owned by the identity source, read-only everywhere else. The effective role
/// is never stored here; it is recomputed from `role_claims` on every read so a
/// claim change can't leave a stale role behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Session {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub role_claims: BTreeSet<String>,
    #[serde(default)]
    pub loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}

impl Session {
    /// Application start: the identity check has not resolved yet.
    pub fn starting() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn authenticated<I, S>(claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_authenticated: true,
            role_claims: claims.into_iter().map(Into::into).collect(),
            loading: false,
            identity: None,
        }
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Logout resets to an unauthenticated, settled session.
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn effective_role(&self) -> Option<Role> {
        resolve_effective_role(&self.role_claims)
    }
}
