use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    identity::{Credentials, IdentityState},
    role::{Role, RoleClaimSet},
    session::{Identity, Session},
};

/// Header carrying comma-separated role claims for the local bypass.
pub const ROLE_CLAIMS_HEADER: &str = "x-role-claims";

/// The one realm role that maps to an application role.
pub const REALM_ADMIN_ROLE: &str = "ROLE_ADMIN";

/// Claims
///
/// Payload expected inside a bearer JWT. Application roles arrive in `roles`
/// (identity service). Of the identity provider's realm roles only
/// `ROLE_ADMIN` is meaningful; the rest (`offline_access`, `default-roles-*`)
/// never reach the claim set.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's UUID.
    pub sub: Uuid,
    /// Expiration Time (exp).
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm_access: Option<RealmAccess>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    /// Application roles plus the realm admin flag, deduplicated.
    pub fn role_claims(&self) -> RoleClaimSet {
        let realm_admin = self
            .realm_access
            .iter()
            .flat_map(|r| r.roles.iter())
            .filter(|role| role.as_str() == REALM_ADMIN_ROLE);
        self.roles.iter().chain(realm_admin).cloned().collect()
    }

    pub fn identity(&self) -> Identity {
        Identity {
            subject: Some(self.sub),
            given_name: self.given_name.clone(),
            family_name: self.family_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// CurrentSession Extractor Result
///
/// The session of the caller as reported by the identity source. Never rejects:
/// an anonymous caller simply gets an unauthenticated session, which the gate
/// turns into a login redirect.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

/// CurrentSession Extractor Implementation
///
/// 1. Dependency Resolution: identity source and AppConfig from the app state.
/// 2. Local Bypass: in `Env::Local`, role claims may be passed directly in the
///    `x-role-claims` header.
/// 3. Token Extraction: `Authorization: Bearer <token>`, handed to the identity source.
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    IdentityState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = IdentityState::from_ref(state);
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            if let Some(claims) = parts
                .headers
                .get(ROLE_CLAIMS_HEADER)
                .and_then(|value| value.to_str().ok())
            {
                let claims: RoleClaimSet = claims
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect();
                tracing::debug!(?claims, "Using local role-claims bypass");
                return Ok(CurrentSession(Session::authenticated(claims)));
            }
        }

        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        let session = identity.session(&Credentials { bearer }).await;
        Ok(CurrentSession(session))
    }
}

/// AuthUser Extractor Result
///
/// An authenticated caller. `role` is `None` when none of the claims is a
/// known role; handlers decide what that means for them.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub session: Session,
    pub role: Option<Role>,
}

/// Rejects with 401 Unauthorized when the session is not authenticated.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    IdentityState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(CurrentSession(session)) = CurrentSession::from_request_parts(parts, state).await;

        if !session.is_authenticated {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let role = session.effective_role();
        Ok(AuthUser { session, role })
    }
}
