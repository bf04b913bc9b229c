use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use std::sync::Arc;

use crate::{auth::Claims, session::Session};

/// Credentials
///
/// What the HTTP layer could extract from a request before asking the identity
/// source for a session.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Raw bearer token, without the `Bearer ` prefix.
    pub bearer: Option<String>,
}

// 1. IdentitySource Contract
/// IdentitySource
///
/// The boundary to whatever issues sessions. Implementations validate
/// credentials; the engine downstream trusts the returned session as-is.
/// A missing or invalid credential is an unauthenticated session, not an error.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn session(&self, credentials: &Credentials) -> Session;
}

// 2. The Real Implementation (signed JWT)
/// JwtIdentitySource
///
/// Validates HS256 bearer tokens and turns their role claims into a session.
#[derive(Clone)]
pub struct JwtIdentitySource {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentitySource {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentitySource for JwtIdentitySource {
    async fn session(&self, credentials: &Credentials) -> Session {
        let Some(token) = credentials.bearer.as_deref() else {
            return Session::signed_out();
        };

        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => {
                let claims = data.claims;
                let identity = claims.identity();
                Session::authenticated(claims.role_claims()).with_identity(identity)
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("Bearer token expired"),
                    _ => tracing::debug!(error = %e, "Rejected bearer token"),
                }
                Session::signed_out()
            }
        }
    }
}

// 3. The Mock Implementation (local runs and tests)
/// StaticIdentitySource
///
/// Hands out the same session to every caller regardless of credentials.
#[derive(Clone)]
pub struct StaticIdentitySource {
    session: Session,
}

impl StaticIdentitySource {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl IdentitySource for StaticIdentitySource {
    async fn session(&self, _credentials: &Credentials) -> Session {
        self.session.clone()
    }
}

/// IdentityState
///
/// The concrete type used to share the identity source across the application state.
pub type IdentityState = Arc<dyn IdentitySource>;
