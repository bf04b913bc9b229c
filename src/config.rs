use std::env;

/// AppConfig
///
/// Immutable configuration loaded once at startup and shared with handlers and
/// extractors through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the local bypass and log format.
    pub env: Env,
    // Secret used to validate incoming HS256 bearer tokens.
    pub jwt_secret: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // When set (local only), every caller gets a static session with these claims.
    pub mock_role_claims: Option<Vec<String>>,
}

/// Env
///
/// Runtime context: `Local` enables developer conveniences (header bypass,
/// mock identity, pretty logs); `Production` disables them.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

impl Default for AppConfig {
    /// Safe, non-panicking values for test state setup.
    fn default() -> Self {
        Self {
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            mock_role_claims: None,
        }
    }
}

fn parse_claims(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    /// load
    ///
    /// Reads configuration from the environment.
    ///
    /// # Panics
    /// Panics in `Production` when `AUTH_JWT_SECRET` is missing, so the service
    /// never starts with a guessable signing secret.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => env::var("AUTH_JWT_SECRET")
                .expect("FATAL: AUTH_JWT_SECRET must be set in production."),
            Env::Local => {
                env::var("AUTH_JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string())
            }
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        // The mock identity source is a development tool only.
        let mock_role_claims = match env {
            Env::Local => env::var("MOCK_ROLE_CLAIMS").ok().map(|raw| parse_claims(&raw)),
            Env::Production => None,
        };

        Self {
            env,
            jwt_secret,
            bind_addr,
            mock_role_claims,
        }
    }
}
