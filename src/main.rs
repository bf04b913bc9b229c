use dashboard_gate::{
    AppState, JwtIdentitySource, Registry, Session, StaticIdentitySource,
    config::{AppConfig, Env},
    create_router,
    identity::IdentityState,
    role::ROLE_PRIORITY,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dashboard_gate=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Navigation registry. A malformed table is a build defect: refuse to start.
    let registry = Registry::build().expect("FATAL: navigation registry failed validation");
    for role in ROLE_PRIORITY {
        tracing::debug!(
            %role,
            routes = registry.route_table(role).entries().len(),
            menu = registry.menu_table(role).entries().len(),
            "Navigation tables loaded"
        );
    }

    // 4. Identity source: static mock session when configured, signed JWTs otherwise.
    let identity = match &config.mock_role_claims {
        Some(claims) => {
            tracing::warn!(?claims, "Mock identity enabled; every caller shares one session");
            Arc::new(StaticIdentitySource::new(Session::authenticated(
                claims.iter().cloned(),
            ))) as IdentityState
        }
        None => Arc::new(JwtIdentitySource::new(&config.jwt_secret)) as IdentityState,
    };

    let bind_addr = config.bind_addr.clone();

    // 5. Unified State Assembly
    let app_state = AppState {
        identity,
        registry: Arc::new(registry),
        config,
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly");
}
