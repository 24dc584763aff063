//! studium-api - HTTP API server for studium.

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studium_api::{build_router, AppState};
use studium_core::defaults;
use studium_db::Database;
use studium_inference::{GeminiBackend, OpenRouterBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    //
    // Environment variables:
    //   RUST_LOG - standard env filter (default: "studium_api=debug,tower_http=debug")
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "studium_api=debug,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Datastore
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let db = Database::connect(&database_url).await?;

    if std::env::var("RUN_MIGRATIONS")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
    {
        info!(subsystem = "api", op = "startup", "Running database migrations");
        db.migrate().await?;
    }

    // Provider backends. Missing API keys do not block startup; routes
    // that need them fail with a configuration error on first use.
    let gemini = GeminiBackend::from_env()?;
    let openrouter = OpenRouterBackend::from_env()?;

    let state = AppState::new(db, gemini, openrouter);
    let app = build_router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults::SERVER_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(
        subsystem = "api",
        op = "startup",
        addr = %addr,
        "studium-api listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
