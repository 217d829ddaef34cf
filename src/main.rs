use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use finance_api::{app, config, database::Database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config().clone();
    config.validate().context("invalid configuration")?;
    info!(
        "Starting Finance API in {:?} mode ({:?} auth)",
        config.environment, config.security.auth_mode
    );

    let db = Database::connect(&config.database)
        .await
        .context("failed to open database")?;
    db.migrate().await.context("failed to run migrations")?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(config, db.clone()).context("failed to build upstream client")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Finance API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
