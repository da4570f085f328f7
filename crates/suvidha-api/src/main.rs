//! # suvidha-api — Binary Entry Point
//!
//! Loads configuration from the environment, selects the storage backend,
//! and serves the Axum application.

use anyhow::Context;
use suvidha_api::config::AppConfig;
use suvidha_api::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "configuration loaded");

    let store = suvidha_api::store::connect(&config).await.map_err(|e| {
        tracing::error!("Storage initialization failed: {e}");
        e
    })?;
    tracing::info!(backend = store.backend_name(), "storage ready");

    let addr = format!("{}:{}", config.host, config.port);
    let app = suvidha_api::app(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("SUVIDHA API listening on {addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// `RUST_LOG` filter (default `info`); `LOG_FORMAT=json` for JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
