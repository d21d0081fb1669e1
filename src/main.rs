//! WA-Shield backend server binary.
//!
//! Loads configuration, wires the Cloud API client and the in-memory
//! message store into the HTTP surface, and serves until SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wa_cloud::CloudApiClient;
use wa_core::MessageStore;
use washield::config::{AppConfig, LoggingConfig};
use washield::http::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
    info!(run_mode = %run_mode, "starting WA-Shield backend");

    let client = CloudApiClient::new(
        config.whatsapp.api_url.clone(),
        config.whatsapp.phone_number_id.clone(),
        config.whatsapp.access_token.clone(),
        config.whatsapp.verify_token.clone(),
    );
    let state = AppState {
        store: Arc::new(MessageStore::new()),
        whatsapp: Arc::new(client),
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind listen address")?;
    info!(address = %addr, "WA-Shield backend listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry.with(fmt::layer().json().flatten_event(true)).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Complete when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT"),
        _ = terminate => info!("received SIGTERM"),
    }

    info!("shutting down");
}
