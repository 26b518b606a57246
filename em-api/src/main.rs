//! em-api - read-only geospatial event API
//!
//! Loads configuration, opens the event store read-only and serves the map
//! and detail endpoints until Ctrl+C or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use em_api::store::{connect_readonly, SqliteEventStore};
use em_api::{build_router, AppState};
use em_common::config::ConfigResolver;
use em_common::ApiConfig;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for em-api
#[derive(Parser, Debug)]
#[command(name = "em-api")]
#[command(about = "Read-only geospatial event API")]
#[command(version)]
struct Args {
    /// Config file (falls back to EM_API_CONFIG, then the platform config file)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "EM_API_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "EM_API_PORT")]
    port: Option<u16>,

    /// Event store database file
    #[arg(short, long, env = "EM_API_DATABASE")]
    database: Option<PathBuf>,
}

impl Args {
    /// Command-line values win over the config file
    fn apply_overrides(&self, config: &mut ApiConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(database) = &self.database {
            config.store.database_path = database.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "em_api=info,em_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting em-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let mut config = ConfigResolver::new(args.config.clone())
        .resolve()
        .context("Failed to load configuration")?;
    args.apply_overrides(&mut config);

    let db_path = config.store.database_path.clone();
    info!("Database path: {}", db_path.display());

    let pool = match connect_readonly(&db_path).await {
        Ok(pool) => {
            info!("Connected to event store (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to event store: {}", e);
            return Err(e).context("Failed to open event store");
        }
    };

    let state = AppState::new(Arc::new(SqliteEventStore::new(pool)), &config);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("em-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
