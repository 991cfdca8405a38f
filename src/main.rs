//! Storage Box Exporter Binary Entry Point
//!
//! This binary serves Hetzner Storage Box metrics for Prometheus.
//! Core functionality is provided by the `storagebox_exporter` library crate.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use storagebox_exporter::{
    build_info,
    collector::StorageBoxCollector,
    config::{AppConfig, ConfigOverrides, parse_duration},
    hetzner::HetznerClient,
    server::{AppState, create_router},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Prometheus exporter for Hetzner Storage Boxes
#[derive(Parser, Debug)]
#[command(name = "storagebox-exporter", version, about, long_about = None)]
struct Cli {
    /// Path to an optional YAML configuration file
    #[arg(short, long, env = "STORAGEBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, host:port or :port [default: :9509]
    #[arg(long, env = "LISTEN_ADDRESS")]
    listen_address: Option<String>,

    /// Path under which to expose metrics [default: /metrics]
    #[arg(long, env = "METRICS_PATH")]
    metrics_path: Option<String>,

    /// Log level: trace, debug, info, warn, error [default: info]
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Hetzner API token
    #[arg(long, env = "HETZNER_TOKEN", hide_env_values = true)]
    hetzner_token: Option<String>,

    /// File containing the Hetzner API token
    #[arg(long, env = "HETZNER_TOKEN_FILE")]
    hetzner_token_file: Option<PathBuf>,

    /// Hetzner API base URL [default: https://api.hetzner.com/v1]
    #[arg(long, env = "HETZNER_API_URL")]
    api_base_url: Option<String>,

    /// Cache TTL, seconds or a duration like 1m; 0 disables caching [default: 0]
    #[arg(long, env = "CACHE_TTL", value_parser = parse_duration)]
    cache_ttl: Option<Duration>,

    /// Advisory cache size budget in bytes; 0 means unlimited [default: 0]
    #[arg(long, env = "CACHE_MAX_SIZE")]
    cache_max_size: Option<u64>,

    /// Interval between cache cleanup passes [default: 10s]
    #[arg(long, env = "CACHE_CLEANUP_INTERVAL", value_parser = parse_duration)]
    cache_cleanup_interval: Option<Duration>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen_address: self.listen_address.clone(),
            metrics_path: self.metrics_path.clone(),
            log_level: self.log_level.clone(),
            token: self.hetzner_token.clone(),
            token_file: self.hetzner_token_file.clone(),
            api_base_url: self.api_base_url.clone(),
            cache_ttl: self.cache_ttl,
            cache_max_size: self.cache_max_size,
            cache_cleanup_interval: self.cache_cleanup_interval,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration (CLI > ENV > config file > defaults)
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.apply_overrides(cli.overrides());
    config.validate()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_ascii_lowercase())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        version = build_info::VERSION,
        git_commit = build_info::GIT_COMMIT,
        build_date = build_info::BUILD_DATE,
        "Storage Box Exporter starting"
    );
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "Loaded configuration file");
    }

    let token = config.resolve_token()?;
    let client = HetznerClient::new(token)?.with_base_url(config.hetzner.api_base_url.clone());
    tracing::info!(api_base_url = client.base_url(), "Hetzner API client ready");

    let collector = StorageBoxCollector::new(client, config.cache_settings());

    // Build Axum router
    let app = create_router(AppState::new(
        Arc::new(collector),
        config.server.metrics_path.clone(),
    ));

    let addr = config.server.bind_address()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        address = %listener.local_addr()?,
        metrics_path = %config.server.metrics_path,
        "Web server listening"
    );
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Setup graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }
}
