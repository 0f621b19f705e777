//! Roulette - A read-through blob cache
//!
//! Serves blobs from an in-memory LRU cache in front of an object store.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roulette::{api::create_router, storage, AppState, Config};

/// Read-through blob cache in front of an object store.
#[derive(Parser, Debug)]
#[command(name = "roulette", version, about, long_about = None)]
struct Args {
    /// Path to the YAML config file
    #[arg(short = 'c', long = "config")]
    config: PathBuf,
}

/// Main entry point for the cache proxy.
///
/// # Startup Sequence
/// 1. Parse command line arguments
/// 2. Initialize tracing subscriber for logging
/// 3. Load configuration from the config file
/// 4. Construct the backing store client
/// 5. Create the cache and the Axum router
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
///
/// Any startup failure is reported on stderr and exits non-zero.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roulette=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Roulette cache proxy");

    let config = Config::from_file(&args.config)
        .with_context(|| format!("Unable to load config from {}", args.config.display()))?;
    info!(
        "Configuration loaded: cache_size={}KB, bucket={}, port={}, max_inflight_fetches={}, fetch_timeout={}s",
        config.cache_size,
        config.bucket,
        config.port,
        config.max_inflight_fetches,
        config.fetch_timeout_secs
    );
    if let Some(unit) = &config.unit {
        info!(unit = %unit, "Config field `unit` is reserved and has no effect");
    }

    let backing_store =
        storage::from_config(&config).context("Unable to initialise the backing store")?;

    let state = AppState::from_config(&config, backing_store);
    let cache = state.cache.clone();
    info!("Cache store initialized");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Unable to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let stats = cache.read().await.stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        rejections = stats.rejections,
        entries = stats.total_entries,
        size_kb = stats.size_kb,
        hit_rate = stats.hit_rate(),
        "Server shutdown complete"
    );

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_require_config() {
        assert!(Args::try_parse_from(["roulette"]).is_err());
    }

    #[test]
    fn test_args_short_and_long_flags() {
        let args = Args::try_parse_from(["roulette", "-c", "roulette.yaml"]).unwrap();
        assert_eq!(args.config, PathBuf::from("roulette.yaml"));

        let args = Args::try_parse_from(["roulette", "--config", "/etc/roulette.yaml"]).unwrap();
        assert_eq!(args.config, PathBuf::from("/etc/roulette.yaml"));
    }
}
