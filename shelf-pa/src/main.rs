//! shelf-pa (Persona Analytics) - grade tiers and persona similarity service
//!
//! Reads persona stats and ranking aggregates from the application database
//! (read-only) and serves tier grades, similarity rankings and comparison
//! matrices to the page renderer.

use anyhow::{Context, Result};
use clap::Parser;
use shelf_common::config::{CliOverrides, ServiceConfig};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use shelf_pa::{build_router, db, AppState};

/// Command-line arguments; each overrides environment, TOML and defaults
#[derive(Parser, Debug)]
#[command(name = "shelf-pa", version, about = "Shelf persona analytics service")]
struct Args {
    /// Root folder holding the application database
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Config file (default: platform config directory)
    #[arg(short, long, env = "SHELF_CONFIG")]
    config: Option<PathBuf>,

    /// Database file, absolute or relative to the root folder
    #[arg(long)]
    database: Option<PathBuf>,

    /// Listen address
    #[arg(long)]
    bind: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Similar personas returned when a request gives no limit
    #[arg(long)]
    similar_limit: Option<usize>,

    /// tracing filter, e.g. "info" or "shelf_pa=debug" (RUST_LOG still wins)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root_folder: self.root_folder.clone(),
            config_file: self.config.clone(),
            database: self.database.clone(),
            bind: self.bind.clone(),
            port: self.port,
            similar_limit: self.similar_limit,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Resolve before tracing init so the configured log level applies;
    // errors are reported once logging is up
    let config = ServiceConfig::resolve(&args.overrides());

    // RUST_LOG wins over the configured level
    let log_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Shelf Persona Analytics (shelf-pa) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e).context("Failed to resolve configuration");
        }
    };
    info!("Root folder: {}", config.root_folder.display());
    info!("Database path: {}", config.database_path.display());

    let pool = match db::connect_readonly(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Connected to database (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e);
        }
    };

    let state = AppState::new(pool, config.similar_limit);
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("shelf-pa listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
