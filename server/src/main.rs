//! Server entrypoint for newsroom
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod api;
mod cli;
mod logging;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use newsroom_infrastructure::ConfigLoader;
use state::AppState;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let mut config = ConfigLoader::load(cli.config.as_ref()).context("failed to load config")?;
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    config.validate()?;

    if cli.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    // Held for the whole process so buffered log lines are flushed
    let _log_guard = logging::init(cli.verbose, config.logging.dir.as_deref());

    info!("Starting newsroom {}", env!("CARGO_PKG_VERSION"));

    // === Dependency Injection ===
    let state = AppState::from_config(&config, cli.seed_default_team).await?;

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", config.server.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
