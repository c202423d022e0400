//! Serve command - run the HTTP service

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::ServeArgs;
use crate::commands::classify::{build_chat_client, process_config};
use crate::config::AppConfig;
use crate::http::{AppState, router};

pub async fn execute(args: ServeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let addr: SocketAddr = match args.bind {
        Some(addr) => addr,
        None => config
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid server.bind: {}", config.server.bind))?,
    };

    let state = AppState {
        chat: Arc::from(build_chat_client(&config)?),
        process: process_config(&config),
    };
    let app = router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        provider = %config.llm.provider,
        model = %config.llm.model,
        mode = ?config.llm.mode,
        "Starting email-triage server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("email-triage server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
