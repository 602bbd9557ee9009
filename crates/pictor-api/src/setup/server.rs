//! Listener and shutdown.

use anyhow::{Context, Result};
use axum::Router;
use pictor_core::Config;
use std::net::SocketAddr;

pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        max_upload_mb = config.max_upload_size_bytes() / 1024 / 1024,
        request_timeout_secs = config.request_timeout_secs(),
        upload_dir = %config.upload_dir().display(),
        thumbnail_dir = %config.thumbnail_dir().display(),
        "Image service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated with an error")?;

    tracing::info!("Image service stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. In-flight requests are drained after it returns.
///
/// # Panics
/// When the signal handlers cannot be installed.
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        "SIGINT"
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");
        sigterm.recv().await;
        "SIGTERM"
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    let signal = tokio::select! {
        signal = interrupt => signal,
        signal = terminate => signal,
    };
    tracing::info!(signal, "Shutdown requested, draining connections");
}
