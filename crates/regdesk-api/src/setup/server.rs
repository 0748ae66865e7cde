//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use regdesk_core::Config;
use std::time::Duration;
use tokio_util::task::TaskTracker;

/// Extra time past the submission deadline for appends and cleanup to finish.
const TASK_DRAIN_GRACE: Duration = Duration::from_secs(30);

/// Start the server with graceful shutdown
///
/// After the listener stops, in-flight submissions and cleanup deletes on
/// `tasks` get until the submission deadline plus a grace period to finish.
pub async fn start_server(config: &Config, app: Router, tasks: TaskTracker) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let retry = config.retry();
    tracing::info!(
        max_file_mb = config.max_file_size_bytes() / 1024 / 1024,
        storage_backend = %config.storage_backend(),
        table_backend = %config.table_backend(),
        retry_max_attempts = retry.max_attempts,
        submission_timeout_secs = config.submission_timeout_secs(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tasks.close();
    let drain = Duration::from_secs(config.submission_timeout_secs()) + TASK_DRAIN_GRACE;
    tracing::info!(pending_tasks = tasks.len(), "Waiting for background tasks");
    if tokio::time::timeout(drain, tasks.wait()).await.is_err() {
        tracing::warn!(
            pending_tasks = tasks.len(),
            "Background tasks still running at shutdown"
        );
    }

    regdesk_infra::shutdown_telemetry().await;

    Ok(())
}

/// Resolves on Ctrl+C (SIGINT) or SIGTERM.
///
/// # Panics
/// Panics if a signal handler cannot be installed.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
