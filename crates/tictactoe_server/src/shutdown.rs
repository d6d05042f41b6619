//! Graceful shutdown trigger for the HTTP server.

use std::fmt::Display;
use std::future::Future;

use tracing::{info, warn};

/// Completes once `signal` fires.
///
/// If the signal cannot be installed the future never completes, so the
/// server keeps running instead of stopping right after startup.
pub async fn shutdown_on<F, E>(signal: F)
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "Failed to listen for shutdown signal, graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server...");
}
