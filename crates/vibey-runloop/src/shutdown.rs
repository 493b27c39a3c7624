//! Interrupt handling.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{RunLoopError, RunLoopResult};

/// Cancel `token` on SIGINT or SIGTERM.
#[cfg(unix)]
pub fn install_interrupt_handler(token: CancellationToken) -> RunLoopResult<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm =
        signal(SignalKind::terminate()).map_err(|e| RunLoopError::SignalSetup(e.to_string()))?;
    let mut sigint =
        signal(SignalKind::interrupt()).map_err(|e| RunLoopError::SignalSetup(e.to_string()))?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => info!("Received SIGINT, shutting down"),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
        }
        token.cancel();
    });
    Ok(())
}

/// Cancel `token` on Ctrl+C.
#[cfg(not(unix))]
pub fn install_interrupt_handler(token: CancellationToken) -> RunLoopResult<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
            token.cancel();
        }
    });
    Ok(())
}
