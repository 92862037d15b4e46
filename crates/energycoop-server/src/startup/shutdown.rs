//! Stopping the server and the scheduler together
//!
//! An OS termination signal is turned into one broadcast. The HTTP server
//! loop and each cron job hold a receiver and wind down when it fires.

use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// One-shot stop notice fanned out to the HTTP server and every scheduled job
#[derive(Clone)]
pub struct ShutdownSignal {
    sender: broadcast::Sender<()>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender }
    }

    /// A receiver that resolves once `shutdown` is called. Subscribe before
    /// the signal fires; later subscribers miss it.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    pub fn shutdown(&self) {
        // No subscribers left is not an error at this point
        let _ = self.sender.send(());
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves with the name of the first termination signal the process gets.
/// A handler that cannot be installed is logged and never resolves.
async fn termination_signal() -> &'static str {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => "Ctrl+C",
        _ = terminate => "SIGTERM",
    }
}

/// Starts listening for Ctrl+C and SIGTERM in the background.
///
/// The returned signal fires on the first of them. `main` hands receivers
/// to the scheduler jobs and to `run_with_shutdown` before the server starts.
pub async fn wait_for_shutdown_signal() -> ShutdownSignal {
    let shutdown = ShutdownSignal::new();
    let notifier = shutdown.clone();

    tokio::spawn(async move {
        let name = termination_signal().await;
        info!(signal = name, "Stopping energy co-op server");
        notifier.shutdown();
    });

    shutdown
}

/// Drives the HTTP server until it exits on its own (`Some`) or the
/// shutdown signal arrives first (`None`). On `None` the caller still owns
/// the server handle and stops it.
pub async fn run_with_shutdown<F, T>(
    server: F,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Option<T>
where
    F: std::future::Future<Output = T>,
{
    tokio::select! {
        result = server => Some(result),
        _ = shutdown_rx.recv() => {
            warn!("Shutdown requested while the server was running");
            None
        }
    }
}
