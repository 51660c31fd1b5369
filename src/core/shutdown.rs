//! Shutdown coordination
//!
//! Turns process signals into a broadcast that long waits (the scan poll loop
//! in particular) can race against. A second signal forces an immediate exit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Exit status used when a second signal forces termination
pub const FORCED_EXIT_CODE: i32 = 130;

/// Coordinates graceful shutdown across the application
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    /// Create a new coordinator and its first receiver
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(8);
        (Self { shutdown_tx }, shutdown_rx)
    }

    /// Notify every receiver that shutdown was requested
    pub fn trigger_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Run a future with signal handlers installed, handing it the shutdown receiver
    pub async fn guard<F, Fut, R, E>(future_fn: F) -> Result<R, E>
    where
        F: FnOnce(broadcast::Receiver<()>) -> Fut,
        Fut: std::future::Future<Output = Result<R, E>>,
    {
        let (coordinator, shutdown_rx) = Self::new();
        setup_signal_handlers(&coordinator);
        future_fn(shutdown_rx).await
    }
}

fn notify(coordinator: &ShutdownCoordinator, signal_count: &AtomicUsize, source: &str) {
    let previous = signal_count.fetch_add(1, Ordering::AcqRel);
    coordinator.trigger_shutdown();
    if previous >= 1 {
        log::warn!("{} received again; exiting", source);
        std::process::exit(FORCED_EXIT_CODE);
    }
    log::warn!("{} received; stopping scan", source);
}

fn setup_signal_handlers(coordinator: &ShutdownCoordinator) {
    let signal_count = Arc::new(AtomicUsize::new(0));

    #[cfg(unix)]
    {
        // Restore default SIGPIPE so piping output into `head` terminates quietly
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use tokio::signal::unix::{signal, SignalKind};
        let signals = [
            (SignalKind::interrupt(), "SIGINT"),
            (SignalKind::terminate(), "SIGTERM"),
            (SignalKind::hangup(), "SIGHUP"),
            (SignalKind::quit(), "SIGQUIT"),
        ];

        for (kind, name) in signals {
            let coordinator = coordinator.clone();
            let counter = signal_count.clone();

            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    while sig.recv().await.is_some() {
                        notify(&coordinator, &counter, name);
                    }
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                notify(&coordinator, &signal_count, "Ctrl-C");
            }
        });
    }
}
