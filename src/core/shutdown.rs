//! Shutdown coordination for the soak driver
//!
//! One broadcast channel fans a stop request out to the producer, every
//! consumer, and the reporting loop. Signal handlers feed the same channel;
//! a second signal exits immediately.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Exit status used when a second signal forces termination
const FORCED_EXIT_CODE: i32 = 130;

/// Coordinates graceful shutdown across the application
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    shutdown_requested: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        // Room for a burst of signals without lagging receivers
        let (shutdown_tx, shutdown_rx) = broadcast::channel(8);

        let coordinator = Self {
            shutdown_tx,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        };

        (coordinator, shutdown_rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::Release);
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Run `future_fn` with signal handlers installed
    ///
    /// The closure receives the coordinator (to hand out more receivers or
    /// stop early) and a receiver that fires on SIGINT/SIGTERM/SIGHUP/SIGQUIT.
    pub async fn guard<F, Fut, R, E>(future_fn: F) -> Result<R, E>
    where
        F: FnOnce(Self, broadcast::Receiver<()>) -> Fut,
        Fut: std::future::Future<Output = Result<R, E>>,
    {
        let (coordinator, shutdown_rx) = Self::new();

        setup_signal_handlers(
            coordinator.shutdown_tx.clone(),
            Arc::clone(&coordinator.shutdown_requested),
        );

        future_fn(coordinator, shutdown_rx).await
    }
}

/// Record one received signal; the second one terminates the process
fn on_signal(
    shutdown_tx: &broadcast::Sender<()>,
    shutdown_requested: &AtomicBool,
    signal_count: &AtomicUsize,
) {
    let prev = signal_count.fetch_add(1, Ordering::AcqRel);
    shutdown_requested.store(true, Ordering::Release);
    let _ = shutdown_tx.send(());
    if prev >= 1 {
        log::warn!("Second shutdown signal received; exiting");
        std::process::exit(FORCED_EXIT_CODE);
    }
    log::info!("Shutdown requested; press Ctrl-C again to force exit");
}

fn setup_signal_handlers(shutdown_tx: broadcast::Sender<()>, shutdown_requested: Arc<AtomicBool>) {
    let signal_count = Arc::new(AtomicUsize::new(0));

    #[cfg(unix)]
    {
        // Piping output into `head` should end the process quietly
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use tokio::signal::unix::{signal, SignalKind};
        let signals = [
            SignalKind::interrupt(),
            SignalKind::terminate(),
            SignalKind::hangup(),
            SignalKind::quit(),
        ];

        for kind in signals {
            let tx = shutdown_tx.clone();
            let requested = Arc::clone(&shutdown_requested);
            let counter = Arc::clone(&signal_count);

            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    while sig.recv().await.is_some() {
                        on_signal(&tx, &requested, &counter);
                    }
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                on_signal(&shutdown_tx, &shutdown_requested, &signal_count);
            }
        });
    }
}
