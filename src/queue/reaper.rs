//! Background reaper for stale queues
//!
//! The reaper sleeps for one staleness window, scans the set, and only then
//! re-arms its sleep, so a slow scan can never overlap the next one. It
//! holds a weak reference to the set and stops as soon as the set is dropped
//! or a stop is requested.
//!
//! The loop runs on a dedicated `sharedq-reaper` thread with its own
//! current-thread runtime, so it lives exactly as long as the set and does
//! not depend on whatever runtime (if any) the set was created in. Unit
//! tests instead spawn it on the ambient runtime when there is one, so a
//! paused tokio clock drives its scans.

use crate::queue::set::QueueSetInner;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;

const REAPER_THREAD_NAME: &str = "sharedq-reaper";

/// Handle to a running reaper task
pub(crate) struct Reaper {
    shutdown_tx: broadcast::Sender<()>,
    running: Arc<AtomicBool>,
}

/// Clears the running flag when the reap loop goes away for any reason:
/// a normal exit, a panic, or the future being dropped unpolled
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Reaper {
    /// Start reaping `inner` every `interval`
    pub(crate) fn start<T>(inner: &Arc<QueueSetInner<T>>, interval: Duration) -> Self
    where
        T: Clone + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let running = Arc::new(AtomicBool::new(true));
        let task = reap_loop(
            Arc::downgrade(inner),
            interval,
            shutdown_rx,
            RunningGuard(Arc::clone(&running)),
        );

        #[cfg(test)]
        let task = match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(task);
                return Self {
                    shutdown_tx,
                    running,
                };
            }
            Err(_) => task,
        };

        let spawned = std::thread::Builder::new()
            .name(REAPER_THREAD_NAME.to_string())
            .spawn(move || {
                match tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                {
                    Ok(runtime) => runtime.block_on(task),
                    // Dropping the task clears the running flag
                    Err(e) => log::error!("Failed to build reaper runtime: {}", e),
                }
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn {} thread: {}", REAPER_THREAD_NAME, e);
        }

        Self {
            shutdown_tx,
            running,
        }
    }

    pub(crate) fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn reap_loop<T>(
    inner: Weak<QueueSetInner<T>>,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
    _running: RunningGuard,
) where
    T: Clone + Send + 'static,
{
    log::debug!("Stale queue reaper started (interval: {:?})", interval);

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            // A stop request or a dropped sender both end the loop
            _ = shutdown_rx.recv() => break,
        }

        let Some(set) = inner.upgrade() else {
            break;
        };
        set.reap_stale();
    }

    log::debug!("Stale queue reaper stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QueueSet;

    fn wait_until_stopped(running: &AtomicBool) -> bool {
        for _ in 0..300 {
            if !running.load(Ordering::Acquire) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_running_flag_cleared_when_task_panics() {
        // No timer driver, so the first sleep panics inside the task
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let set: QueueSet<i32> = {
            let _entered = runtime.enter();
            QueueSet::new("NoTimers", 1).unwrap()
        };
        let running = set.reaper_running_flag().unwrap();

        assert!(wait_until_stopped(&running));
        assert!(!set.is_reaper_running());
    }

    #[test]
    fn test_running_flag_cleared_when_runtime_dropped() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .build()
            .unwrap();
        let set: QueueSet<i32> = {
            let _entered = runtime.enter();
            QueueSet::new("ShortLived", 30).unwrap()
        };
        assert!(set.is_reaper_running());

        drop(runtime);

        assert!(wait_until_stopped(&set.reaper_running_flag().unwrap()));
        assert!(!set.is_reaper_running());
    }

    #[test]
    fn test_running_flag_cleared_when_never_polled() {
        let running = Arc::new(AtomicBool::new(true));
        let inner: Weak<QueueSetInner<i32>> = Weak::new();
        let (_tx, rx) = broadcast::channel(1);

        let task = reap_loop(
            inner,
            Duration::from_secs(1),
            rx,
            RunningGuard(Arc::clone(&running)),
        );
        drop(task);

        assert!(!running.load(Ordering::Acquire));
    }
}
