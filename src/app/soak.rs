//! Soak/demo driver
//!
//! Builds one queue set, attaches a lifecycle logger, and runs a producer
//! against per-queue consumers until the item budget, the time budget, or a
//! shutdown request runs out. Every other queue's consumer goes quiet half
//! way through so the reaper has something to evict.

use crate::app::cli::config::SoakConfig;
use crate::core::shutdown::ShutdownCoordinator;
use crate::notifications::api::{EventFilter, EventReceiver, QueueEventType};
use crate::queue::{QueueId, QueueResult, QueueSet, QueueSetConfig, SharedQueue};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};

type Item = Arc<String>;

/// Outcome of a soak run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoakReport {
    pub set_scope: String,
    pub queues_created: usize,
    /// Items handed to the queue set
    pub produced: usize,
    /// Sum over items of the number of queues each one reached
    pub deliveries: usize,
    pub consumed: usize,
    /// Items still buffered in any queue handle at the end of the run
    pub stranded: usize,
    pub added_events: usize,
    pub removed_events: usize,
    pub expired_events: usize,
    pub remaining_queues: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
struct LifecycleCounts {
    added: usize,
    removed: usize,
    expired: usize,
}

/// Routing used for the n-th produced item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteMode {
    Broadcast,
    Scope,
    Direct,
    Exclude,
}

impl RouteMode {
    const ROTATION: [RouteMode; 4] = [
        RouteMode::Broadcast,
        RouteMode::Scope,
        RouteMode::Direct,
        RouteMode::Exclude,
    ];

    fn for_item(n: usize) -> Self {
        Self::ROTATION[n % Self::ROTATION.len()]
    }
}

/// Run one soak pass and report what happened
///
/// The run ends when `soak.duration()` elapses or the coordinator fires,
/// whichever is first.
pub async fn run_soak(
    set_config: &QueueSetConfig,
    soak: &SoakConfig,
    coordinator: &ShutdownCoordinator,
) -> QueueResult<SoakReport> {
    soak.validate()?;
    let started = Instant::now();
    let set: Arc<QueueSet<Item>> = Arc::new(QueueSet::from_config(set_config)?);
    let lifecycle = tokio::spawn(log_lifecycle(set.subscribe(
        "soak-lifecycle",
        EventFilter::All,
        "app:soak",
    )));

    let sub_scopes = soak.sub_scope_names();
    let mut queues: Vec<Arc<SharedQueue<Item>>> = Vec::new();
    for sub_scope in &sub_scopes {
        for _ in 0..soak.consumers_per_scope {
            queues.push(set.new_queue(sub_scope.as_str()));
        }
    }
    log::info!(
        "Soak started: {} queues under {} sub scopes of '{}' (stale after {:?})",
        queues.len(),
        sub_scopes.len(),
        set.scope(),
        set.stale_after()
    );

    let idle_after = soak.duration() / 2;
    let mut consumers = JoinSet::new();
    for (index, queue) in queues.iter().enumerate() {
        let idle_after = (index % 2 == 1).then_some(idle_after);
        consumers.spawn(consume(
            Arc::clone(queue),
            soak.interval(),
            idle_after,
            coordinator.subscribe(),
        ));
    }

    let producer = tokio::spawn(produce(
        Arc::clone(&set),
        sub_scopes,
        soak.items,
        soak.interval(),
        coordinator.subscribe(),
    ));

    // A receiver only sees requests sent after it subscribed
    let mut shutdown_rx = coordinator.subscribe();
    if !coordinator.is_shutdown_requested() {
        tokio::select! {
            _ = tokio::time::sleep(soak.duration()) => {
                log::info!("Soak duration of {:?} reached", soak.duration());
            }
            _ = shutdown_rx.recv() => {
                log::info!("Soak interrupted");
            }
        }
    }
    coordinator.trigger_shutdown();

    let (produced, deliveries) = producer.await.unwrap_or_else(|e| {
        log::error!("Producer task failed: {}", e);
        (0, 0)
    });

    let mut consumed = 0;
    while let Some(result) = consumers.join_next().await {
        match result {
            Ok(count) => consumed += count,
            Err(e) => log::error!("Consumer task failed: {}", e),
        }
    }

    set.shutdown();
    let remaining_queues = set.queue_count();
    let set_scope = set.scope().to_string();
    // Closing the set closes the lifecycle channel
    drop(set);
    let counts = lifecycle.await.unwrap_or_default();

    Ok(SoakReport {
        set_scope,
        queues_created: queues.len(),
        produced,
        deliveries,
        consumed,
        stranded: queues.iter().map(|queue| queue.count()).sum(),
        added_events: counts.added,
        removed_events: counts.removed,
        expired_events: counts.expired,
        remaining_queues,
        elapsed: started.elapsed(),
    })
}

/// Publish `items` items, rotating through the routing operations
async fn produce(
    set: Arc<QueueSet<Item>>,
    sub_scopes: Vec<String>,
    items: usize,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> (usize, usize) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut produced = 0;
    let mut deliveries = 0;

    while produced < items {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown_rx.recv() => break,
        }

        let item = Arc::new(format!("item-{}", produced));
        let queue_ids: Vec<QueueId> = set.queue_ids();
        let delivered = match RouteMode::for_item(produced) {
            RouteMode::Broadcast => set.enqueue(item),
            RouteMode::Scope => {
                let sub_scope = &sub_scopes[produced % sub_scopes.len()];
                set.enqueue_scope(item, &set.scope_of(sub_scope))
            }
            RouteMode::Direct => match queue_ids.get(produced % queue_ids.len().max(1)) {
                Some(queue_id) => set.enqueue_to(item, *queue_id),
                None => 0,
            },
            RouteMode::Exclude => set.enqueue_exclude(item, &queue_ids[..queue_ids.len().min(1)]),
        };

        produced += 1;
        deliveries += delivered;
    }

    log::debug!("Producer finished: {} items, {} deliveries", produced, deliveries);
    (produced, deliveries)
}

/// Drain `queue` every `interval` until shutdown, or until `idle_after`
/// has passed, after which the queue is left alone for the reaper
async fn consume(
    queue: Arc<SharedQueue<Item>>,
    interval: Duration,
    idle_after: Option<Duration>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> usize {
    let started = Instant::now();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut consumed = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown_rx.recv() => break,
        }

        if idle_after.is_some_and(|idle| started.elapsed() >= idle) {
            log::debug!("Consumer for {} going idle", queue.full_scope());
            break;
        }

        consumed += queue.dequeue_all().len();
    }

    consumed
}

async fn log_lifecycle(mut events: EventReceiver<Item>) -> LifecycleCounts {
    let mut counts = LifecycleCounts::default();

    while let Some(event) = events.recv().await {
        match event.event_type {
            QueueEventType::Added => {
                counts.added += 1;
                log::debug!("Queue {} added as '{}'", event.queue_id(), event.queue.full_scope());
            }
            QueueEventType::Removed { expired: true } => {
                counts.expired += 1;
                log::info!(
                    "Queue {} ('{}') expired with {} item(s) left",
                    event.queue_id(),
                    event.queue.full_scope(),
                    event.queue.count()
                );
            }
            QueueEventType::Removed { expired: false } => {
                counts.removed += 1;
                log::info!("Queue {} removed", event.queue_id());
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soak_config(duration_secs: u64) -> SoakConfig {
        SoakConfig {
            sub_scopes: vec!["lobby".to_string(), "rooms/a".to_string()],
            queues: 2,
            consumers_per_scope: 2,
            items: 40,
            interval_ms: 10,
            duration_secs,
        }
    }

    #[test]
    fn test_route_mode_rotation() {
        assert_eq!(RouteMode::for_item(0), RouteMode::Broadcast);
        assert_eq!(RouteMode::for_item(1), RouteMode::Scope);
        assert_eq!(RouteMode::for_item(2), RouteMode::Direct);
        assert_eq!(RouteMode::for_item(3), RouteMode::Exclude);
        assert_eq!(RouteMode::for_item(4), RouteMode::Broadcast);
    }

    #[tokio::test(start_paused = true)]
    async fn test_soak_accounts_for_every_delivery() {
        let (coordinator, _rx) = ShutdownCoordinator::new();
        let set_config = QueueSetConfig::new("Soak", 1);

        let report = run_soak(&set_config, &soak_config(6), &coordinator)
            .await
            .unwrap();

        assert_eq!(report.set_scope, "Soak");
        assert_eq!(report.queues_created, 4);
        assert_eq!(report.produced, 40);
        assert!(report.deliveries > 0);
        assert_eq!(report.deliveries, report.consumed + report.stranded);

        // The two idle queues are reaped, the active ones survive
        assert_eq!(report.added_events, 4);
        assert_eq!(report.expired_events, 2);
        assert_eq!(report.removed_events, 0);
        assert_eq!(report.remaining_queues, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_soak_without_reaper_keeps_queues() {
        let (coordinator, _rx) = ShutdownCoordinator::new();
        let set_config = QueueSetConfig::new("Soak", 0);

        let report = run_soak(&set_config, &soak_config(2), &coordinator)
            .await
            .unwrap();

        assert_eq!(report.expired_events, 0);
        assert_eq!(report.remaining_queues, 4);
        assert_eq!(report.deliveries, report.consumed + report.stranded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_soak_stops_on_shutdown() {
        let (coordinator, _rx) = ShutdownCoordinator::new();
        let set_config = QueueSetConfig::new("Soak", 0);
        coordinator.trigger_shutdown();

        let report = run_soak(&set_config, &soak_config(3600), &coordinator)
            .await
            .unwrap();

        assert!(report.elapsed < Duration::from_secs(3600));
        assert!(report.produced < 40);
    }

    #[tokio::test]
    async fn test_soak_rejects_negative_stale_time() {
        let (coordinator, _rx) = ShutdownCoordinator::new();
        let set_config = QueueSetConfig::new("Soak", -3);

        assert!(run_soak(&set_config, &soak_config(1), &coordinator)
            .await
            .is_err());
    }
}
