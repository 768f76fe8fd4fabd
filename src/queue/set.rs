//! QueueSet - scope-addressed registry of shared queues
//!
//! The QueueSet owns every queue created under one namespace. Producers call
//! its routing operations; the set selects the matching queues under its
//! registry lock and hands each one the item. A background reaper removes
//! queues that have not been read for the configured staleness window.

use crate::core::sync::lock_or_recover;
use crate::core::validation::validate_stale_seconds;
use crate::notifications::api::{EventFilter, EventReceiver, NotificationManager, QueueEvent};
use crate::queue::config::QueueSetConfig;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::reaper::Reaper;
use crate::queue::shared::SharedQueue;
use crate::queue::types::{QueueId, QueueStats};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Staleness window used when none is given
pub const DEFAULT_STALE_SECONDS: i64 = 60;

/// State shared between a QueueSet handle and its reaper task
pub(crate) struct QueueSetInner<T> {
    scope: Arc<str>,
    stale_after: Option<Duration>,
    /// Keyed by id; ids are monotonic so iteration follows creation order
    queues: Mutex<BTreeMap<QueueId, Arc<SharedQueue<T>>>>,
    notifications: Mutex<NotificationManager<T>>,
}

/// Registry of fan-out queues under a common scope
///
/// Every queue has a full scope of `<set scope>.<sub scope>`. Items can be
/// routed to every queue, to every queue under a scope prefix, to one queue
/// by id, or to every queue except an excluded list.
///
/// # Thread Safety
///
/// All collection-level operations (create, remove, route, reaper scan)
/// serialize on one registry lock. Buffer mutations serialize on each
/// queue's own lock, so consumers draining different queues never contend.
///
/// # Staleness
///
/// With a positive staleness window a reaper task wakes every window and
/// removes queues whose last read is at least one window old, emitting an
/// expired removal event for each. A window of `0` disables the reaper.
///
/// The reaper runs on its own `sharedq-reaper` thread, so a set may be
/// created inside or outside a tokio runtime, and it keeps evicting after
/// the creating runtime has shut down. It stops when the set is dropped or
/// [`QueueSet::shutdown`] is called.
///
/// # Example
///
/// ```rust
/// use sharedq::queue::QueueSet;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let set: QueueSet<String> = QueueSet::new("QueueSet", 0)?;
/// let lobby = set.new_queue("lobby");
/// let room_a = set.new_queue("rooms/a");
/// let room_b = set.new_queue("rooms/b");
///
/// // Broadcast to everything
/// assert_eq!(set.enqueue("hello".to_string()), 3);
///
/// // Only the rooms
/// assert_eq!(set.enqueue_scope("rooms only".to_string(), "QueueSet.rooms"), 2);
///
/// // Everybody except the lobby
/// assert_eq!(set.enqueue_exclude("no lobby".to_string(), &[lobby.id()]), 2);
///
/// assert_eq!(lobby.dequeue_all(), vec!["hello".to_string()]);
/// assert_eq!(room_a.count(), 3);
/// assert_eq!(room_b.count(), 3);
/// # Ok(())
/// # }
/// ```
pub struct QueueSet<T> {
    inner: Arc<QueueSetInner<T>>,
    reaper: Option<Reaper>,
}

impl<T: Clone + Send + 'static> QueueSet<T> {
    /// Create a queue set with the given scope and staleness window (seconds)
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidArgument`] if `stale_seconds` is negative.
    pub fn new(scope: impl Into<String>, stale_seconds: i64) -> QueueResult<Self> {
        let stale_after = validate_stale_seconds(stale_seconds)
            .map_err(|message| QueueError::InvalidArgument { message })?;
        Ok(Self::build(scope.into(), stale_after))
    }

    /// Create a queue set with the default staleness window
    pub fn with_scope(scope: impl Into<String>) -> Self {
        Self::build(
            scope.into(),
            Some(Duration::from_secs(DEFAULT_STALE_SECONDS as u64)),
        )
    }

    /// Create a queue set with an empty scope and the default staleness window
    pub fn unscoped() -> Self {
        Self::with_scope("")
    }

    /// Create a queue set from validated configuration
    pub fn from_config(config: &QueueSetConfig) -> QueueResult<Self> {
        Self::new(config.scope.clone(), config.stale_seconds)
    }

    fn build(scope: String, stale_after: Option<Duration>) -> Self {
        let inner = Arc::new(QueueSetInner {
            scope: Arc::from(scope),
            stale_after,
            queues: Mutex::new(BTreeMap::new()),
            notifications: Mutex::new(NotificationManager::new()),
        });

        let reaper = stale_after.map(|interval| Reaper::start(&inner, interval));

        log::debug!(
            "Queue set '{}' created (stale after: {:?})",
            inner.scope,
            stale_after
        );

        Self { inner, reaper }
    }

    /// Create a new queue under `sub_scope` and register it in the set
    ///
    /// Several queues may share a sub scope; each is an independent target.
    pub fn new_queue(&self, sub_scope: impl Into<String>) -> Arc<SharedQueue<T>> {
        self.inner.new_queue(sub_scope.into())
    }

    /// Deliver an item to every queue in the set
    ///
    /// Returns the number of queues the item was delivered to.
    pub fn enqueue(&self, item: T) -> usize {
        let scope = Arc::clone(&self.inner.scope);
        self.enqueue_scope(item, &scope)
    }

    /// Deliver an item to every queue whose full scope starts with `scope`
    pub fn enqueue_scope(&self, item: T, scope: &str) -> usize {
        self.inner
            .route(item, |queue| queue.full_scope().starts_with(scope))
    }

    /// Deliver an item to the queue with the given id, if it is in the set
    pub fn enqueue_to(&self, item: T, queue_id: QueueId) -> usize {
        self.inner.route(item, |queue| queue.id() == queue_id)
    }

    /// Deliver an item to every queue except those listed
    pub fn enqueue_exclude(&self, item: T, exclude: &[QueueId]) -> usize {
        self.inner.route(item, |queue| !exclude.contains(&queue.id()))
    }

    /// Deliver an item to every queue except the given queues
    ///
    /// Queues are compared by id, not by address.
    pub fn enqueue_exclude_queues(&self, item: T, exclude: &[&SharedQueue<T>]) -> usize {
        let exclude: Vec<QueueId> = exclude.iter().map(|queue| queue.id()).collect();
        self.enqueue_exclude(item, &exclude)
    }

    /// Look up a queue by id
    pub fn get_queue(&self, queue_id: QueueId) -> Option<Arc<SharedQueue<T>>> {
        self.inner.queues().get(&queue_id).cloned()
    }

    /// Drain the queue with the given id
    ///
    /// Returns an empty list if there is no such queue in the set.
    pub fn get_queue_items(&self, queue_id: QueueId) -> Vec<T> {
        match self.get_queue(queue_id) {
            Some(queue) => queue.dequeue_all(),
            None => Vec::new(),
        }
    }

    /// Remove a queue from the set
    ///
    /// Returns `false` if no queue with that id was registered. The removed
    /// queue's handle keeps working but no longer receives routed items.
    pub fn remove_queue(&self, queue_id: QueueId) -> bool {
        self.inner.remove_queue(queue_id)
    }

    /// Run one staleness scan now, returning the number of queues evicted
    ///
    /// This is what the background reaper does on every tick. Returns 0 when
    /// staleness is disabled for this set.
    pub fn reap_stale(&self) -> usize {
        self.inner.reap_stale()
    }

    /// Subscribe to queue lifecycle events emitted by this set
    ///
    /// Events are queued on the returned receiver in the order the
    /// collection changed; publishing never blocks on a slow subscriber.
    /// The channel is unbounded, so a subscriber that stops draining its
    /// receiver grows memory with every lifecycle change. Drop the receiver
    /// or call [`QueueSet::unsubscribe`] when no longer interested.
    pub fn subscribe(
        &self,
        subscriber_id: impl Into<String>,
        filter: EventFilter,
        source: impl Into<String>,
    ) -> EventReceiver<T> {
        self.inner
            .notifications()
            .subscribe(subscriber_id.into(), filter, source.into())
    }

    pub fn unsubscribe(&self, subscriber_id: &str) -> bool {
        self.inner.notifications().unsubscribe(subscriber_id)
    }

    /// Stop the background reaper
    ///
    /// Queues are no longer evicted automatically afterwards; `reap_stale`
    /// can still be called explicitly. Dropping the set has the same effect.
    pub fn shutdown(&self) {
        if let Some(reaper) = &self.reaper {
            reaper.stop();
            log::debug!("Queue set '{}' reaper stop requested", self.inner.scope);
        }
    }
}

impl<T> QueueSet<T> {
    /// The scope of this set
    pub fn scope(&self) -> &str {
        &self.inner.scope
    }

    /// Build the full scope a queue with `sub_scope` would have in this set
    pub fn scope_of(&self, sub_scope: &str) -> String {
        format!("{}.{}", self.inner.scope, sub_scope)
    }

    /// Staleness window, or `None` when automatic eviction is disabled
    pub fn stale_after(&self) -> Option<Duration> {
        self.inner.stale_after
    }

    pub fn queue_count(&self) -> usize {
        self.inner.queues().len()
    }

    /// Ids of all registered queues, in creation order
    pub fn queue_ids(&self) -> Vec<QueueId> {
        self.inner.queues().keys().copied().collect()
    }

    /// Total number of items buffered across all registered queues
    pub fn total_item_count(&self) -> usize {
        self.inner.queues().values().map(|queue| queue.count()).sum()
    }

    pub fn queue_stats(&self) -> Vec<QueueStats> {
        self.inner.queues().values().map(|queue| queue.stats()).collect()
    }

    pub fn is_reaper_running(&self) -> bool {
        self.reaper.as_ref().is_some_and(Reaper::is_running)
    }
}

#[cfg(test)]
impl<T> QueueSet<T> {
    pub(crate) fn reaper_running_flag(&self) -> Option<Arc<std::sync::atomic::AtomicBool>> {
        self.reaper.as_ref().map(Reaper::running_flag)
    }

    pub(crate) fn downgrade_inner(&self) -> std::sync::Weak<QueueSetInner<T>> {
        Arc::downgrade(&self.inner)
    }
}

impl<T: Clone + Send + 'static> Default for QueueSet<T> {
    fn default() -> Self {
        Self::unscoped()
    }
}

impl<T> QueueSetInner<T> {
    fn queues(&self) -> MutexGuard<'_, BTreeMap<QueueId, Arc<SharedQueue<T>>>> {
        lock_or_recover(&self.queues, "queue set registry")
    }

    fn notifications(&self) -> MutexGuard<'_, NotificationManager<T>> {
        lock_or_recover(&self.notifications, "queue set notifications")
    }

    /// Hand an event to subscribers; called with the registry lock held so
    /// events are observed in the same order as the collection changes
    fn notify(&self, event: QueueEvent<T>) {
        if let Err(e) = self.notifications().publish(event) {
            log::debug!("Queue set '{}': {}", self.scope, e);
        }
    }

    fn new_queue(&self, sub_scope: String) -> Arc<SharedQueue<T>> {
        let queue = Arc::new(SharedQueue::new(sub_scope, Arc::clone(&self.scope)));

        let mut queues = self.queues();
        queues.insert(queue.id(), Arc::clone(&queue));
        self.notify(QueueEvent::added(&self.scope, Arc::clone(&queue)));
        drop(queues);

        log::debug!("Queue {} created with scope '{}'", queue.id(), queue.full_scope());
        queue
    }

    fn remove_queue(&self, queue_id: QueueId) -> bool {
        let mut queues = self.queues();
        match queues.remove(&queue_id) {
            Some(queue) => {
                self.notify(QueueEvent::removed(&self.scope, queue, false));
                log::debug!("Queue {} removed from set '{}'", queue_id, self.scope);
                true
            }
            None => false,
        }
    }
}

impl<T: Clone> QueueSetInner<T> {
    /// Select matching queues and enqueue the item on each, under the registry lock
    fn route<F>(&self, item: T, predicate: F) -> usize
    where
        F: Fn(&SharedQueue<T>) -> bool,
    {
        let queues = self.queues();
        let targets: Vec<&Arc<SharedQueue<T>>> =
            queues.values().filter(|queue| predicate(queue)).collect();

        if let Some((last, rest)) = targets.split_last() {
            for queue in rest {
                queue.enqueue(item.clone());
            }
            last.enqueue(item);
        }

        log::trace!(
            "Queue set '{}' routed item to {} of {} queues",
            self.scope,
            targets.len(),
            queues.len()
        );
        targets.len()
    }

    pub(crate) fn reap_stale(&self) -> usize {
        let Some(stale_after) = self.stale_after else {
            return 0;
        };

        let mut queues = self.queues();
        let now = Instant::now();
        let expired: Vec<QueueId> = queues
            .values()
            .filter(|queue| now.saturating_duration_since(queue.last_read_time()) >= stale_after)
            .map(|queue| queue.id())
            .collect();

        for queue_id in &expired {
            if let Some(queue) = queues.remove(queue_id) {
                log::debug!(
                    "Queue {} ('{}') expired after {:?} without a read",
                    queue_id,
                    queue.full_scope(),
                    stale_after
                );
                self.notify(QueueEvent::removed(&self.scope, queue, true));
            }
        }

        if !expired.is_empty() {
            log::info!(
                "Queue set '{}' reaped {} stale queue(s), {} remaining",
                self.scope,
                expired.len(),
                queues.len()
            );
        }

        expired.len()
    }
}
