//! Event types for the notification system

use crate::queue::{QueueId, SharedQueue};
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueEventType {
    /// A queue was created and registered in the set
    Added,
    /// A queue left the set; `expired` is true when the reaper evicted it
    Removed { expired: bool },
}

impl fmt::Display for QueueEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QueueEventType::Added => "added",
            QueueEventType::Removed { expired: false } => "removed",
            QueueEventType::Removed { expired: true } => "expired",
        };
        f.write_str(label)
    }
}

/// Lifecycle event emitted by a queue set
///
/// Carries a handle to the affected queue. For removals the handle is the
/// detached queue, so an observer can still drain whatever was left in it.
pub struct QueueEvent<T> {
    pub event_type: QueueEventType,
    pub timestamp: SystemTime,
    /// Scope of the set that emitted the event
    pub set_scope: String,
    pub queue: Arc<SharedQueue<T>>,
}

impl<T> QueueEvent<T> {
    pub fn added(set_scope: &str, queue: Arc<SharedQueue<T>>) -> Self {
        Self::new(QueueEventType::Added, set_scope, queue)
    }

    pub fn removed(set_scope: &str, queue: Arc<SharedQueue<T>>, expired: bool) -> Self {
        Self::new(QueueEventType::Removed { expired }, set_scope, queue)
    }

    fn new(event_type: QueueEventType, set_scope: &str, queue: Arc<SharedQueue<T>>) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            set_scope: set_scope.to_string(),
            queue,
        }
    }

    pub fn queue_id(&self) -> QueueId {
        self.queue.id()
    }

    pub fn is_added(&self) -> bool {
        self.event_type == QueueEventType::Added
    }

    pub fn is_removed(&self) -> bool {
        matches!(self.event_type, QueueEventType::Removed { .. })
    }

    /// True only for removals performed by the stale-queue reaper
    pub fn expired(&self) -> bool {
        matches!(self.event_type, QueueEventType::Removed { expired: true })
    }
}

impl<T> Clone for QueueEvent<T> {
    fn clone(&self) -> Self {
        Self {
            event_type: self.event_type,
            timestamp: self.timestamp,
            set_scope: self.set_scope.clone(),
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<T> fmt::Debug for QueueEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueEvent")
            .field("event_type", &self.event_type)
            .field("timestamp", &self.timestamp)
            .field("set_scope", &self.set_scope)
            .field("queue_id", &self.queue.id())
            .finish()
    }
}

/// Event filter for subscribers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventFilter {
    AddedOnly,
    /// Every removal, explicit or expired
    RemovedOnly,
    ExpiredOnly,
    All,
}

impl EventFilter {
    /// Check if an event should be accepted by this filter
    pub fn accepts<T>(&self, event: &QueueEvent<T>) -> bool {
        matches!(
            (self, event.event_type),
            (EventFilter::AddedOnly, QueueEventType::Added)
                | (EventFilter::RemovedOnly, QueueEventType::Removed { .. })
                | (EventFilter::ExpiredOnly, QueueEventType::Removed { expired: true })
                | (EventFilter::All, _)
        )
    }
}
