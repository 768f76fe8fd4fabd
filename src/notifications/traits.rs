//! Subscriber bookkeeping for the notification system

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Instant;

/// Statistics tracking for a subscriber
pub struct SubscriberStatistics {
    events_delivered: AtomicUsize,
    last_event_time: RwLock<Option<Instant>>,
}

impl Default for SubscriberStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriberStatistics {
    pub fn new() -> Self {
        Self {
            events_delivered: AtomicUsize::new(0),
            last_event_time: RwLock::new(None),
        }
    }

    pub fn events_delivered(&self) -> usize {
        self.events_delivered.load(Ordering::Relaxed)
    }

    pub fn record_event_delivered(&self) {
        self.events_delivered.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut time) = self.last_event_time.write() {
            *time = Some(Instant::now());
        }
    }

    pub fn last_event_time(&self) -> Option<Instant> {
        *self.last_event_time.read().ok()?
    }
}
