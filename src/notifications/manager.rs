//! NotificationManager implementation
//!
//! Every subscriber owns an unbounded channel. Publishing only enqueues the
//! event on each matching channel, so it never waits on a subscriber: the
//! event is handed off inline with the operation that produced it and the
//! subscriber processes it whenever it next polls its receiver.

use crate::notifications::error::NotificationError;
use crate::notifications::event::{EventFilter, QueueEvent};
use crate::notifications::traits::SubscriberStatistics;
use std::collections::HashMap;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Receiving half handed to subscribers
pub type EventReceiver<T> = UnboundedReceiver<QueueEvent<T>>;

struct SubscriberInfo<T> {
    filter: EventFilter,
    source: String,
    sender: UnboundedSender<QueueEvent<T>>,
    statistics: SubscriberStatistics,
}

pub struct NotificationManager<T> {
    subscribers: HashMap<String, SubscriberInfo<T>>,
}

impl<T> Default for NotificationManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NotificationManager<T> {
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }

    /// Register a subscriber and return the receiving end of its channel
    ///
    /// Subscribing again with an existing id replaces the old subscription;
    /// the previous receiver will see its channel closed.
    pub fn subscribe(
        &mut self,
        subscriber_id: String,
        filter: EventFilter,
        source: String,
    ) -> EventReceiver<T> {
        let (sender, receiver) = unbounded_channel();

        let subscriber_info = SubscriberInfo {
            filter,
            source: source.clone(),
            sender,
            statistics: SubscriberStatistics::new(),
        };

        // Warn if overwriting existing subscriber
        if let Some(existing) = self.subscribers.insert(subscriber_id.clone(), subscriber_info) {
            log::warn!(
                "Subscriber '{}' replaced existing subscription (source: {} -> {})",
                subscriber_id,
                existing.source,
                source
            );
        } else {
            log::debug!("Subscriber '{}' registered (source: {})", subscriber_id, source);
        }

        receiver
    }

    pub fn unsubscribe(&mut self, subscriber_id: &str) -> bool {
        self.subscribers.remove(subscriber_id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn has_subscriber(&self, subscriber_id: &str) -> bool {
        self.subscribers.contains_key(subscriber_id)
    }

    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
    }

    pub fn statistics(&self, subscriber_id: &str) -> Option<&SubscriberStatistics> {
        self.subscribers.get(subscriber_id).map(|info| &info.statistics)
    }

    /// Deliver an event to every subscriber whose filter accepts it
    ///
    /// Returns the number of subscribers the event was handed to. Subscribers
    /// whose receiver has been dropped are pruned and reported through
    /// [`NotificationError::ClosedSubscribers`]; delivery to the remaining
    /// subscribers still happens.
    pub fn publish(&mut self, event: QueueEvent<T>) -> Result<usize, NotificationError> {
        let mut closed = Vec::new();
        let mut delivered = 0;

        for (subscriber_id, subscriber_info) in &self.subscribers {
            // Check if the event matches the subscriber's filter
            if !subscriber_info.filter.accepts(&event) {
                continue;
            }

            if subscriber_info.sender.send(event.clone()).is_err() {
                // Channel is closed, mark for removal
                closed.push(subscriber_id.clone());
            } else {
                subscriber_info.statistics.record_event_delivered();
                delivered += 1;
            }
        }

        // Remove subscribers with closed channels
        for subscriber_id in &closed {
            self.subscribers.remove(subscriber_id);
        }

        if !closed.is_empty() {
            return Err(NotificationError::ClosedSubscribers {
                event_type: event.event_type,
                queue_id: event.queue_id(),
                closed,
            });
        }

        Ok(delivered)
    }
}
