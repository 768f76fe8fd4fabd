//! Errors raised while delivering queue lifecycle events

use crate::notifications::event::QueueEventType;
use crate::queue::QueueId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// Some subscribers had dropped their receivers and were unsubscribed
    ///
    /// Every other matching subscriber still received the event.
    ClosedSubscribers {
        event_type: QueueEventType,
        queue_id: QueueId,
        closed: Vec<String>,
    },
}

impl fmt::Display for NotificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationError::ClosedSubscribers {
                event_type,
                queue_id,
                closed,
            } => write!(
                f,
                "{} event for queue {} missed {} closed subscriber(s), now unsubscribed: {}",
                event_type,
                queue_id,
                closed.len(),
                closed.join(", ")
            ),
        }
    }
}

impl std::error::Error for NotificationError {}

impl crate::core::error_handling::ContextualError for NotificationError {
    // A closed receiver is the subscriber's own doing, nothing to report to the user
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}
