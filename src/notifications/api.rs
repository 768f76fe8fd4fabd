//! Public API for the notification system
//!
//! This module provides the complete public API for queue lifecycle
//! notifications. External modules should import from here rather than
//! directly from internal modules.
//!
//! Each [`QueueSet`](crate::queue::QueueSet) owns its own
//! [`NotificationManager`]; subscribe through
//! [`QueueSet::subscribe`](crate::queue::QueueSet::subscribe).

// Core event types and filters
pub use crate::notifications::event::{EventFilter, QueueEvent, QueueEventType};

// Manager and errors
pub use crate::notifications::error::NotificationError;
pub use crate::notifications::manager::{EventReceiver, NotificationManager};

// Statistics
pub use crate::notifications::traits::SubscriberStatistics;
