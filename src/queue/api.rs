//! Public API for the queue system
//!
//! This module provides the complete public API for queue sets. External
//! modules should import from here rather than directly from internal
//! modules. See the module documentation for usage and architecture.

// Core queue components
pub use crate::queue::set::{QueueSet, DEFAULT_STALE_SECONDS};
pub use crate::queue::shared::SharedQueue;

// Identifiers and statistics
pub use crate::queue::types::{QueueId, QueueStats};

// Configuration
pub use crate::queue::config::QueueSetConfig;

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};

// Lifecycle notifications emitted by queue sets
pub use crate::notifications::api::{EventFilter, EventReceiver, QueueEvent, QueueEventType};
