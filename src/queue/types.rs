//! Type definitions for the queue system
//!
//! This module contains the identifier and statistics types shared by
//! queues, queue sets and lifecycle events.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter backing [`QueueId`] allocation
static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique queue identifier
///
/// Identifiers are allocated from a monotonic counter and are never reused
/// while the process is running, so an id that has been removed from a set
/// can never alias a queue created later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueId(u64);

impl QueueId {
    pub(crate) fn next() -> Self {
        Self(NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value of the identifier
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q-{}", self.0)
    }
}

/// Point-in-time snapshot of a single queue
#[derive(Debug, Clone, PartialEq)]
pub struct QueueStats {
    /// Queue identifier
    pub queue_id: QueueId,
    /// Full scope (`<set scope>.<sub scope>`)
    pub full_scope: String,
    /// Number of buffered items
    pub count: usize,
    /// Time since the last read (seconds)
    pub seconds_since_last_read: u64,
    /// Time since the last write (seconds)
    pub seconds_since_last_write: u64,
}
