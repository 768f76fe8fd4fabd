//! Scope-Addressed Fan-Out Queues
//!
//! A queue set registers any number of independent consumer queues under a
//! shared namespace. Producers publish items that are routed to one, several,
//! or all of those queues; consumers drain their own queue without blocking.
//! Queues that go unread for the configured staleness window are reclaimed
//! automatically.
//!
//! # Architecture
//!
//! ```text
//!   Producer                         QueueSet "chat"  (registry lock)
//!      │ enqueue / enqueue_scope     ┌──────────────────────────────────┐
//!      │ enqueue_to / enqueue_exclude│ chat.lobby    [ a │ b │ c ]      │──▶ Consumer 1
//!      └────────────────────────────▶│ chat.rooms/a  [ a │ c ]          │──▶ Consumer 2
//!                                    │ chat.rooms/b  [ a ]              │──▶ Consumer 3
//!                                    └───────────────┬──────────────────┘
//!                                                    │ every stale window
//!                                              Reaper: evict queues
//!                                              unread for >= window
//! ```
//!
//! Routing selects target queues under the registry lock and enqueues on each
//! under that queue's own lock. Ordering is FIFO within a queue; there is no
//! ordering relationship between different queues.
//!
//! # Example Usage
//!
//! ```rust
//! use sharedq::queue::QueueSet;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let set: QueueSet<u32> = QueueSet::new("QueueSet", 0)?;
//! let first = set.new_queue("Queue1");
//! let second = set.new_queue("Queue2");
//!
//! set.enqueue(100);
//! set.enqueue_to(200, first.id());
//!
//! assert_eq!(first.dequeue_all(), vec![100, 200]);
//! assert_eq!(second.dequeue_all(), vec![100]);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod reaper;
mod set;
mod shared;
mod types;

pub mod api;

pub use config::QueueSetConfig;
pub use error::{QueueError, QueueResult};
pub use set::{QueueSet, DEFAULT_STALE_SECONDS};
pub use shared::SharedQueue;
pub use types::{QueueId, QueueStats};

#[cfg(test)]
mod tests;
