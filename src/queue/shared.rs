//! SharedQueue - a single FIFO fan-out target inside a queue set
//!
//! Each queue owns its buffer and its read/write timestamps behind one
//! mutex, so every mutation (enqueue, dequeue-one, dequeue-all, clear) is
//! atomic with respect to every other operation on the same queue. Queues
//! never contend with each other: two producers writing to different queues
//! take different locks.

use crate::core::sync::lock_or_recover;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::types::{QueueId, QueueStats};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Buffer and access timestamps, guarded together
#[derive(Debug)]
struct QueueState<T> {
    buffer: VecDeque<T>,
    last_read: Instant,
    last_write: Instant,
}

impl<T> QueueState<T> {
    fn touch_read(&mut self) {
        self.last_read = Instant::now();
    }

    fn touch_write(&mut self) {
        self.last_write = Instant::now();
    }
}

/// A consumer queue registered in a [`QueueSet`](crate::queue::QueueSet)
///
/// Queues are created through [`QueueSet::new_queue`](crate::queue::QueueSet::new_queue)
/// and handed out as `Arc<SharedQueue<T>>`. A consumer keeps its handle and
/// drains it without blocking; producers reach it through the set's routing
/// operations.
///
/// Once a queue has been removed from its set (explicitly or by the reaper)
/// the handle stays fully usable, but the set no longer routes items to it.
///
/// # Example
///
/// ```rust
/// use sharedq::queue::QueueSet;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let set: QueueSet<u32> = QueueSet::new("chat", 0)?;
/// let queue = set.new_queue("room-1");
///
/// set.enqueue(7);
/// assert_eq!(queue.full_scope(), "chat.room-1");
/// assert_eq!(queue.dequeue_one(), Some(7));
/// assert_eq!(queue.dequeue_one(), None);
/// # Ok(())
/// # }
/// ```
pub struct SharedQueue<T> {
    id: QueueId,
    sub_scope: String,
    /// Scope of the owning set, shared rather than owned
    set_scope: Arc<str>,
    state: Mutex<QueueState<T>>,
}

impl<T> SharedQueue<T> {
    pub(crate) fn new(sub_scope: String, set_scope: Arc<str>) -> Self {
        let now = Instant::now();
        Self {
            id: QueueId::next(),
            sub_scope,
            set_scope,
            state: Mutex::new(QueueState {
                buffer: VecDeque::new(),
                last_read: now,
                last_write: now,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, QueueState<T>> {
        lock_or_recover(&self.state, "shared queue state")
    }

    /// The unique queue identifier
    pub fn id(&self) -> QueueId {
        self.id
    }

    /// The queue's own scope, relative to its set
    pub fn sub_scope(&self) -> &str {
        &self.sub_scope
    }

    /// The full scope of this queue: `<set scope>.<sub scope>`
    pub fn full_scope(&self) -> String {
        format!("{}.{}", self.set_scope, self.sub_scope)
    }

    /// Append a single item to the tail of the queue
    pub fn enqueue(&self, item: T) {
        let mut state = self.state();
        state.touch_write();
        state.buffer.push_back(item);
    }

    /// Append several items, in iteration order, as one atomic write
    pub fn enqueue_all<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut state = self.state();
        state.touch_write();
        state.buffer.extend(items);
    }

    /// Remove and return the head item, or `None` if the queue is empty
    ///
    /// The read timestamp is refreshed even when nothing is returned: polling
    /// an empty queue still counts as activity for staleness purposes.
    pub fn dequeue_one(&self) -> Option<T> {
        let mut state = self.state();
        state.touch_read();
        state.buffer.pop_front()
    }

    /// Atomically drain every buffered item in FIFO order
    pub fn dequeue_all(&self) -> Vec<T> {
        let mut state = self.state();
        state.touch_read();
        state.buffer.drain(..).collect()
    }

    /// Discard all buffered items
    pub fn clear(&self) {
        self.state().buffer.clear();
    }

    /// Number of buffered items
    pub fn count(&self) -> usize {
        self.state().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().buffer.is_empty()
    }

    /// Last time an item was read (or a read was attempted)
    pub fn last_read_time(&self) -> Instant {
        self.state().last_read
    }

    /// Last time an item was written
    pub fn last_write_time(&self) -> Instant {
        self.state().last_write
    }

    /// Last time the queue was read from or written to
    pub fn last_access_time(&self) -> Instant {
        let state = self.state();
        state.last_read.max(state.last_write)
    }

    /// Time elapsed since the last read
    pub fn idle_for(&self) -> Duration {
        self.last_read_time().elapsed()
    }

    /// Snapshot of this queue's counters
    pub fn stats(&self) -> QueueStats {
        let (count, since_read, since_write) = {
            let state = self.state();
            (
                state.buffer.len(),
                state.last_read.elapsed(),
                state.last_write.elapsed(),
            )
        };

        QueueStats {
            queue_id: self.id,
            full_scope: self.full_scope(),
            count,
            seconds_since_last_read: since_read.as_secs(),
            seconds_since_last_write: since_write.as_secs(),
        }
    }
}

impl<T: Clone> SharedQueue<T> {
    /// Return a copy of the head item without removing it
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] when there is nothing buffered.
    pub fn peek(&self) -> QueueResult<T> {
        self.try_peek()
            .ok_or(QueueError::Empty { queue_id: self.id })
    }

    /// Return a copy of the head item, or `None` if the queue is empty
    pub fn try_peek(&self) -> Option<T> {
        self.state().buffer.front().cloned()
    }
}

impl<T> fmt::Debug for SharedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedQueue")
            .field("id", &self.id)
            .field("full_scope", &self.full_scope())
            .field("count", &self.count())
            .finish()
    }
}

impl<T> fmt::Display for SharedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
