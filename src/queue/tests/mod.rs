//! Test modules for the queue system
//!
//! Tests are organized by functional area. Most suites share the fixture
//! below: one set with four queues, two of which share a sub scope.

mod core_functionality;
mod routing;

use crate::queue::{QueueSet, SharedQueue};
use std::sync::Arc;

pub(super) struct Fixture {
    pub set: QueueSet<i32>,
    pub queue1: Arc<SharedQueue<i32>>,
    pub queue2: Arc<SharedQueue<i32>>,
    pub queue3: Arc<SharedQueue<i32>>,
    pub queue4: Arc<SharedQueue<i32>>,
}

pub(super) fn make_queue_set(stale_seconds: i64) -> Fixture {
    let set = QueueSet::new("QueueSet", stale_seconds).unwrap();
    let queue1 = set.new_queue("Queue1");
    let queue2 = set.new_queue("Queue2");
    let queue3 = set.new_queue("Queue3/4");
    let queue4 = set.new_queue("Queue3/4");

    Fixture {
        set,
        queue1,
        queue2,
        queue3,
        queue4,
    }
}
