//! Tests for item routing: broadcast, scope prefix, id, and exclusion

#[cfg(test)]
mod tests {
    use crate::queue::tests::make_queue_set;

    #[test]
    fn test_broadcast_item_default() {
        let f = make_queue_set(0);

        assert_eq!(f.set.enqueue(100), 4);

        assert_eq!(f.queue1.dequeue_one(), Some(100));
        assert_eq!(f.queue2.dequeue_one(), Some(100));
        assert_eq!(f.queue3.dequeue_one(), Some(100));
        assert_eq!(f.queue4.dequeue_one(), Some(100));
    }

    #[test]
    fn test_broadcast_item_by_set_scope() {
        let f = make_queue_set(0);

        assert_eq!(f.set.enqueue_scope(110, f.set.scope()), 4);

        for queue in [&f.queue1, &f.queue2, &f.queue3, &f.queue4] {
            assert_eq!(queue.dequeue_one(), Some(110));
        }
    }

    #[test]
    fn test_broadcast_item_by_queue_scope() {
        let f = make_queue_set(0);

        // Queues 3 and 4 share a sub scope, so both receive it
        assert_eq!(f.set.enqueue_scope(120, &f.queue3.full_scope()), 2);

        assert_eq!(f.queue1.dequeue_one(), None);
        assert_eq!(f.queue2.dequeue_one(), None);
        assert_eq!(f.queue3.dequeue_one(), Some(120));
        assert_eq!(f.queue4.dequeue_one(), Some(120));
    }

    #[test]
    fn test_scope_routing_leaves_unrelated_counts_unchanged() {
        let f = make_queue_set(0);
        f.set.enqueue(1);

        f.set.enqueue_scope(2, "QueueSet.Queue2");

        assert_eq!(f.queue1.count(), 1);
        assert_eq!(f.queue2.count(), 2);
        assert_eq!(f.queue3.count(), 1);
        assert_eq!(f.queue4.count(), 1);
    }

    #[test]
    fn test_scope_routing_is_a_plain_prefix_match() {
        let f = make_queue_set(0);
        let queue10 = f.set.new_queue("Queue10");

        // "QueueSet.Queue1" is a prefix of "QueueSet.Queue10" as well
        assert_eq!(f.set.enqueue_scope(5, "QueueSet.Queue1"), 2);
        assert_eq!(f.queue1.count(), 1);
        assert_eq!(queue10.count(), 1);

        // "QueueSet.Queue" reaches everything
        assert_eq!(f.set.enqueue_scope(6, "QueueSet.Queue"), 5);
    }

    #[test]
    fn test_private_item_by_queue_id() {
        let f = make_queue_set(0);

        assert_eq!(f.set.enqueue_to(200, f.queue1.id()), 1);

        assert_eq!(f.queue1.dequeue_one(), Some(200));
        assert_eq!(f.queue2.dequeue_one(), None);
        assert_eq!(f.queue3.count(), 0);
        assert_eq!(f.queue4.count(), 0);
    }

    #[test]
    fn test_excluded_queue_broadcast_by_id() {
        let f = make_queue_set(0);

        let delivered = f
            .set
            .enqueue_exclude(600, &[f.queue1.id(), f.queue2.id()]);

        assert_eq!(delivered, 2);
        assert_eq!(f.queue1.count(), 0);
        assert_eq!(f.queue2.count(), 0);
        assert_eq!(f.queue3.count(), 1);
        assert_eq!(f.queue4.count(), 1);
    }

    #[test]
    fn test_excluded_queue_broadcast_by_queue() {
        let f = make_queue_set(0);

        let delivered = f
            .set
            .enqueue_exclude_queues(601, &[&f.queue3, &f.queue4]);

        assert_eq!(delivered, 2);
        assert_eq!(f.queue1.count(), 1);
        assert_eq!(f.queue2.count(), 1);
        assert_eq!(f.queue3.count(), 0);
        assert_eq!(f.queue4.count(), 0);
    }

    #[test]
    fn test_exclude_nothing_is_full_broadcast() {
        let f = make_queue_set(0);
        assert_eq!(f.set.enqueue_exclude(7, &[]), 4);
        assert_eq!(f.set.total_item_count(), 4);
    }

    #[test]
    fn test_exclude_everything_delivers_nowhere() {
        let f = make_queue_set(0);
        let all = f.set.queue_ids();

        assert_eq!(f.set.enqueue_exclude(8, &all), 0);
        assert_eq!(f.set.total_item_count(), 0);
    }
}
