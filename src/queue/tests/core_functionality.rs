//! Tests for core queue set operations: creation, lookup, draining, counts

#[cfg(test)]
mod tests {
    use crate::queue::tests::make_queue_set;
    use crate::queue::{QueueError, QueueSet, DEFAULT_STALE_SECONDS};
    use std::time::Duration;

    #[test]
    fn test_multi_item_dequeue() {
        let f = make_queue_set(0);
        for item in 300..305 {
            f.set.enqueue(item);
        }

        let list = f.queue1.dequeue_all();

        assert_eq!(f.queue1.dequeue_one(), None);
        assert_eq!(list, vec![300, 301, 302, 303, 304]);
        assert_eq!(f.queue1.count(), 0);
    }

    #[test]
    fn test_queue_count() {
        let f = make_queue_set(0);
        for item in 500..505 {
            f.set.enqueue(item);
        }

        for queue in [&f.queue1, &f.queue2, &f.queue3, &f.queue4] {
            assert_eq!(queue.count(), 5);
        }
        assert_eq!(f.set.total_item_count(), 20);

        f.queue1.dequeue_all();
        assert_eq!(f.queue1.count(), 0);
        assert_eq!(f.queue2.count(), 5);
    }

    #[test]
    fn test_new_queue_registration() {
        let f = make_queue_set(0);

        assert_eq!(f.set.queue_count(), 4);
        assert_eq!(
            f.set.queue_ids(),
            vec![f.queue1.id(), f.queue2.id(), f.queue3.id(), f.queue4.id()]
        );
        assert_eq!(f.queue1.full_scope(), "QueueSet.Queue1");
        assert_eq!(f.queue3.full_scope(), f.queue4.full_scope());
        assert_ne!(f.queue3.id(), f.queue4.id());
    }

    #[test]
    fn test_get_queue() {
        let f = make_queue_set(0);

        let found = f.set.get_queue(f.queue2.id()).expect("queue2 should be registered");
        assert_eq!(found.id(), f.queue2.id());
        assert!(std::sync::Arc::ptr_eq(&found, &f.queue2));
    }

    #[test]
    fn test_get_queue_items_drains() {
        let f = make_queue_set(0);
        f.set.enqueue(1);
        f.set.enqueue(2);

        assert_eq!(f.set.get_queue_items(f.queue1.id()), vec![1, 2]);
        assert!(f.set.get_queue_items(f.queue1.id()).is_empty());
        assert_eq!(f.queue2.count(), 2);
    }

    #[test]
    fn test_remove_queue() {
        let f = make_queue_set(0);

        assert!(f.set.remove_queue(f.queue1.id()));
        assert_eq!(f.set.queue_count(), 3);
        assert!(f.set.get_queue(f.queue1.id()).is_none());

        // Broadcasts no longer reach the removed queue
        assert_eq!(f.set.enqueue(9), 3);
        assert_eq!(f.queue1.count(), 0);
    }

    #[test]
    fn test_scope_of() {
        let f = make_queue_set(0);
        assert_eq!(f.set.scope(), "QueueSet");
        assert_eq!(f.set.scope_of("Anything"), "QueueSet.Anything");
        assert_eq!(f.set.scope_of("Queue1"), f.queue1.full_scope());
    }

    #[test]
    fn test_peek_and_clear_through_handles() {
        let f = make_queue_set(0);
        f.set.enqueue(11);
        f.set.enqueue(12);

        assert_eq!(f.queue1.peek().unwrap(), 11);
        f.queue1.clear();
        assert!(matches!(f.queue1.peek(), Err(QueueError::Empty { .. })));
        assert_eq!(f.queue2.peek().unwrap(), 11);
    }

    #[test]
    fn test_queue_stats() {
        let f = make_queue_set(0);
        f.set.enqueue_to(1, f.queue2.id());

        let stats = f.set.queue_stats();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[1].queue_id, f.queue2.id());
        assert_eq!(stats[1].count, 1);
        assert_eq!(stats[0].count, 0);
    }

    #[test]
    fn test_negative_stale_time_rejected() {
        match QueueSet::<i32>::new("QueueSet", -1) {
            Err(QueueError::InvalidArgument { message }) => {
                assert!(message.contains("-1"));
            }
            Err(e) => panic!("Expected InvalidArgument, got {:?}", e),
            Ok(_) => panic!("Expected negative stale time to be rejected"),
        }
    }

    #[test]
    fn test_zero_stale_time_disables_reaper() {
        let set: QueueSet<i32> = QueueSet::new("NoReaper", 0).unwrap();
        assert_eq!(set.stale_after(), None);
        assert!(!set.is_reaper_running());
    }

    #[tokio::test]
    async fn test_default_constructors() {
        let unscoped: QueueSet<i32> = QueueSet::default();
        assert_eq!(unscoped.scope(), "");
        assert_eq!(
            unscoped.stale_after(),
            Some(Duration::from_secs(DEFAULT_STALE_SECONDS as u64))
        );
        assert!(unscoped.is_reaper_running());

        let scoped: QueueSet<i32> = QueueSet::with_scope("Scoped");
        assert_eq!(scoped.scope(), "Scoped");
        assert_eq!(scoped.stale_after(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_from_config() {
        let config = crate::queue::QueueSetConfig::new("Configured", 0);
        let set: QueueSet<i32> = QueueSet::from_config(&config).unwrap();
        assert_eq!(set.scope(), "Configured");
        assert_eq!(set.stale_after(), None);

        let bad = crate::queue::QueueSetConfig::new("Configured", -10);
        assert!(QueueSet::<i32>::from_config(&bad).is_err());
    }
}
