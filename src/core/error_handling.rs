//! Generic error handling utilities
//!
//! Lets the binary report any crate error the same way: user-actionable
//! errors (bad arguments, bad config) show their own message, everything
//! else shows the operation that failed with the detail at debug level.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: std::error::Error {
    /// True for errors the user can fix directly, such as a negative
    /// staleness window or an unreadable config file
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error with the detail level its kind calls for
///
/// # Examples
/// ```rust,no_run
/// # use sharedq::core::error_handling::log_error_with_context;
/// # use sharedq::queue::QueueSet;
/// match QueueSet::<u32>::new("jobs", -5) {
///     Ok(_) => {}
///     // Logs: "FATAL: Stale time must be zero or a positive number of seconds, got -5"
///     Err(e) => log_error_with_context(&e, "Queue set creation"),
/// }
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::api::{NotificationError, QueueEventType};
    use crate::queue::{QueueError, SharedQueue};

    #[test]
    fn test_user_actionable_error_shows_specific_message() {
        let error = QueueError::InvalidArgument {
            message: "stale time must not be negative (got -1)".to_string(),
        };

        assert!(error.is_user_actionable());
        assert_eq!(
            error.user_message(),
            Some("stale time must not be negative (got -1)")
        );
        log_error_with_context(&error, "Queue set creation");
    }

    #[test]
    fn test_system_error_uses_generic_context() {
        let queue: SharedQueue<u8> = SharedQueue::new("gone".to_string(), std::sync::Arc::from("Errors"));
        let error = NotificationError::ClosedSubscribers {
            event_type: QueueEventType::Added,
            queue_id: queue.id(),
            closed: vec!["gone".to_string()],
        };

        assert!(!error.is_user_actionable());
        assert_eq!(error.user_message(), None);
        log_error_with_context(&error, "Publishing lifecycle event");
    }
}
