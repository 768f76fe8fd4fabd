//! Queue Error Types

use crate::core::error_handling::ContextualError;
use crate::queue::types::QueueId;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Queue {queue_id} is empty")]
    Empty { queue_id: QueueId },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

impl ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            QueueError::InvalidArgument { .. } | QueueError::Config { .. }
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            QueueError::InvalidArgument { message } | QueueError::Config { message } => {
                Some(message)
            }
            QueueError::Empty { .. } => None,
        }
    }
}
