//! Queue set configuration
//!
//! Configuration is read from the `[queue_set]` table of a TOML file:
//!
//! ```toml
//! [queue_set]
//! scope = "chat"
//! stale_seconds = 120
//! ```
//!
//! Missing keys fall back to an empty scope and a 60 second window.

use crate::core::validation::validate_stale_seconds;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::set::DEFAULT_STALE_SECONDS;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueSetConfig {
    /// Namespace prefix shared by every queue in the set
    pub scope: String,
    /// Seconds without a read before a queue is reaped; 0 disables reaping
    pub stale_seconds: i64,
}

impl Default for QueueSetConfig {
    fn default() -> Self {
        Self {
            scope: String::new(),
            stale_seconds: DEFAULT_STALE_SECONDS,
        }
    }
}

/// Top-level shape of a configuration file; other tables are ignored here
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    queue_set: QueueSetConfig,
}

impl QueueSetConfig {
    pub fn new(scope: impl Into<String>, stale_seconds: i64) -> Self {
        Self {
            scope: scope.into(),
            stale_seconds,
        }
    }

    /// Check values that the type system cannot
    pub fn validate(&self) -> QueueResult<()> {
        self.stale_after().map(|_| ())
    }

    /// Staleness window as a duration, `None` when reaping is disabled
    pub fn stale_after(&self) -> QueueResult<Option<Duration>> {
        validate_stale_seconds(self.stale_seconds)
            .map_err(|message| QueueError::InvalidArgument { message })
    }

    /// Parse the `[queue_set]` table from TOML text
    pub fn from_toml_str(contents: &str) -> QueueResult<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| QueueError::Config {
            message: format!("Invalid queue set configuration: {}", e),
        })?;
        file.queue_set.validate()?;
        Ok(file.queue_set)
    }

    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> QueueResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| QueueError::Config {
            message: format!("Error reading configuration file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}
