//! TOML configuration file discovery and loading
//!
//! A configuration file may carry two tables:
//!
//! ```toml
//! [queue_set]
//! scope = "chat"
//! stale_seconds = 5
//!
//! [soak]
//! sub_scopes = ["lobby", "rooms/a", "rooms/b"]
//! consumers_per_scope = 2
//! items = 5000
//! interval_ms = 5
//! duration_secs = 30
//! ```
//!
//! Command line values override file values; file values override defaults.

use crate::core::validation::validate_sub_scope;
use crate::queue::{QueueError, QueueResult, QueueSetConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::args::Args;

const CONFIG_DIR_NAME: &str = "Sharedq";
const CONFIG_FILE_NAME: &str = "sharedq.toml";

/// Settings for the soak driver
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoakConfig {
    /// Explicit sub scope names; generated from `queues` when empty
    pub sub_scopes: Vec<String>,
    pub queues: usize,
    pub consumers_per_scope: usize,
    pub items: usize,
    pub interval_ms: u64,
    pub duration_secs: u64,
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self {
            sub_scopes: Vec::new(),
            queues: 3,
            consumers_per_scope: 2,
            items: 1000,
            interval_ms: 10,
            duration_secs: 10,
        }
    }
}

impl SoakConfig {
    pub fn validate(&self) -> QueueResult<()> {
        let counts = [
            ("queues", self.queues as u64),
            ("consumers_per_scope", self.consumers_per_scope as u64),
            ("items", self.items as u64),
            ("interval_ms", self.interval_ms),
            ("duration_secs", self.duration_secs),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(QueueError::InvalidArgument {
                    message: format!("soak.{} must be greater than 0", name),
                });
            }
        }

        for sub_scope in &self.sub_scopes {
            validate_sub_scope(sub_scope).map_err(|message| QueueError::InvalidArgument {
                message: format!("soak.sub_scopes: {}", message),
            })?;
        }
        Ok(())
    }

    /// Sub scopes to create queues under
    pub fn sub_scope_names(&self) -> Vec<String> {
        if self.sub_scopes.is_empty() {
            (0..self.queues).map(|n| format!("room-{}", n)).collect()
        } else {
            self.sub_scopes.clone()
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

/// Complete configuration of the sharedq binary
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub queue_set: QueueSetConfig,
    pub soak: SoakConfig,
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> QueueResult<Self> {
        toml::from_str(contents).map_err(|e| QueueError::Config {
            message: format!("Invalid configuration: {}", e),
        })
    }

    pub fn load(path: &Path) -> QueueResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| QueueError::Config {
            message: format!("Error reading configuration file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            QueueError::Config { message } => QueueError::Config {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    pub fn validate(&self) -> QueueResult<()> {
        self.queue_set.validate()?;
        self.soak.validate()
    }
}

/// `<config dir>/Sharedq/sharedq.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Pick the configuration file to load
///
/// A file named on the command line must exist. Without one, the default
/// path is used only when it exists.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    default_path: Option<PathBuf>,
) -> QueueResult<Option<PathBuf>> {
    match explicit {
        Some(path) if path.exists() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(QueueError::Config {
            message: format!(
                "The specified configuration file does not exist: {}",
                path.display()
            ),
        }),
        None => Ok(default_path.filter(|path| path.exists())),
    }
}

impl Args {
    /// Load the configuration file (if any), apply command line overrides
    /// and validate the result
    pub fn load_config(&self) -> QueueResult<AppConfig> {
        let mut config =
            match resolve_config_path(self.config_file.as_deref(), default_config_path())? {
                Some(path) => {
                    log::debug!("Loading configuration from {}", path.display());
                    AppConfig::load(&path)?
                }
                None => AppConfig::default(),
            };

        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overwrite configuration values with those given on the command line
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(scope) = &self.scope {
            config.queue_set.scope = scope.clone();
        }
        if let Some(stale_seconds) = self.stale_seconds {
            config.queue_set.stale_seconds = stale_seconds;
        }
        if !self.sub_scopes.is_empty() {
            config.soak.sub_scopes = self.sub_scopes.clone();
        }
        if let Some(queues) = self.queues {
            config.soak.queues = queues;
        }
        if let Some(consumers) = self.consumers_per_scope {
            config.soak.consumers_per_scope = consumers;
        }
        if let Some(items) = self.items {
            config.soak.items = items;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.soak.interval_ms = interval_ms as u64;
        }
        if let Some(duration_secs) = self.duration_secs {
            config.soak.duration_secs = duration_secs as u64;
        }
    }
}
