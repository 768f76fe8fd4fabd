//! Command line arguments for the sharedq soak driver
//!
//! Every option is optional so that values missing on the command line can
//! be filled in from the configuration file, then from built-in defaults.

use crate::core::validation::{validate_positive_int, validate_sub_scope};
use crate::core::version::long_version;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "sharedq")]
#[command(about = "Soak test and demo driver for scope-addressed fan-out queue sets")]
#[command(version, long_version = long_version())]
#[command(after_help = " * can be specified multiple times or as a comma-separated list")]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Scope of the queue set
    #[arg(short = 's', long = "scope", value_name = "SCOPE")]
    pub scope: Option<String>,

    /// Seconds without a read before a queue is reaped (0 disables reaping)
    #[arg(
        short = 't',
        long = "stale-seconds",
        value_name = "SECONDS",
        allow_negative_numbers = true
    )]
    pub stale_seconds: Option<i64>,

    /// Sub scopes to create queues under*
    #[arg(
        long = "sub-scope",
        value_name = "NAMES",
        value_delimiter = ',',
        action = ArgAction::Append,
        value_parser = validate_sub_scope
    )]
    pub sub_scopes: Vec<String>,

    /// Number of sub scopes to generate when none are named
    #[arg(short = 'q', long = "queues", value_name = "COUNT", value_parser = validate_positive_int)]
    pub queues: Option<usize>,

    /// Queues created under each sub scope
    #[arg(long = "consumers-per-scope", value_name = "COUNT", value_parser = validate_positive_int)]
    pub consumers_per_scope: Option<usize>,

    /// Number of items the producer publishes
    #[arg(short = 'n', long = "items", value_name = "COUNT", value_parser = validate_positive_int)]
    pub items: Option<usize>,

    /// Delay between produced items, also the consumer poll period
    #[arg(short = 'i', long = "interval-ms", value_name = "MILLIS", value_parser = validate_positive_int)]
    pub interval_ms: Option<usize>,

    /// How long to run before shutting down
    #[arg(short = 'd', long = "duration-secs", value_name = "SECONDS", value_parser = validate_positive_int)]
    pub duration_secs: Option<usize>,

    /// Force colored output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to log to stderr)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Whether to colorize output: explicit flags win, otherwise follow the TTY
    pub fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        self.color || std::io::IsTerminal::is_terminal(&std::io::stdout())
    }

    /// Log file to write to, with `none` meaning stderr
    pub fn log_file_path(&self) -> Option<&str> {
        self.log_file
            .as_deref()
            .and_then(|path| path.to_str())
            .filter(|path| !path.eq_ignore_ascii_case("none"))
    }
}
