// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-instance timing configuration and environment overrides.
//!
//! A [`TimerConfig`] is immutable once handed to a
//! [`TimeLogger`](crate::TimeLogger). Environment variables are consulted at
//! each resolution rather than at construction, so a variable exported after
//! the config was built still takes effect. Several alias names map to the
//! same setting; the first alias present in the environment wins.

use crate::Level;
use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment aliases for the global enable switch, in precedence order.
pub const ENABLE_ENV_VARS: &[&str] = &["TIME_LOG_ENABLE", "TIMER_LOG_ENABLE", "TIMER_ENABLE"];

/// Environment aliases for the severity override, in precedence order.
pub const LEVEL_ENV_VARS: &[&str] = &["TIME_LOG_LEVEL", "TIMER_LOG_LEVEL", "TIMER_LEVEL"];

/// Where a channel sends its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputMode {
    /// One file sink at the resolved destination path.
    #[default]
    File,
    /// One sink writing to the process's stderr stream.
    Console,
    /// Both a file sink and a console sink, with identical content.
    Both,
    /// The channel exists but carries no sinks.
    None,
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(OutputMode::File),
            "console" => Ok(OutputMode::Console),
            "both" => Ok(OutputMode::Both),
            "none" => Ok(OutputMode::None),
            other => Err(ConfigError::InvalidOutputMode(other.to_string())),
        }
    }
}

/// Default line template; see [`crate::format`] for the placeholder set.
pub const DEFAULT_TEMPLATE: &str = "{time}.{millis} | {level} | {name} - {message}";

/// Default strftime date format for the `{time}` placeholder.
pub const DEFAULT_DATEFMT: &str = "%Y-%m-%d %H:%M:%S";

const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_BACKUP_COUNT: u32 = 3;

/**
Configuration for one instrumentation instance.

Construct with [`TimerConfig::new`] and chain setters:

```rust
use timewise::{TimerConfig, Level, OutputMode};

let config = TimerConfig::new()
    .level(Level::Debug)
    .output(OutputMode::Both)
    .log_dir("/tmp/timewise-demo")
    .extra("batch import");
```
*/
#[derive(Debug, Clone)]
pub struct TimerConfig {
    pub(crate) level: Level,
    pub(crate) enabled: bool,
    pub(crate) output: OutputMode,
    pub(crate) log_dir: Option<PathBuf>,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) extra: Option<String>,
    pub(crate) template: String,
    pub(crate) datefmt: String,
    pub(crate) logger_name: Option<String>,
    pub(crate) rotate: bool,
    pub(crate) max_bytes: u64,
    pub(crate) backup_count: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerConfig {
    pub fn new() -> Self {
        Self {
            level: Level::Info,
            enabled: true,
            output: OutputMode::File,
            log_dir: None,
            log_file: None,
            extra: None,
            template: DEFAULT_TEMPLATE.to_string(),
            datefmt: DEFAULT_DATEFMT.to_string(),
            logger_name: None,
            rotate: false,
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
        }
    }

    /// Severity at which records are emitted, and the channel threshold.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// When false, instrumentation is a pure pass-through.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Directory for file output; overrides the resolved source directory.
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Explicit log file. Absolute paths are used as-is; relative paths are
    /// joined under the log dir (or the resolved source directory).
    pub fn log_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.log_file = Some(file.into());
        self
    }

    /// Free-text annotation appended to every record as ` | <extra>`.
    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Line template; see [`crate::format`] for placeholders.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// strftime format for the `{time}` placeholder.
    pub fn datefmt(mut self, datefmt: impl Into<String>) -> Self {
        self.datefmt = datefmt.into();
        self
    }

    /// Explicit channel identity, overriding the derived one.
    pub fn logger_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = Some(name.into());
        self
    }

    /// Use a size-rotating file sink instead of a plain append sink.
    pub fn rotate(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    /// Rotation threshold in bytes.
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Number of numbered backup files kept by the rotating sink.
    pub fn backup_count(mut self, backup_count: u32) -> Self {
        self.backup_count = backup_count;
        self
    }

    /**
    The enable flag after environment overrides.

    Read at resolution time, once per wrapped invocation or block entry, so
    that exporting an alias after construction still takes effect. Trimmed
    values `0`, `false` (any case), and the empty string disable; any other
    value enables.
    */
    pub fn effective_enabled(&self) -> bool {
        for key in ENABLE_ENV_VARS {
            if let Ok(val) = std::env::var(key) {
                let val = val.trim();
                return !(val.is_empty() || val == "0" || val.eq_ignore_ascii_case("false"));
            }
        }
        self.enabled
    }

    /// The severity after environment overrides. Unrecognized level names
    /// fall back to the configured default.
    pub fn effective_level(&self) -> Level {
        for key in LEVEL_ENV_VARS {
            if let Ok(val) = std::env::var(key) {
                if !val.is_empty() {
                    return Level::parse(&val).unwrap_or(self.level);
                }
            }
        }
        self.level
    }
}

/// Serializes unit tests that read or mutate the process environment.
#[cfg(test)]
pub(crate) static TEST_ENV_GUARD: std::sync::Mutex<()> = std::sync::Mutex::new(());
