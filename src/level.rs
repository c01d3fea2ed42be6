// SPDX-License-Identifier: MIT OR Apache-2.0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Detailed diagnostics, normally filtered out
    Debug,
    /// Ordinary timing records; the default
    Info,
    /// Suspicious condition
    Warning,
    /// Runtime error
    Error,
    /// Unrecoverable condition
    Critical,
}

impl Level {
    /// The upper-case name, as it appears in rendered records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /**
    Parses a level name case-insensitively.

    Returns `None` for unrecognized names; callers fall back to their
    configured default rather than erroring, since level names arrive from
    environment variables.
    */
    pub fn parse(s: &str) -> Option<Level> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Level::Debug),
            "INFO" => Some(Level::Info),
            "WARNING" => Some(Level::Warning),
            "ERROR" => Some(Level::Error),
            "CRITICAL" => Some(Level::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/*
Boilerplate notes.

Copy/Clone/Eq/Ord/Hash all make sense for a fieldless severity enum.
Default is deliberately not implemented; the default level is a property of
TimerConfig, not of the enum.
From<&str> is not implemented because parsing can fail and the failure policy
(fall back to a configured default) belongs to the caller.
*/
