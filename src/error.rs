// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration errors surfaced by channel binding.
//!
//! Best-effort operations (source-location resolution, directory creation,
//! sink writes) never produce these; they degrade silently per the crate's
//! error policy. Only structurally invalid configuration and a failed sink
//! open are loud.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The output mode string was not one of `file`, `console`, `both`, `none`.
    #[error("unrecognized output mode {0:?} (expected file, console, both, or none)")]
    InvalidOutputMode(String),

    /// A caller-supplied path was unusable (for example, empty).
    #[error("unusable log path {0:?}")]
    InvalidPath(String),

    /// The file sink could not open its destination.
    ///
    /// Directory-creation failures deliberately surface here rather than
    /// being reported separately: the open is the single loud failure point
    /// for file output.
    #[error("cannot open log sink at {}: {source}", path.display())]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
