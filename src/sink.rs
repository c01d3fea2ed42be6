// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concrete output targets attached to a channel.
//!
//! Sinks receive fully rendered lines; formatting and severity filtering
//! happen upstream in [`crate::channel`]. Write failures are reported to the
//! caller as `io::Result` but the channel deliberately ignores them: a
//! logging failure must never propagate into the measured work.
//!
//! Dropping a sink drops its file handle, so the channel's
//! remove-then-add reconciliation cannot leak descriptors across rebinds.

use parking_lot::Mutex;
use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub trait Sink: Debug + Send + Sync {
    /// Writes one rendered line plus a newline.
    fn write_line(&self, line: &str) -> io::Result<()>;

    /// For file sinks, the destination path. Used by reconciliation tests
    /// and diagnostics; console sinks return `None`.
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// A sink that writes to the process's stderr stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub const fn new() -> Self {
        Self
    }
}

impl Sink for ConsoleSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut lock = io::stderr().lock();
        lock.write_all(line.as_bytes())?;
        lock.write_all(b"\n")
    }
}

/// An append-mode file sink.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Opens the destination for appending.
    ///
    /// The parent directory is created best-effort first; if that failed,
    /// this open is where the problem surfaces, as [`ConfigError::SinkOpen`].
    pub fn open(path: PathBuf) -> Result<Self, ConfigError> {
        ensure_parent_dir(&path);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ConfigError::SinkOpen {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }
}

impl Sink for FileSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = self.file.lock();
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// A size-rotating file sink.
///
/// When a write would push the primary file past `max_bytes`, existing
/// numbered backups shift up (`name.1` → `name.2`, …, discarding the oldest),
/// the primary becomes `name.1`, and a fresh primary is opened. With a
/// `backup_count` of zero the primary is simply truncated in place.
#[derive(Debug)]
pub struct RotatingFileSink {
    path: PathBuf,
    max_bytes: u64,
    backup_count: u32,
    state: Mutex<RotateState>,
}

#[derive(Debug)]
struct RotateState {
    file: File,
    written: u64,
}

impl RotatingFileSink {
    pub fn open(path: PathBuf, max_bytes: u64, backup_count: u32) -> Result<Self, ConfigError> {
        ensure_parent_dir(&path);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ConfigError::SinkOpen {
                path: path.clone(),
                source,
            })?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            path,
            max_bytes,
            backup_count,
            state: Mutex::new(RotateState { file, written }),
        })
    }

    fn backup_path(&self, index: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&self, state: &mut RotateState) -> io::Result<()> {
        state.file.flush()?;
        if self.backup_count > 0 {
            // Shift name.(N-1) -> name.N downward so name.1 is free.
            for index in (1..self.backup_count).rev() {
                let from = self.backup_path(index);
                let to = self.backup_path(index + 1);
                if from.exists() {
                    let _ = std::fs::remove_file(&to);
                    let _ = std::fs::rename(&from, &to);
                }
            }
            let _ = std::fs::remove_file(self.backup_path(1));
            std::fs::rename(&self.path, self.backup_path(1))?;
            state.file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
        } else {
            state.file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?;
        }
        state.written = 0;
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut state = self.state.lock();
        let incoming = line.len() as u64 + 1;
        if self.max_bytes > 0 && state.written > 0 && state.written + incoming > self.max_bytes {
            self.rotate(&mut state)?;
        }
        state.file.write_all(line.as_bytes())?;
        state.file.write_all(b"\n")?;
        state.written += incoming;
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Recursive directory creation, errors ignored. A nonexistent directory
/// resurfaces as a sink-open failure, which is the single loud failure point.
fn ensure_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
