// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide channel registry and sink reconciliation.
//!
//! A [`Channel`] is the live binding between a logger identity and its sink
//! set. Channels are created lazily on first bind, live in a registry keyed
//! by identity, and are never torn down before process exit.
//!
//! # Reconciliation
//!
//! [`bind`] removes *all* sinks currently attached to the channel before
//! attaching the set matching the requested output mode. Rebinding the same
//! identity with the same configuration therefore always yields exactly one
//! file sink and/or one console sink, and rebinding with a changed mode or
//! destination path replaces the previous set instead of layering duplicates.
//! Add-if-absent checks were rejected: they are fragile under path
//! normalization, while remove-then-add is provably duplicate-free.
//!
//! # Concurrency
//!
//! The registry mutex covers only map lookup/insertion. Each channel owns a
//! second mutex over its level, format, and sink vector; reconciliation and
//! emission take that mutex, so a concurrent emit on the same identity can
//! never observe a half-reconciled sink set.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::Level;
use crate::config::{OutputMode, TimerConfig};
use crate::error::ConfigError;
use crate::format::render_line;
use crate::sink::{ConsoleSink, FileSink, RotatingFileSink, Sink};

static REGISTRY: OnceLock<Mutex<HashMap<String, Arc<Channel>>>> = OnceLock::new();

fn registry() -> &'static Mutex<HashMap<String, Arc<Channel>>> {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// A named logging destination bundle: severity threshold, line format, and
/// zero or more attached sinks.
#[derive(Debug)]
pub struct Channel {
    identity: String,
    state: Mutex<ChannelState>,
}

#[derive(Debug)]
struct ChannelState {
    level: Level,
    template: String,
    datefmt: String,
    sinks: Vec<Box<dyn Sink>>,
}

impl Channel {
    fn new(identity: String) -> Self {
        Self {
            identity,
            state: Mutex::new(ChannelState {
                level: Level::Info,
                template: crate::config::DEFAULT_TEMPLATE.to_string(),
                datefmt: crate::config::DEFAULT_DATEFMT.to_string(),
                sinks: Vec::new(),
            }),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /**
    Emits one record at `level` through every attached sink.

    Records below the channel's threshold are dropped. Per-sink write
    failures are swallowed: emission is fire-and-forget and must never fail
    the measured work.
    */
    pub fn emit(&self, level: Level, message: &str) {
        let state = self.state.lock();
        if level < state.level || state.sinks.is_empty() {
            return;
        }
        let line = render_line(&state.template, &state.datefmt, level, &self.identity, message);
        for sink in &state.sinks {
            let _ = sink.write_line(&line);
        }
    }

    /// The number of attached sinks. Exposed for reconciliation tests.
    pub fn sink_count(&self) -> usize {
        self.state.lock().sinks.len()
    }
}

/**
Looks up or creates the channel for `identity` and reconciles its sink set
against `config`.

Old sinks are dropped inside the channel lock, releasing their file handles
before the replacements open. Returns [`ConfigError::SinkOpen`] if file
output is requested and the destination cannot be opened.
*/
pub fn bind(
    identity: &str,
    path: &PathBuf,
    config: &TimerConfig,
) -> Result<Arc<Channel>, ConfigError> {
    if matches!(config.output, OutputMode::File | OutputMode::Both) && path.as_os_str().is_empty()
    {
        return Err(ConfigError::InvalidPath(path.display().to_string()));
    }

    let channel = {
        let mut map = registry().lock();
        map.entry(identity.to_string())
            .or_insert_with(|| Arc::new(Channel::new(identity.to_string())))
            .clone()
    };

    let mut state = channel.state.lock();
    state.level = config.effective_level();
    state.template = config.template.clone();
    state.datefmt = config.datefmt.clone();
    state.sinks.clear();

    if matches!(config.output, OutputMode::File | OutputMode::Both) {
        let sink: Box<dyn Sink> = if config.rotate {
            Box::new(RotatingFileSink::open(
                path.clone(),
                config.max_bytes,
                config.backup_count,
            )?)
        } else {
            Box::new(FileSink::open(path.clone())?)
        };
        state.sinks.push(sink);
    }
    if matches!(config.output, OutputMode::Console | OutputMode::Both) {
        state.sinks.push(Box::new(ConsoleSink::new()));
    }
    drop(state);
    Ok(channel)
}

/// Whether a channel exists for `identity`. Disabled instrumentation must
/// never create one; tests assert through this.
pub fn channel_exists(identity: &str) -> bool {
    registry().lock().contains_key(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimerConfig;

    #[test]
    fn rebinding_does_not_accumulate_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rebind.log");
        let config = TimerConfig::new().output(OutputMode::Both);
        for _ in 0..5 {
            let channel = bind("channel::rebind", &path, &config).unwrap();
            assert_eq!(channel.sink_count(), 2);
        }
    }

    #[test]
    fn rebinding_with_new_path_replaces_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");
        let config = TimerConfig::new();

        let channel = bind("channel::repath", &first, &config).unwrap();
        channel.emit(Level::Info, "one");
        let channel = bind("channel::repath", &second, &config).unwrap();
        channel.emit(Level::Info, "two");

        let first_body = std::fs::read_to_string(&first).unwrap();
        let second_body = std::fs::read_to_string(&second).unwrap();
        assert!(first_body.contains("one"));
        assert!(!first_body.contains("two"));
        assert!(second_body.contains("two"));
    }

    #[test]
    fn empty_path_is_rejected_before_binding() {
        let config = TimerConfig::new();
        let err = bind("channel::empty", &PathBuf::new(), &config).unwrap_err();
        assert!(matches!(err, crate::error::ConfigError::InvalidPath(_)));
        assert!(!channel_exists("channel::empty"));
    }

    #[test]
    fn none_mode_attaches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silent.log");
        let config = TimerConfig::new().output(OutputMode::None);
        let channel = bind("channel::silent", &path, &config).unwrap();
        assert_eq!(channel.sink_count(), 0);
        channel.emit(Level::Critical, "nobody hears this");
        assert!(!path.exists());
    }

    #[test]
    fn emit_respects_threshold() {
        // bind() reads the level environment aliases; don't race the config
        // env tests.
        let _guard = crate::config::TEST_ENV_GUARD.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("threshold.log");
        let config = TimerConfig::new().level(Level::Warning);
        let channel = bind("channel::threshold", &path, &config).unwrap();
        channel.emit(Level::Info, "filtered");
        channel.emit(Level::Warning, "kept");
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(!body.contains("filtered"));
        assert!(body.contains("kept"));
    }

    #[test]
    fn concurrent_binds_and_emits_stay_consistent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race.log");
        let config = TimerConfig::new();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let path = path.clone();
            let config = config.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..25 {
                    let channel = bind("channel::race", &path, &config).unwrap();
                    channel.emit(Level::Info, "line");
                    assert_eq!(channel.sink_count(), 1);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
