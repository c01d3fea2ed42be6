// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-site capture and the identity/path resolver.
//!
//! A [`CallSite`] names where a measured unit of work lives in source. The
//! `#[timed]` attribute captures one eagerly at expansion time via
//! `file!()`/`line!()`/`module_path!()`, so relocating the function afterward
//! cannot change its identity. The scoped-block and closure forms capture the
//! caller through `#[track_caller]` + [`std::panic::Location`]: because every
//! public entry point of this crate is `#[track_caller]`, attribution always
//! lands on the nearest frame outside the crate, which is the Rust rendition
//! of the original frame walk with skip predicates.
//!
//! Resolution is pure: identical `(CallSite, TimerConfig)` inputs always
//! produce the identical identity and destination path.

use crate::config::TimerConfig;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Placeholder used when a source path cannot be determined.
pub const UNKNOWN_FILE: &str = "<unknown>";

/// Placeholder line number used when a starting line cannot be determined.
pub const UNKNOWN_LINE: i64 = -1;

/// A captured source location plus the display name of the measured unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// Source file as the compiler reported it (possibly relative).
    pub file: &'static str,
    /// Starting line of the unit of work.
    pub line: u32,
    /// Enclosing module path, or [`UNKNOWN_FILE`] when not captured.
    pub module: &'static str,
    /// Display name: the function name, or a block label.
    pub name: &'static str,
}

impl CallSite {
    /// Captures the immediate caller's file and line.
    ///
    /// `Location` carries no module information, so the module degrades to
    /// the sentinel; [`ResolvedLocation`] later substitutes the file stem as
    /// a best-effort module name.
    #[track_caller]
    pub fn caller(name: &'static str) -> Self {
        let location = Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
            module: UNKNOWN_FILE,
            name,
        }
    }
}

/// A [`CallSite`] normalized for record output, with sentinels in place of
/// anything that could not be determined. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedLocation {
    /// Best-effort absolute source path, or [`UNKNOWN_FILE`].
    pub abs_path: PathBuf,
    /// Source file name without directories, or [`UNKNOWN_FILE`].
    pub file_name: String,
    /// Starting line, or [`UNKNOWN_LINE`].
    pub line: i64,
    /// Module name; falls back to the file stem, then [`UNKNOWN_FILE`].
    pub module: String,
}

impl ResolvedLocation {
    /// Normalizes a call site. Never fails; introspection problems degrade
    /// to sentinels.
    pub fn from_site(site: &CallSite) -> Self {
        if site.file.is_empty() || site.file == UNKNOWN_FILE {
            return Self::unknown();
        }
        let raw = PathBuf::from(site.file);
        // canonicalize fails for paths that don't exist from the current
        // working directory (e.g. compiled on another machine); keep the raw
        // path in that case rather than erroring.
        let abs_path = std::fs::canonicalize(&raw).unwrap_or(raw);
        let file_name = abs_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNKNOWN_FILE.to_string());
        let module = if site.module == UNKNOWN_FILE {
            abs_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| UNKNOWN_FILE.to_string())
        } else {
            site.module.to_string()
        };
        Self {
            abs_path,
            file_name,
            line: i64::from(site.line),
            module,
        }
    }

    pub fn unknown() -> Self {
        Self {
            abs_path: PathBuf::from(UNKNOWN_FILE),
            file_name: UNKNOWN_FILE.to_string(),
            line: UNKNOWN_LINE,
            module: UNKNOWN_FILE.to_string(),
        }
    }

    /// The directory containing the source file, used as the default log
    /// destination. Falls back to the current directory for sentinel paths.
    fn source_dir(&self) -> PathBuf {
        match self.abs_path.parent() {
            Some(parent) if !self.is_unknown() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn is_unknown(&self) -> bool {
        self.file_name == UNKNOWN_FILE
    }
}

/**
Computes the channel identity and destination path for a unit of work.

Identity: an explicit `logger_name` always wins; otherwise
`{module}.{name}:{line}`.

Destination precedence:
1. explicit absolute `log_file` — used as-is;
2. explicit relative `log_file` — joined under `log_dir` if set, else under
   the resolved source directory;
3. no `log_file` — `{source-stem}.log` under `log_dir` if set, else the
   source directory.
*/
pub fn resolve(site: &CallSite, config: &TimerConfig) -> (String, PathBuf, ResolvedLocation) {
    let location = ResolvedLocation::from_site(site);
    let identity = match &config.logger_name {
        Some(name) => name.clone(),
        None => format!("{}.{}:{}", location.module, site.name, location.line),
    };
    let destination = resolve_destination(&location, config);
    (identity, destination, location)
}

pub(crate) fn resolve_destination(location: &ResolvedLocation, config: &TimerConfig) -> PathBuf {
    if let Some(log_file) = &config.log_file {
        if log_file.is_absolute() {
            return log_file.clone();
        }
        let base = config
            .log_dir
            .clone()
            .unwrap_or_else(|| location.source_dir());
        return base.join(log_file);
    }

    let stem = Path::new(&location.file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| UNKNOWN_FILE.to_string());
    let default_name = format!("{stem}.log");
    match &config.log_dir {
        Some(dir) => dir.join(default_name),
        None => location.source_dir().join(default_name),
    }
}
