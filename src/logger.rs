// SPDX-License-Identifier: MIT OR Apache-2.0

//! The measurement wrapper: times a unit of work and emits one record.
//!
//! All emission happens in guard destructors, so exactly one record is
//! produced per invocation on every exit path: normal return, panic, and
//! async cancellation alike. The wrapper never observes or alters the work's
//! result; panics and errors propagate exactly as if uninstrumented.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::channel::{Channel, bind};
use crate::config::TimerConfig;
use crate::level::Level;
use crate::site::{CallSite, ResolvedLocation, resolve, resolve_destination};

/// Label used for scoped blocks with no explicit name, matching the default
/// channel identity for the scoped form.
pub const DEFAULT_SCOPE_LABEL: &str = "TimeLogger.ctx";

/**
Times function calls, futures, and scoped blocks, recording wall-clock
elapsed milliseconds to the configured destination.

# Function form

```rust
use timewise::{TimeLogger, TimerConfig, OutputMode};

let timer = TimeLogger::new(TimerConfig::new().output(OutputMode::None));
let sum = timer.observe("add", || 2 + 2);
assert_eq!(sum, 4);
```

The `#[timed]` attribute is sugar for the same mechanism with the call site
captured at the function definition.

# Scoped form

```rust
use timewise::{TimeLogger, TimerConfig, OutputMode};

let timer = TimeLogger::new(TimerConfig::new().output(OutputMode::None));
{
    let _scope = timer.enter();
    // ... measured work ...
} // record emitted here
```
*/
#[derive(Debug, Clone, Default)]
pub struct TimeLogger {
    config: TimerConfig,
}

impl TimeLogger {
    pub fn new(config: TimerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Convenience constructor for a [`TimeSegment`](crate::TimeSegment);
    /// see that type for the value-returning timing primitive.
    pub fn start(label: &'static str) -> crate::TimeSegment {
        crate::TimeSegment::start(label)
    }

    /**
    Runs `f`, timing it and emitting one `Ran …` record.

    The call site is the caller of this function. Disabled instrumentation
    (config or environment) short-circuits to a plain call: no channel is
    bound and no clock is read. The closure's return value, or its panic,
    passes through unchanged.
    */
    #[track_caller]
    pub fn observe<R>(&self, name: &'static str, f: impl FnOnce() -> R) -> R {
        self.observe_at(CallSite::caller(name), f)
    }

    /// [`observe`](Self::observe) with an explicit call site; used by the
    /// `#[timed]` expansion, which captures the site at the definition.
    pub fn observe_at<R>(&self, site: CallSite, f: impl FnOnce() -> R) -> R {
        let _guard = self.begin_ran(site);
        f()
    }

    /**
    Awaits `fut` to completion, timing the whole await.

    The clock starts at the future's first poll and stops when the returned
    future is dropped, so suspension time counts (wall-clock, not CPU) and a
    cancelled future still emits a record covering the time until the drop.
    */
    #[track_caller]
    pub fn observe_async<F: Future>(&self, name: &'static str, fut: F) -> impl Future<Output = F::Output> {
        self.observe_async_at(CallSite::caller(name), fut)
    }

    /// [`observe_async`](Self::observe_async) with an explicit call site.
    pub fn observe_async_at<F: Future>(&self, site: CallSite, fut: F) -> impl Future<Output = F::Output> {
        let this = self.clone();
        async move {
            let _guard = this.begin_ran(site);
            fut.await
        }
    }

    /**
    Opens a scoped timing block ending when the returned guard drops.

    The emitted `Ctx …` record carries outcome `OK`, or `ERR:panic` when the
    guard is dropped during unwinding. The label (and channel identity) is
    the configured logger name, defaulting to `TimeLogger.ctx`.
    */
    #[track_caller]
    pub fn enter(&self) -> TimeScope {
        let label = self
            .config
            .logger_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SCOPE_LABEL.to_string());
        self.enter_at(CallSite::caller("ctx"), label)
    }

    /// [`enter`](Self::enter) with an explicit label.
    #[track_caller]
    pub fn enter_labeled(&self, label: impl Into<String>) -> TimeScope {
        self.enter_at(CallSite::caller("ctx"), label)
    }

    /// [`enter`](Self::enter) with an explicit call site and label; used by
    /// the `timed_scope!` expansion.
    pub fn enter_at(&self, site: CallSite, label: impl Into<String>) -> TimeScope {
        self.begin_scope(site, label.into(), ScopeOutcome::Unset)
    }

    /**
    Runs a fallible block, labeling the record `OK` or `ERR:<ErrorTypeName>`.

    The result, including the error value, passes through unchanged; only the
    outcome label observes it.
    */
    #[track_caller]
    pub fn scope<T, E, F>(&self, label: impl Into<String>, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut scope = self.enter_at(CallSite::caller("ctx"), label);
        let result = f();
        scope.outcome = match &result {
            Ok(_) => ScopeOutcome::Ok,
            Err(_) => ScopeOutcome::Err(error_kind::<E>()),
        };
        result
    }

    /**
    Async form of [`scope`](Self::scope).

    The guard is armed with a `CANCELLED` outcome before the await, so
    dropping the returned future mid-flight still emits a record reflecting
    elapsed time up to cancellation.
    */
    #[track_caller]
    pub fn scope_async<T, E, F>(
        &self,
        label: impl Into<String>,
        fut: F,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let site = CallSite::caller("ctx");
        let label = label.into();
        let this = self.clone();
        async move {
            let mut scope = this.begin_scope(site, label, ScopeOutcome::Cancelled);
            let result = fut.await;
            scope.outcome = match &result {
                Ok(_) => ScopeOutcome::Ok,
                Err(_) => ScopeOutcome::Err(error_kind::<E>()),
            };
            result
        }
    }

    fn begin_ran(&self, site: CallSite) -> Option<RanGuard> {
        if !self.config.effective_enabled() {
            return None;
        }
        let (identity, path, location) = resolve(&site, &self.config);
        let channel = self.bind_or_complain(&identity, &path)?;
        Some(RanGuard {
            channel,
            level: self.config.effective_level(),
            name: site.name,
            location,
            extra: self.config.extra.clone(),
            start: Instant::now(),
        })
    }

    fn begin_scope(&self, site: CallSite, label: String, outcome: ScopeOutcome) -> TimeScope {
        if !self.config.effective_enabled() {
            return TimeScope {
                inner: None,
                outcome,
            };
        }
        // Scoped blocks use the label itself as the channel identity; path
        // resolution still follows the caller's source location.
        let location = ResolvedLocation::from_site(&site);
        let path = resolve_destination(&location, &self.config);
        let Some(channel) = self.bind_or_complain(&label, &path) else {
            return TimeScope {
                inner: None,
                outcome,
            };
        };
        TimeScope {
            inner: Some(ScopeInner {
                channel,
                level: self.config.effective_level(),
                label,
                location,
                extra: self.config.extra.clone(),
                start: Instant::now(),
            }),
            outcome,
        }
    }

    /// Binds the channel, reporting failure on stderr instead of letting a
    /// configuration problem escape into the measured call. The bind
    /// operation itself (used directly) stays loud; the wrapper must not
    /// change the work's failure contract.
    fn bind_or_complain(&self, identity: &str, path: &PathBuf) -> Option<Arc<Channel>> {
        match bind(identity, path, &self.config) {
            Ok(channel) => Some(channel),
            Err(err) => {
                eprintln!("timewise: dropping instrumentation for {identity:?}: {err}");
                None
            }
        }
    }
}

/// Entry point for the `#[timed]` expansion: builds the config'd logger and
/// starts the function-form guard. Not public API.
#[doc(hidden)]
pub fn timed_begin(config: TimerConfig, site: CallSite) -> Option<RanGuard> {
    TimeLogger::new(config).begin_ran(site)
}

/// Emits the `Ran …` record for the function form on drop.
#[doc(hidden)]
#[derive(Debug)]
pub struct RanGuard {
    channel: Arc<Channel>,
    level: Level,
    name: &'static str,
    location: ResolvedLocation,
    extra: Option<String>,
    start: Instant,
}

impl Drop for RanGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1_000.0;
        let message = format!(
            "Ran {} in {:.3} ms {}{}",
            self.name,
            elapsed_ms,
            context_fields(&self.location),
            extra_suffix(&self.extra),
        );
        self.channel.emit(self.level, &message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScopeOutcome {
    /// Not yet determined; resolved at drop (OK, or ERR:panic during unwind).
    Unset,
    Ok,
    Err(String),
    Cancelled,
}

/**
A scoped timing block; emits one `Ctx …` record when dropped.

Created by [`TimeLogger::enter`] and friends. Holds no borrow of the logger,
so it may outlive it.
*/
#[derive(Debug)]
pub struct TimeScope {
    inner: Option<ScopeInner>,
    outcome: ScopeOutcome,
}

#[derive(Debug)]
struct ScopeInner {
    channel: Arc<Channel>,
    level: Level,
    label: String,
    location: ResolvedLocation,
    extra: Option<String>,
    start: Instant,
}

impl TimeScope {
    /// Elapsed time since block entry, in milliseconds. Zero when disabled.
    pub fn elapsed_ms(&self) -> f64 {
        self.inner
            .as_ref()
            .map(|inner| inner.start.elapsed().as_secs_f64() * 1_000.0)
            .unwrap_or(0.0)
    }
}

impl Drop for TimeScope {
    fn drop(&mut self) {
        // Disabled or never started: nothing to emit.
        let Some(inner) = self.inner.take() else {
            return;
        };
        let elapsed_ms = inner.start.elapsed().as_secs_f64() * 1_000.0;
        let status = match &self.outcome {
            ScopeOutcome::Ok => "OK".to_string(),
            ScopeOutcome::Err(kind) => format!("ERR:{kind}"),
            ScopeOutcome::Cancelled => "CANCELLED".to_string(),
            ScopeOutcome::Unset => {
                if std::thread::panicking() {
                    "ERR:panic".to_string()
                } else {
                    "OK".to_string()
                }
            }
        };
        let message = format!(
            "Ctx '{}' {} in {:.3} ms {}{}",
            inner.label,
            status,
            elapsed_ms,
            context_fields(&inner.location),
            extra_suffix(&inner.extra),
        );
        inner.channel.emit(inner.level, &message);
    }
}

/*
Boilerplate notes.

TimeScope: Clone would emit the same block twice, no. PartialEq/Ord/Hash make
no sense for a live guard. Default can't exist without a call site. Send is
automatic and useful (guards may cross threads inside async tasks).
*/

fn context_fields(location: &ResolvedLocation) -> String {
    let thread = std::thread::current();
    format!(
        "(module={}, file={}, abs='{}', line={}, pid={}, thread={})",
        location.module,
        location.file_name,
        location.abs_path.display(),
        location.line,
        std::process::id(),
        thread.name().unwrap_or("<unnamed>"),
    )
}

fn extra_suffix(extra: &Option<String>) -> String {
    match extra {
        Some(extra) => format!(" | {extra}"),
        None => String::new(),
    }
}

/// The last path segment of `E`'s type name, used as the `ERR:` label.
fn error_kind<E>() -> String {
    let full = std::any::type_name::<E>();
    // Strip generic arguments, then take the final path segment.
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
