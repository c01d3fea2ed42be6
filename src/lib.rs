//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# timewise

timewise measures wall-clock elapsed time around a unit of work — a function
call (sync or async) or an explicit block — and records the measurement to a
per-identity logging channel: a file, the console, both, or nowhere.

# The problem

Sprinkling `Instant::now()` pairs and `eprintln!` calls through a codebase
answers "how long did this take?" exactly once, and then rots. What you
actually want is:

* one line of ceremony per measured unit;
* a deterministic destination per call site, so repeated runs append to the
  same file without configuration;
* records that survive panics and cancellation, since the slow path is
  usually also the failing path;
* a global off switch that costs one branch when you ship.

# The API

The `#[timed]` attribute is the usual entry point:

```rust
#[timewise::timed(output = "none")]
fn expensive() -> u64 {
    (0..1000).sum()
}
expensive();
```

Each call emits one record like:

```text
2026-08-30 11:02:17.412 | INFO     | app.expensive:3 - Ran expensive in 0.018 ms (module=app, file=main.rs, abs='/src/main.rs', line=3, pid=4242, thread=main)
```

Blocks use a scope guard:

```rust
use timewise::{TimeLogger, TimerConfig, OutputMode};

let timer = TimeLogger::new(TimerConfig::new().output(OutputMode::None));
{
    let _scope = timewise::timed_scope!(timer, "import");
    // ... measured work ...
} // `Ctx 'import' OK in ... ms` emitted here
```

Fallible and async work keep their result contract; see
[`TimeLogger::scope`], [`TimeLogger::scope_async`], and
[`TimeLogger::observe_async`]. For ad hoc sub-measurements that should not
log at all, there is [`TimeSegment`].

# Destinations

Each measured unit resolves to a channel identity
(`{module}.{name}:{line}`, or an explicit override) and a destination path
(defaulting to `{source-stem}.log` next to the source file; see
[`site::resolve`]). Binding a channel is idempotent: rebinding the same
identity reconciles the sink set rather than duplicating it, so invoking a
wrapped function N times produces exactly N lines.

# Environment switches

`TIME_LOG_ENABLE` / `TIMER_LOG_ENABLE` / `TIMER_ENABLE` override the enable
flag (`0`, `false`, and empty mean off), and `TIME_LOG_LEVEL` /
`TIMER_LOG_LEVEL` / `TIMER_LEVEL` override the severity. Environment wins
over configuration; the first present alias wins. Variables are re-read at
each invocation, so an override exported mid-process takes effect.

# Failure policy

The measured work's own panics and errors propagate untouched. Source
location problems degrade to sentinels (`<unknown>`, line `-1`). A file sink
that cannot open fails loudly at bind time ([`ConfigError::SinkOpen`]); once
open, individual write failures are swallowed so logging can never fail the
work it observes.
*/

mod channel;
mod error;
mod format;
mod level;
mod logger;
mod macros;
mod segment;
pub mod config;
pub mod site;
pub mod sink;

pub use channel::{Channel, bind, channel_exists};
pub use config::{OutputMode, TimerConfig};
pub use error::ConfigError;
pub use level::Level;
pub use logger::{DEFAULT_SCOPE_LABEL, TimeLogger, TimeScope};
pub use segment::TimeSegment;
pub use site::{CallSite, ResolvedLocation};

pub use timewise_proc::timed;

#[doc(hidden)]
pub mod hidden {
    pub use crate::logger::{RanGuard, timed_begin};
}
