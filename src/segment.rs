// SPDX-License-Identifier: MIT OR Apache-2.0
use std::time::Instant;

/**
A manual, value-returning segment timer for ad hoc multi-segment timing
inside a larger unit of work. Never logs.

```rust
use timewise::TimeSegment;

let segment = TimeSegment::start("parse");
// ... work ...
let parse_ms = segment.elapsed_ms();
assert!(parse_ms >= 0.0);
```

[`elapsed_ms`](TimeSegment::elapsed_ms) may be called repeatedly; the start
marker never resets, so successive calls return growing values. That is a
documented quirk of the primitive, not a bug.
*/
#[derive(Debug, Clone, Copy)]
pub struct TimeSegment {
    label: &'static str,
    start: Instant,
}

impl TimeSegment {
    /// Captures the start time immediately.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Elapsed milliseconds since [`start`](Self::start), non-negative.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1_000.0
    }
}
