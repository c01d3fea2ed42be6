// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative convenience macros.

/**
Opens a scoped timing block with full module/file/line capture.

```rust
use timewise::{TimeLogger, TimerConfig, OutputMode};

let timer = TimeLogger::new(TimerConfig::new().output(OutputMode::None));
{
    let _scope = timewise::timed_scope!(timer, "load");
    // ... measured work ...
}
```

The one-argument form times against a default [`TimeLogger`](crate::TimeLogger):

```rust
# use timewise::{TimerConfig, OutputMode};
# unsafe { std::env::set_var("TIMER_ENABLE", "0") };
let _scope = timewise::timed_scope!("load");
# unsafe { std::env::remove_var("TIMER_ENABLE") };
```

Unlike [`TimeLogger::enter_labeled`](crate::TimeLogger::enter_labeled), which
reports the file stem as the module, the macro captures `module_path!()` at
the call site.
*/
#[macro_export]
macro_rules! timed_scope {
    ($logger:expr, $label:expr) => {
        $logger.enter_at(
            $crate::CallSite {
                file: file!(),
                line: line!(),
                module: module_path!(),
                name: "ctx",
            },
            $label,
        )
    };
    ($label:expr) => {
        $crate::timed_scope!($crate::TimeLogger::default(), $label)
    };
}
