//SPDX-License-Identifier: MIT OR Apache-2.0

//! # timewise procedural macros
//!
//! This crate provides the `#[timed]` attribute for the timewise timing
//! library. The attribute rewrites a function body to install a timing guard
//! before the original body runs; the guard emits one record when it drops,
//! covering normal return, panic, and async cancellation alike.
//!
//! ```rust
//! // This function:
//! #[timewise::timed(output = "none", extra = "demo")]
//! fn work() -> u32 { 42 }
//!
//! // expands to approximately:
//! // fn work() -> u32 {
//! //     let __timewise_guard = ::timewise::hidden::timed_begin(
//! //         ::timewise::TimerConfig::new()
//! //             .output(::timewise::OutputMode::None)
//! //             .extra("demo"),
//! //         ::timewise::CallSite {
//! //             file: file!(), line: line!(),
//! //             module: module_path!(), name: "work",
//! //         },
//! //     );
//! //     { 42 }
//! // }
//! # assert_eq!(work(), 42);
//! ```
//!
//! Attribute arguments are `key = value` pairs mapped onto
//! `TimerConfig` builder calls. The `level` and `output` keys take the same
//! strings as the runtime parsers and are validated at compile time, so a
//! typo'd mode is a compile error rather than a late bind error.
//!
//! The call site (`file!()`/`line!()`/`module_path!()`) is captured in the
//! expansion, i.e. eagerly at the definition, matching the contract that a
//! decorated function's identity never changes after decoration.

use proc_macro::TokenStream;

mod timed;

/// Times every call of the annotated sync or async function.
///
/// See the [timewise crate docs](../timewise/index.html) for the record
/// format and the configuration keys.
#[proc_macro_attribute]
pub fn timed(attr: TokenStream, item: TokenStream) -> TokenStream {
    timed::timed_impl(attr, item)
}
