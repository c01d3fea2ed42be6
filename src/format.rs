// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-template rendering.
//!
//! Every sink bound in one call shares the same template and date format.
//! The template supports five placeholders:
//!
//! | placeholder | replacement |
//! |---|---|
//! | `{time}` | local wall-clock time, formatted with the configured strftime pattern |
//! | `{millis}` | the timestamp's millisecond component, 3 digits |
//! | `{level}` | the severity name, left-padded to 8 characters |
//! | `{name}` | the channel identity |
//! | `{message}` | the record body |
//!
//! Anything else in the template, including unrecognized `{...}` sequences,
//! passes through verbatim.

use crate::Level;
use chrono::{Local, Timelike};

/// Renders one record line. Does not append a trailing newline; sinks own
/// line termination.
pub fn render_line(
    template: &str,
    datefmt: &str,
    level: Level,
    identity: &str,
    message: &str,
) -> String {
    let now = Local::now();
    let time = now.format(datefmt).to_string();
    let millis = now.nanosecond() / 1_000_000;

    let mut out = String::with_capacity(template.len() + message.len() + 32);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail.find('}') {
            Some(close) => {
                let key = &tail[1..close];
                match key {
                    "time" => out.push_str(&time),
                    "millis" => out.push_str(&format!("{millis:03}")),
                    "level" => out.push_str(&format!("{:<8}", level.as_str())),
                    "name" => out.push_str(identity),
                    "message" => out.push_str(message),
                    _ => out.push_str(&tail[..=close]),
                }
                rest = &tail[close + 1..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
