// SPDX-License-Identifier: MIT OR Apache-2.0

//! Function-form wrapper properties: idempotent rebinding, disable
//! short-circuit, elapsed sanity, record content.

use std::time::Duration;
use timewise::{OutputMode, TimeLogger, TimerConfig};

fn file_body(path: &std::path::Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

#[test]
fn five_invocations_yield_exactly_five_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("five.log");
    let timer = TimeLogger::new(TimerConfig::new().log_file(path.clone()));
    for _ in 0..5 {
        timer.observe("noop", || ());
    }
    let body = file_body(&path);
    assert_eq!(
        body.matches("Ran noop in").count(),
        5,
        "expected exactly 5 records, got:\n{body}"
    );
}

#[test]
fn disabled_config_creates_nothing_and_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    let timer = TimeLogger::new(
        TimerConfig::new()
            .enabled(false)
            .log_dir(dir.path())
            .logger_name("wrapper::disabled"),
    );
    let value = timer.observe("untouched", || 7);
    assert_eq!(value, 7);
    assert!(!timewise::channel_exists("wrapper::disabled"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn disabled_still_propagates_panics() {
    let timer = TimeLogger::new(TimerConfig::new().enabled(false));
    let result = std::panic::catch_unwind(|| timer.observe("boom", || panic!("original payload")));
    let payload = result.unwrap_err();
    assert_eq!(
        payload.downcast_ref::<&str>().copied(),
        Some("original payload")
    );
}

#[test]
fn panicking_work_still_emits_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panic.log");
    let timer = TimeLogger::new(TimerConfig::new().log_file(path.clone()));
    let result = std::panic::catch_unwind(|| timer.observe("explode", || panic!("bang")));
    assert!(result.is_err());
    let body = file_body(&path);
    assert_eq!(body.matches("Ran explode in").count(), 1);
}

#[test]
fn elapsed_covers_the_sleep() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sleep.log");
    let timer = TimeLogger::new(TimerConfig::new().log_file(path.clone()));
    timer.observe("nap", || std::thread::sleep(Duration::from_millis(50)));

    let body = file_body(&path);
    let elapsed = body
        .split("Ran nap in ")
        .nth(1)
        .and_then(|rest| rest.split(" ms").next())
        .and_then(|ms| ms.parse::<f64>().ok())
        .expect("record should carry elapsed ms");
    assert!(elapsed >= 50.0, "elapsed {elapsed} ms below the sleep");
    assert!(elapsed < 1050.0, "elapsed {elapsed} ms implausibly large");
}

#[test]
fn record_carries_context_and_extra() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("context.log");
    let timer = TimeLogger::new(
        TimerConfig::new()
            .log_file(path.clone())
            .extra("warm cache"),
    );
    timer.observe("ctxful", || ());

    let body = file_body(&path);
    assert!(body.contains("file=wrapper.rs"), "got:\n{body}");
    assert!(body.contains(&format!("pid={}", std::process::id())));
    assert!(body.contains("thread="));
    assert!(body.contains("line="));
    assert!(body.ends_with(" | warm cache\n"), "got:\n{body}");
    // Level column padded to 8 characters.
    assert!(body.contains(" | INFO     | "));
}

#[test]
fn return_value_passes_through_unchanged() {
    let timer = TimeLogger::new(TimerConfig::new().output(OutputMode::None));
    let out = timer.observe("id", || vec![1, 2, 3]);
    assert_eq!(out, vec![1, 2, 3]);
}

#[test]
fn segment_timer_measures_without_logging() {
    let segment = TimeLogger::start("chunk");
    std::thread::sleep(Duration::from_millis(5));
    let first = segment.elapsed_ms();
    let second = segment.elapsed_ms();
    assert!(first >= 5.0);
    // stop is repeatable; the start marker never resets.
    assert!(second >= first);
}
