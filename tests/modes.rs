// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output-mode exclusivity and destination-path precedence.

use timewise::{OutputMode, TimeLogger, TimerConfig, bind};

#[test]
fn console_mode_creates_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let timer = TimeLogger::new(
        TimerConfig::new()
            .output(OutputMode::Console)
            .log_dir(dir.path()),
    );
    timer.observe("console_only", || ());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn none_mode_creates_neither() {
    let dir = tempfile::tempdir().unwrap();
    let timer = TimeLogger::new(
        TimerConfig::new()
            .output(OutputMode::None)
            .log_dir(dir.path())
            .logger_name("modes::none"),
    );
    timer.observe("silent", || ());
    // The channel exists (bind ran) but carries no sinks and wrote nothing.
    assert!(timewise::channel_exists("modes::none"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn file_mode_writes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file_mode.log");
    let timer = TimeLogger::new(TimerConfig::new().log_file(path.clone()));
    timer.observe("filed", || ());
    let body = std::fs::read_to_string(&path).unwrap();
    assert_eq!(body.lines().count(), 1);
}

#[test]
fn both_mode_attaches_file_and_console_sinks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("both.log");
    let config = TimerConfig::new().output(OutputMode::Both);
    let channel = bind("modes::both", &path, &config).unwrap();
    assert_eq!(channel.sink_count(), 2);
    channel.emit(timewise::Level::Info, "mirrored");
    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.contains("mirrored"));
}

#[test]
fn absolute_log_file_wins_over_log_dir() {
    let dir = tempfile::tempdir().unwrap();
    let absolute = dir.path().join("explicit.log");
    // The supplied directory does not exist and is never created: the
    // absolute path makes it irrelevant.
    let bogus_dir = dir.path().join("never/created");
    let timer = TimeLogger::new(
        TimerConfig::new()
            .log_dir(&bogus_dir)
            .log_file(absolute.clone()),
    );
    timer.observe("precise", || ());
    assert!(absolute.exists());
    assert!(!bogus_dir.exists());
}

#[test]
fn relative_log_file_lands_under_log_dir() {
    let dir = tempfile::tempdir().unwrap();
    let timer = TimeLogger::new(TimerConfig::new().log_dir(dir.path()).log_file("run.log"));
    timer.observe("relative", || ());
    assert!(dir.path().join("run.log").exists());
}

#[test]
fn default_file_name_is_source_stem() {
    let dir = tempfile::tempdir().unwrap();
    let timer = TimeLogger::new(TimerConfig::new().log_dir(dir.path()));
    timer.observe("stemmed", || ());
    // This test file is modes.rs, so the default destination is modes.log.
    assert!(dir.path().join("modes.log").exists());
}
