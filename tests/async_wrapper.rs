// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async wrapper semantics: awaited completion, outcome labeling, and
//! cancellation mid-suspension.

use std::pin::pin;
use std::task::{Context, Poll, Waker};
use test_executors::async_test;
use timewise::{TimeLogger, TimerConfig};

#[derive(Debug)]
struct FetchTimedOut;

#[async_test]
async fn observe_async_times_the_whole_await() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("async.log");
    let timer = TimeLogger::new(TimerConfig::new().log_file(path.clone()));

    let value = timer.observe_async("fetch", async { 40 + 2 }).await;
    assert_eq!(value, 42);

    let body = std::fs::read_to_string(&path).unwrap();
    assert_eq!(body.matches("Ran fetch in").count(), 1);
}

#[async_test]
async fn scope_async_labels_ok_and_err() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scope_async.log");
    let timer = TimeLogger::new(TimerConfig::new().log_file(path.clone()));

    let ok: Result<u8, FetchTimedOut> = timer.scope_async("fetch-ok", async { Ok(1) }).await;
    assert!(ok.is_ok());
    let err: Result<u8, FetchTimedOut> = timer
        .scope_async("fetch-err", async { Err(FetchTimedOut) })
        .await;
    assert!(err.is_err());

    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.contains("Ctx 'fetch-ok' OK in"));
    assert!(body.contains("Ctx 'fetch-err' ERR:FetchTimedOut in"));
}

#[test]
fn cancelled_scope_still_emits_a_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cancel.log");
    let timer = TimeLogger::new(TimerConfig::new().log_file(path.clone()));

    {
        let fut = timer.scope_async(
            "doomed-fetch",
            std::future::pending::<Result<(), FetchTimedOut>>(),
        );
        let mut fut = pin!(fut);
        // First poll starts the clock and suspends on the inner future.
        let waker = Waker::noop();
        let mut cx = Context::from_waker(waker);
        assert!(matches!(fut.as_mut().poll(&mut cx), Poll::Pending));
    } // dropped mid-suspension: cancellation

    let body = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        body.matches("Ctx 'doomed-fetch' CANCELLED in").count(),
        1,
        "got:\n{body}"
    );
}

#[test]
fn unpolled_scope_future_emits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unpolled.log");
    let timer = TimeLogger::new(TimerConfig::new().log_file(path.clone()));

    let fut = timer.scope_async(
        "never-started",
        std::future::pending::<Result<(), FetchTimedOut>>(),
    );
    drop(fut);

    // Work that never started is not measured.
    assert!(!path.exists());
}

#[async_test]
async fn observe_async_propagates_values_through_suspension() {
    let timer = TimeLogger::new(TimerConfig::new().output(timewise::OutputMode::None));
    let value = timer
        .observe_async("yielding", async {
            std::future::ready(5).await + std::future::ready(6).await
        })
        .await;
    assert_eq!(value, 11);
}
