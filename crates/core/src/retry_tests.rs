use super::*;
use std::cell::Cell;

#[derive(Debug, PartialEq)]
struct FakeError {
    transient: bool,
}

impl Retryable for FakeError {
    fn is_transient(&self) -> bool {
        self.transient
    }
}

#[tokio::test]
async fn succeeds_without_retry() {
    let calls = Cell::new(0);
    let result: Result<u32, FakeError> = retry_with_backoff(|| {
        calls.set(calls.get() + 1);
        async { Ok(7) }
    })
    .await;
    assert_eq!(result, Ok(7));
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn retries_transient_errors_up_to_schedule_len_plus_one() {
    let calls = Cell::new(0);
    let result: Result<u32, FakeError> = retry_with_backoff(|| {
        calls.set(calls.get() + 1);
        async { Err(FakeError { transient: true }) }
    })
    .await;
    assert_eq!(result, Err(FakeError { transient: true }));
    assert_eq!(calls.get(), BACKOFF_SCHEDULE_MS.len() as u32 + 1);
}

#[tokio::test]
async fn stops_immediately_on_non_transient_error() {
    let calls = Cell::new(0);
    let result: Result<u32, FakeError> = retry_with_backoff(|| {
        calls.set(calls.get() + 1);
        async { Err(FakeError { transient: false }) }
    })
    .await;
    assert_eq!(result, Err(FakeError { transient: false }));
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn recovers_after_transient_failures() {
    let calls = Cell::new(0);
    let result: Result<u32, FakeError> = retry_with_backoff(|| {
        calls.set(calls.get() + 1);
        async move {
            if calls.get() < 2 {
                Err(FakeError { transient: true })
            } else {
                Ok(42)
            }
        }
    })
    .await;
    assert_eq!(result, Ok(42));
    assert_eq!(calls.get(), 2);
}
