// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{RetryError, RetryPolicy, Retryable, retry_transient};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
enum TestError {
    Busy,
    Broken,
}

impl Retryable for TestError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_micros(1))
}

#[test]
fn test_retry_returns_first_success() {
    let mut calls: u32 = 0;
    let result: Result<u32, RetryError<TestError>> = retry_transient(&fast_policy(5), |attempt| {
        calls += 1;
        Ok(attempt)
    });
    assert_eq!(result, Ok(1));
    assert_eq!(calls, 1);
}

#[test]
fn test_retry_recovers_from_transient_errors() {
    let result: Result<u32, RetryError<TestError>> = retry_transient(&fast_policy(5), |attempt| {
        if attempt < 3 {
            Err(TestError::Busy)
        } else {
            Ok(attempt)
        }
    });
    assert_eq!(result, Ok(3));
}

#[test]
fn test_retry_stops_on_permanent_error() {
    let mut calls: u32 = 0;
    let result: Result<(), RetryError<TestError>> = retry_transient(&fast_policy(5), |_| {
        calls += 1;
        Err(TestError::Broken)
    });
    assert_eq!(result, Err(RetryError::Permanent(TestError::Broken)));
    assert_eq!(calls, 1);
}

#[test]
fn test_retry_exhausts_budget() {
    let mut calls: u32 = 0;
    let result: Result<(), RetryError<TestError>> = retry_transient(&fast_policy(4), |_| {
        calls += 1;
        Err(TestError::Busy)
    });
    assert_eq!(
        result,
        Err(RetryError::Exhausted {
            attempts: 4,
            last_error: TestError::Busy,
        })
    );
    assert_eq!(calls, 4);
}

#[test]
fn test_zero_attempt_policy_still_tries_once() {
    let mut calls: u32 = 0;
    let result: Result<(), RetryError<TestError>> =
        retry_transient(&RetryPolicy::new(0, Duration::ZERO), |_| {
            calls += 1;
            Err(TestError::Busy)
        });
    assert!(matches!(
        result,
        Err(RetryError::Exhausted { attempts: 1, .. })
    ));
    assert_eq!(calls, 1);
}

#[test]
fn test_backoff_grows_linearly_with_bounded_jitter() {
    let policy: RetryPolicy = RetryPolicy::new(5, Duration::from_millis(10));
    for attempt in 1..=4_u32 {
        let delay: Duration = policy.backoff(attempt);
        assert!(delay >= Duration::from_millis(10) * attempt);
        assert!(delay < Duration::from_millis(10) * (attempt + 1));
    }
    assert_eq!(RetryPolicy::no_retry().backoff(3), Duration::ZERO);
}

#[test]
fn test_default_policy() {
    let policy: RetryPolicy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.base_backoff, Duration::from_millis(10));
}
