// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bounded retry for optimistic transactions.
//!
//! The operation passed to [`retry_transient`] must be the complete
//! read-compute-write sequence. Nothing from a failed attempt may leak into
//! the next one.

use std::time::Duration;

/// Default number of attempts before a conflict is surfaced.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default base delay between attempts.
const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(10);

/// How many times to attempt an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Treated as at least 1.
    pub max_attempts: u32,
    /// Base delay. Attempt `n` waits `n * base` plus up to `base` of jitter.
    pub base_backoff: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, base_backoff: Duration) -> Self {
        Self {
            max_attempts,
            base_backoff,
        }
    }

    /// A policy that tries exactly once.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay before the attempt following attempt number `attempt`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base_micros: u64 = u64::try_from(self.base_backoff.as_micros()).unwrap_or(u64::MAX);
        if base_micros == 0 {
            return Duration::ZERO;
        }
        let jitter: u64 = rand::random::<u64>() % base_micros;
        let linear: u64 = base_micros.saturating_mul(u64::from(attempt));
        Duration::from_micros(linear.saturating_add(jitter))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_BACKOFF)
    }
}

/// Classifies errors for [`retry_transient`].
pub trait Retryable {
    /// Returns true if a fresh attempt may succeed.
    fn is_transient(&self) -> bool;
}

/// Why a retried operation ultimately failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The operation failed with an error retrying cannot fix.
    Permanent(E),
    /// Every attempt hit a transient error.
    Exhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The error from the final attempt.
        last_error: E,
    },
}

impl<E: std::fmt::Display> std::fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permanent(err) => write!(f, "{err}"),
            Self::Exhausted {
                attempts,
                last_error,
            } => write!(f, "Gave up after {attempts} attempts: {last_error}"),
        }
    }
}

impl<E: std::fmt::Debug + std::fmt::Display> std::error::Error for RetryError<E> {}

/// Runs `operation` until it succeeds, fails permanently, or the policy's
/// attempt budget is spent.
///
/// The closure receives the 1-based attempt number. The calling thread
/// sleeps between attempts.
///
/// # Errors
///
/// Returns `Permanent` for the first non-transient error, or `Exhausted`
/// once every attempt has failed transiently.
pub fn retry_transient<T, E, F>(policy: &RetryPolicy, mut operation: F) -> Result<T, RetryError<E>>
where
    E: Retryable,
    F: FnMut(u32) -> Result<T, E>,
{
    let max_attempts: u32 = policy.max_attempts.max(1);
    let mut attempt: u32 = 1;
    loop {
        match operation(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => return Err(RetryError::Permanent(err)),
            Err(err) if attempt >= max_attempts => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last_error: err,
                });
            }
            Err(_) => {
                std::thread::sleep(policy.backoff(attempt));
                attempt += 1;
            }
        }
    }
}
