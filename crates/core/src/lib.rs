// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The round-robin assignment engine.
//!
//! Everything in this crate is a pure function of its inputs. The storage
//! adapter reads a [`RotationView`] inside a transaction, calls [`apply`],
//! and writes the returned [`TransitionResult`] all-or-nothing. Conflicts are
//! handled by restarting that whole sequence through [`retry_transient`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod clock;
mod command;
mod error;
mod retry;
mod state;

#[cfg(test)]
mod tests;

pub use apply::{apply, next_up};
pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{Command, validate_command};
pub use error::CoreError;
pub use retry::{RetryError, RetryPolicy, Retryable, retry_transient};
pub use state::{Effect, NextUp, RotationView, TransitionResult};
