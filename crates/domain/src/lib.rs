// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rules for the lead rotation engine.
//!
//! This crate is pure: it never performs I/O and never reads the clock.
//! Every rule that depends on time takes the instant as an argument, so the
//! same predicate is evaluated identically for read-only previews and inside
//! write transactions.

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

mod eligibility;
mod error;
mod rotation;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use eligibility::{eligible_agents, is_eligible, rotation_order};
pub use error::DomainError;
pub use rotation::{
    DEFAULT_SNOOZE_MINUTES, FOLLOW_UP_WINDOW, MAX_SNOOZE_MINUTES, RotationCursor, follow_up_due,
    select_next, skip_successor, snooze_deadline,
};
pub use types::{
    Agent, AgentId, AgentRole, DEFAULT_LEAD_SOURCE, DEFAULT_MANAGER_NAME, Lead, LeadStatus,
    RotationState, UNNAMED_AGENT,
};
pub use validation::{
    validate_customer, validate_skip_reason, validate_snooze_minutes, validate_target_id,
};
