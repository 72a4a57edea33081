// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Round-robin selection over a freshly sorted eligible set.
//!
//! The rotation is keyed on agent positions rather than on an index into the
//! candidate list. Agents can therefore be added, removed, or reordered
//! between calls without invalidating the pointer.

use crate::error::DomainError;
use crate::types::{Agent, AgentId};
use time::{Duration, OffsetDateTime};

/// Snooze applied by a skip when the caller does not specify one.
pub const DEFAULT_SNOOZE_MINUTES: u32 = 30;

/// Longest snooze a single skip may apply (one day).
pub const MAX_SNOOZE_MINUTES: u32 = 1440;

/// Time between assignment and the first follow-up deadline.
pub const FOLLOW_UP_WINDOW: Duration = Duration::hours(24);

/// The point in the rotation the next selection starts after.
///
/// When `agent` is known the cursor compares on `(position, id)`, so agents
/// sharing a position are each served once per lap. Without it the cursor
/// degrades to a bare position comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RotationCursor {
    /// Position of the last served or passed agent. 0 if never used.
    pub position: i64,
    /// The last served or passed agent, if recorded.
    pub agent: Option<AgentId>,
}

impl RotationCursor {
    /// The cursor of a rotation that has never been used.
    #[must_use]
    pub const fn start() -> Self {
        Self {
            position: 0,
            agent: None,
        }
    }

    /// A cursor sitting on the given agent.
    #[must_use]
    pub fn at(agent: &Agent) -> Self {
        Self {
            position: agent.position,
            agent: Some(agent.id.clone()),
        }
    }

    /// Returns true if `agent` comes strictly after this cursor in the lap.
    #[must_use]
    pub fn precedes(&self, agent: &Agent) -> bool {
        match &self.agent {
            Some(id) => (agent.position, &agent.id) > (self.position, id),
            None => agent.position > self.position,
        }
    }
}

/// Picks the next agent in the rotation.
///
/// `candidates` must already be eligible and sorted in rotation order.
/// Returns the first candidate after the cursor, wrapping to the first
/// candidate when the cursor is at or past the end of the lap. Returns
/// `None` only for an empty pool.
#[must_use]
pub fn select_next<'a>(candidates: &'a [Agent], cursor: &RotationCursor) -> Option<&'a Agent> {
    candidates
        .iter()
        .find(|agent| cursor.precedes(agent))
        .or_else(|| candidates.first())
}

/// Finds the agent the pointer moves to when `target` is skipped.
///
/// The target itself is never returned. The successor is the first
/// candidate after the target in rotation order, wrapping to the first
/// remaining candidate. `None` means nobody else is eligible.
#[must_use]
pub fn skip_successor<'a>(candidates: &'a [Agent], target: &Agent) -> Option<&'a Agent> {
    let cursor: RotationCursor = RotationCursor::at(target);
    let mut remaining = candidates.iter().filter(|agent| agent.id != target.id);
    let first: Option<&Agent> = remaining.clone().next();
    remaining.find(|agent| cursor.precedes(agent)).or(first)
}

/// Computes when a snooze of `minutes` applied at `now` ends.
///
/// # Errors
///
/// Returns `DateArithmeticOverflow` if the deadline is not representable.
pub fn snooze_deadline(now: OffsetDateTime, minutes: u32) -> Result<OffsetDateTime, DomainError> {
    now.checked_add(Duration::minutes(i64::from(minutes)))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding a {minutes} minute snooze"),
        })
}

/// Computes the first follow-up deadline for a lead assigned at `assigned_at`.
///
/// # Errors
///
/// Returns `DateArithmeticOverflow` if the deadline is not representable.
pub fn follow_up_due(assigned_at: OffsetDateTime) -> Result<OffsetDateTime, DomainError> {
    assigned_at
        .checked_add(FOLLOW_UP_WINDOW)
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: String::from("computing the follow-up deadline"),
        })
}
