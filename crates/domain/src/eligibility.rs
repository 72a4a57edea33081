// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::Agent;
use std::cmp::Ordering;
use time::OffsetDateTime;

/// Determines whether an agent may receive a lead at the given instant.
///
/// An agent is eligible when all of the following hold:
/// - the role is routable (`staff`)
/// - the account is active
/// - the agent is on duty
/// - there is no snooze, or the snooze has elapsed (`snooze_until <= now`)
///
/// Callers must never substitute a precomputed flag for this predicate.
#[must_use]
pub fn is_eligible(agent: &Agent, now: OffsetDateTime) -> bool {
    agent.role.is_routable()
        && agent.active
        && agent.on_duty
        && agent.snooze_until.is_none_or(|until| until <= now)
}

/// Total order used for the rotation: ascending position, ties by agent id.
#[must_use]
pub fn rotation_order(a: &Agent, b: &Agent) -> Ordering {
    a.position
        .cmp(&b.position)
        .then_with(|| a.id.cmp(&b.id))
}

/// Filters a set of agents down to those eligible at `now`, in rotation order.
///
/// # Arguments
///
/// * `agents` - Every agent known to the directory
/// * `now` - The instant eligibility is evaluated at
///
/// # Returns
///
/// The eligible agents sorted by [`rotation_order`].
#[must_use]
pub fn eligible_agents<'a, I>(agents: I, now: OffsetDateTime) -> Vec<Agent>
where
    I: IntoIterator<Item = &'a Agent>,
{
    let mut eligible: Vec<Agent> = agents
        .into_iter()
        .filter(|agent| is_eligible(agent, now))
        .cloned()
        .collect();
    eligible.sort_by(rotation_order);
    eligible
}
