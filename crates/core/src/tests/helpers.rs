// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, Effect, RotationView, TransitionResult, apply};
use lead_rotation_audit::Actor;
use lead_rotation_domain::{Agent, AgentId, AgentRole, RotationState};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-14 15:00:00 UTC)
}

pub fn create_test_actor() -> Actor {
    Actor::new("manager-1", "Morgan")
}

pub fn staff(id: &str, position: i64) -> Agent {
    Agent::new(id, &format!("Agent {id}"), AgentRole::Staff, position)
}

pub fn create_test_view(agents: Vec<Agent>) -> RotationView {
    RotationView::new(RotationState::initial(), agents)
}

pub fn assign(customer: &str) -> Command {
    Command::AssignNextLead {
        customer: String::from(customer),
    }
}

pub fn skip(target: &str, reason: &str, snooze_minutes: u32) -> Command {
    Command::SkipAgent {
        target: AgentId::new(target),
        reason: String::from(reason),
        snooze_minutes,
    }
}

/// Applies a command and folds the result back into the view, the way the
/// storage adapter would commit it.
pub fn apply_and_commit(
    view: &mut RotationView,
    command: Command,
    now: OffsetDateTime,
) -> TransitionResult {
    let result: TransitionResult = apply(view, command, create_test_actor(), now).unwrap();
    view.rotation = result.new_rotation.clone();
    if let Effect::AgentSnoozed {
        agent_id,
        snooze_until,
    } = &result.effect
    {
        for agent in &mut view.agents {
            if &agent.id == agent_id {
                agent.snooze_until = Some(*snooze_until);
            }
        }
    }
    result
}

pub fn assigned_to(result: &TransitionResult) -> &str {
    match &result.effect {
        Effect::LeadCreated(lead) => lead.assigned_to.value(),
        Effect::AgentSnoozed { .. } => panic!("expected a lead"),
    }
}
