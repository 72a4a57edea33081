// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, validate_command};
use crate::error::CoreError;
use crate::state::{Effect, NextUp, RotationView, TransitionResult};
use lead_rotation_audit::{Actor, LogEntry};
use lead_rotation_domain::{
    Agent, AgentId, DomainError, Lead, RotationState, eligible_agents, select_next, skip_successor,
    snooze_deadline,
};
use time::OffsetDateTime;

/// Applies a command to the current rotation view.
///
/// This is a pure function. Eligibility is evaluated against `now` from the
/// raw agent records in `view`; no caller-supplied flag is trusted.
///
/// # Arguments
///
/// * `view` - The rotation pointer and agent records read in this attempt
/// * `command` - The command to apply
/// * `actor` - The manager performing the action
/// * `now` - The instant of the transaction attempt
///
/// # Returns
///
/// * `Ok(TransitionResult)` with the new pointer, the effect, and the log entry
/// * `Err(CoreError)` if the command is rejected; nothing must be written
///
/// # Errors
///
/// Returns an error if:
/// - the command's inputs are invalid
/// - an assignment finds no eligible agent
/// - a skip targets an agent that does not exist
pub fn apply(
    view: &RotationView,
    command: Command,
    actor: Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    match validate_command(command)? {
        Command::AssignNextLead { customer } => assign_next(view, customer, actor, now),
        Command::SkipAgent {
            target,
            reason,
            snooze_minutes,
        } => skip_agent(view, &target, reason, snooze_minutes, actor, now),
    }
}

fn assign_next(
    view: &RotationView,
    customer: String,
    actor: Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let eligible: Vec<Agent> = eligible_agents(&view.agents, now);
    let pick: &Agent = select_next(&eligible, &view.rotation.cursor())
        .ok_or(CoreError::DomainViolation(DomainError::NoEligibleAgents))?;

    let lead: Lead = Lead::handed(&customer, pick, &actor.id, &actor.name, now)?;

    let new_rotation: RotationState = RotationState {
        pointer_pos: pick.position,
        pointer_agent: Some(pick.id.clone()),
        last_assigned_to: Some(pick.id.clone()),
        last_assigned_at: Some(now),
        updated_by: Some(actor.id.clone()),
    };

    let log_entry: LogEntry = LogEntry::assign(
        pick.id.clone(),
        pick.display_name().to_string(),
        customer,
        pick.position,
        now,
        actor,
    );

    Ok(TransitionResult {
        new_rotation,
        effect: Effect::LeadCreated(lead),
        log_entry,
    })
}

fn skip_agent(
    view: &RotationView,
    target_id: &AgentId,
    reason: String,
    snooze_minutes: u32,
    actor: Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let target: &Agent = view.agent(target_id).ok_or_else(|| {
        CoreError::DomainViolation(DomainError::AgentNotFound {
            agent_id: target_id.value().to_string(),
        })
    })?;

    let snooze_until: OffsetDateTime = snooze_deadline(now, snooze_minutes)?;

    // The target is snoozed from `now` on, so it is not part of the pool.
    let eligible: Vec<Agent> = eligible_agents(
        view.agents.iter().filter(|agent| agent.id != target.id),
        now,
    );
    let successor: Option<&Agent> = skip_successor(&eligible, target);
    let next_pos: i64 = successor.map_or(0, |agent| agent.position);

    // Last-assignment fields are untouched by a skip.
    let new_rotation: RotationState = RotationState {
        pointer_pos: next_pos,
        pointer_agent: successor.map(|agent| agent.id.clone()),
        updated_by: Some(actor.id.clone()),
        ..view.rotation.clone()
    };

    let log_entry: LogEntry = LogEntry::skip(
        target.id.clone(),
        target.display_name().to_string(),
        reason,
        next_pos,
        now,
        actor,
    );

    Ok(TransitionResult {
        new_rotation,
        effect: Effect::AgentSnoozed {
            agent_id: target.id.clone(),
            snooze_until,
        },
        log_entry,
    })
}

/// Previews who the next assignment would pick without changing anything.
#[must_use]
pub fn next_up(view: &RotationView, now: OffsetDateTime) -> NextUp {
    let eligible: Vec<Agent> = eligible_agents(&view.agents, now);
    let next: Option<Agent> = select_next(&eligible, &view.rotation.cursor()).cloned();
    NextUp {
        next,
        eligible,
        pointer_pos: view.rotation.pointer_pos,
    }
}
