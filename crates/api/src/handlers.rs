// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for rotation writes, directory writes, and reads.

use lead_rotation::NextUp;
use lead_rotation_audit::{Actor, LogEntry};
use lead_rotation_domain::{Agent, AgentRole, Lead, validate_snooze_minutes};
use lead_rotation_persistence::{AssignmentCounts, CommittedTransition, Persistence};
use std::str::FromStr;
use time::OffsetDateTime;
use tracing::info;

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AgentInfo, AssignLeadRequest, AssignLeadResponse, AssignmentCountsResponse, DEFAULT_LOG_LIMIT,
    LeadInfo, ListAgentsResponse, ListLeadsResponse, LogEntryInfo, NextUpResponse,
    RecentLogsResponse, SetActiveRequest, SetDutyRequest, SetPositionRequest, SkipAgentRequest,
    SkipAgentResponse, UpsertAgentRequest,
};

// ============================================================================
// Conversions
// ============================================================================

fn agent_to_info(agent: &Agent) -> AgentInfo {
    AgentInfo {
        agent_id: agent.id.value().to_string(),
        name: agent.name.clone(),
        role: agent.role.as_str().to_string(),
        active: agent.active,
        on_duty: agent.on_duty,
        position: agent.position,
        snooze_until: agent.snooze_until,
    }
}

fn lead_to_info(lead: &Lead) -> Result<LeadInfo, ApiError> {
    let lead_id: i64 = lead.lead_id.ok_or_else(|| ApiError::Internal {
        message: format!(
            "Lead for '{}' was returned without an id (data integrity violation)",
            lead.customer
        ),
    })?;
    Ok(LeadInfo {
        lead_id,
        customer: lead.customer.clone(),
        assigned_to: lead.assigned_to.value().to_string(),
        assigned_to_name: lead.assigned_to_name.clone(),
        assigned_by: lead.assigned_by.clone(),
        assigned_by_name: lead.assigned_by_name.clone(),
        assigned_at: lead.assigned_at,
        status: lead.status.as_str().to_string(),
        follow_up_due: lead.follow_up_due,
        closed: lead.closed,
        source: lead.source.clone(),
    })
}

fn log_entry_to_info(entry: &LogEntry) -> Result<LogEntryInfo, ApiError> {
    let log_id: i64 = entry.log_id().ok_or_else(|| ApiError::Internal {
        message: String::from("Log entry was returned without an id (data integrity violation)"),
    })?;
    Ok(LogEntryInfo {
        log_id,
        kind: entry.kind().as_str().to_string(),
        target_id: entry.target_id().value().to_string(),
        target_name: entry.target_name().to_string(),
        reason: entry.reason().map(str::to_string),
        customer: entry.customer().map(str::to_string),
        pointer_pos_after: entry.pointer_pos_after(),
        created_at: entry.created_at(),
        manager_id: entry.manager().id.clone(),
        manager_name: entry.manager().name.clone(),
    })
}

/// Builds the audit actor for a manager-initiated write.
///
/// # Errors
///
/// Returns `InvalidInput` if the manager id is empty.
fn manager_actor(manager_id: &str, manager_name: &str) -> Result<Actor, ApiError> {
    let manager_id: &str = manager_id.trim();
    if manager_id.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("manager_id"),
            message: String::from("Manager id is required"),
        });
    }
    Ok(Actor::new(manager_id, manager_name.trim()))
}

fn committed_log_id(committed: &CommittedTransition) -> Result<i64, ApiError> {
    committed.log_entry.log_id().ok_or_else(|| ApiError::Internal {
        message: String::from("Committed log entry has no id"),
    })
}

// ============================================================================
// Rotation
// ============================================================================

/// Lists the agents eligible for a lead right now, in rotation order.
///
/// This is a read-only operation and may trail an in-flight write.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn fetch_eligible_users(persistence: &mut Persistence) -> Result<ListAgentsResponse, ApiError> {
    let eligible: Vec<Agent> = persistence
        .fetch_eligible_agents()
        .map_err(|e| translate_persistence_error(e, "Agent"))?;

    Ok(ListAgentsResponse {
        agents: eligible.iter().map(agent_to_info).collect(),
    })
}

/// Previews whom the next assignment would pick, without changing anything.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn fetch_next_up(persistence: &mut Persistence) -> Result<NextUpResponse, ApiError> {
    let preview: NextUp = persistence
        .fetch_next_up()
        .map_err(|e| translate_persistence_error(e, "Rotation"))?;

    Ok(NextUpResponse {
        next: preview.next.as_ref().map(agent_to_info),
        eligible: preview.eligible.iter().map(agent_to_info).collect(),
        pointer_pos: preview.pointer_pos,
    })
}

/// Hands a lead to the next eligible agent in the rotation.
///
/// Input is validated before anything is read. The assignment, pointer
/// advance, and log entry commit together or not at all.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The customer and the dispatching manager
///
/// # Errors
///
/// Returns an error if:
/// - The customer name or manager id is empty (`InvalidInput`)
/// - Nobody is eligible (`NoEligibleAgents`)
/// - Concurrent writers exhausted the retry budget (`TransientConflict`)
pub fn assign_next_lead(
    persistence: &mut Persistence,
    request: &AssignLeadRequest,
) -> Result<AssignLeadResponse, ApiError> {
    let actor: Actor = manager_actor(&request.manager_id, &request.manager_name)?;

    let committed: CommittedTransition = persistence
        .assign_next_lead(&request.customer, &actor)
        .map_err(|e| translate_persistence_error(e, "Agent"))?;

    let lead: &Lead = committed.lead.as_ref().ok_or_else(|| ApiError::Internal {
        message: String::from("Assignment committed without a lead"),
    })?;

    info!(
        lead_id = ?lead.lead_id,
        agent_id = %lead.assigned_to,
        manager_id = %actor.id,
        "Lead assigned"
    );

    Ok(AssignLeadResponse {
        lead: lead_to_info(lead)?,
        pointer_pos: committed.rotation.pointer_pos,
        log_id: committed_log_id(&committed)?,
    })
}

/// Skips an agent once: snoozes them and moves the pointer past them.
///
/// No lead is created. `default_snooze_minutes` applies when the request
/// does not carry a snooze length.
///
/// # Errors
///
/// Returns an error if:
/// - The target id, reason, or manager id is empty, or the snooze length
///   is out of range (`InvalidInput`)
/// - The target agent does not exist (`NotFound`)
/// - Concurrent writers exhausted the retry budget (`TransientConflict`)
pub fn skip_user_once(
    persistence: &mut Persistence,
    request: &SkipAgentRequest,
    default_snooze_minutes: u32,
) -> Result<SkipAgentResponse, ApiError> {
    let actor: Actor = manager_actor(&request.manager_id, &request.manager_name)?;
    let snooze_minutes: u32 = request.snooze_minutes.unwrap_or(default_snooze_minutes);

    let committed: CommittedTransition = persistence
        .skip_agent(
            &request.target_agent_id,
            &request.reason,
            snooze_minutes,
            &actor,
        )
        .map_err(|e| translate_persistence_error(e, "Agent"))?;

    let agent_id: String = committed.log_entry.target_id().value().to_string();
    let snooze_until: OffsetDateTime = committed.snooze_until.ok_or_else(|| ApiError::Internal {
        message: format!("Skip of agent '{agent_id}' committed without a snooze deadline"),
    })?;

    info!(
        agent_id = %agent_id,
        snooze_minutes,
        next_pointer_pos = committed.rotation.pointer_pos,
        manager_id = %actor.id,
        "Agent skipped"
    );

    Ok(SkipAgentResponse {
        next_pointer_pos: committed.rotation.pointer_pos,
        agent_id,
        snooze_until,
        log_id: committed_log_id(&committed)?,
    })
}

/// Returns the most recent rotation log entries, newest first.
///
/// `limit` defaults to [`DEFAULT_LOG_LIMIT`] and is capped by the store.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn fetch_recent_logs(
    persistence: &mut Persistence,
    limit: Option<usize>,
) -> Result<RecentLogsResponse, ApiError> {
    let entries: Vec<LogEntry> = persistence
        .fetch_recent_logs(limit.unwrap_or(DEFAULT_LOG_LIMIT))
        .map_err(|e| translate_persistence_error(e, "Log entry"))?;

    Ok(RecentLogsResponse {
        entries: entries
            .iter()
            .map(log_entry_to_info)
            .collect::<Result<Vec<LogEntryInfo>, ApiError>>()?,
    })
}

// ============================================================================
// Leads
// ============================================================================

/// Retrieves a lead by ID.
///
/// # Errors
///
/// Returns `NotFound` if the lead does not exist.
pub fn get_lead(persistence: &mut Persistence, lead_id: i64) -> Result<LeadInfo, ApiError> {
    let lead: Lead = persistence
        .get_lead(lead_id)
        .map_err(|e| translate_persistence_error(e, "Lead"))?;
    lead_to_info(&lead)
}

/// Lists the leads handed to an agent, newest first.
///
/// # Errors
///
/// Returns `NotFound` if the agent does not exist.
pub fn list_agent_leads(
    persistence: &mut Persistence,
    agent_id: &str,
) -> Result<ListLeadsResponse, ApiError> {
    let leads: Vec<Lead> = persistence
        .list_leads_for_agent(agent_id)
        .map_err(|e| translate_persistence_error(e, "Agent"))?;

    Ok(ListLeadsResponse {
        agent_id: agent_id.to_string(),
        leads: leads
            .iter()
            .map(lead_to_info)
            .collect::<Result<Vec<LeadInfo>, ApiError>>()?,
    })
}

/// Counts an agent's leads for the current UTC day and month.
///
/// # Errors
///
/// Returns `NotFound` if the agent does not exist.
pub fn get_assignment_counts(
    persistence: &mut Persistence,
    agent_id: &str,
) -> Result<AssignmentCountsResponse, ApiError> {
    let counts: AssignmentCounts = persistence
        .agent_assignment_counts(agent_id)
        .map_err(|e| translate_persistence_error(e, "Agent"))?;

    Ok(AssignmentCountsResponse {
        agent_id: agent_id.to_string(),
        assigned_today: counts.assigned_today,
        assigned_month: counts.assigned_month,
    })
}

// ============================================================================
// Agent Directory
// ============================================================================

/// Lists every agent in rotation order, eligible or not.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_agents(persistence: &mut Persistence) -> Result<ListAgentsResponse, ApiError> {
    let agents: Vec<Agent> = persistence
        .list_agents()
        .map_err(|e| translate_persistence_error(e, "Agent"))?;

    Ok(ListAgentsResponse {
        agents: agents.iter().map(agent_to_info).collect(),
    })
}

/// Creates an agent or replaces an existing one.
///
/// # Errors
///
/// Returns `InvalidInput` if the id is empty or the role is unknown.
pub fn upsert_agent(
    persistence: &mut Persistence,
    request: &UpsertAgentRequest,
) -> Result<AgentInfo, ApiError> {
    let agent_id: &str = request.agent_id.trim();
    if agent_id.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("agent_id"),
            message: String::from("Agent id is required"),
        });
    }

    let role: AgentRole = match &request.role {
        Some(role) => AgentRole::from_str(role).map_err(translate_domain_error)?,
        None => AgentRole::default(),
    };

    let mut agent: Agent = Agent::new(agent_id, request.name.trim(), role, request.position);
    agent.active = request.active.unwrap_or(true);
    agent.on_duty = request.on_duty.unwrap_or(true);

    persistence
        .upsert_agent(&agent)
        .map_err(|e| translate_persistence_error(e, "Agent"))?;

    info!(agent_id, role = %role, position = agent.position, "Agent saved");

    reload_agent(persistence, agent_id)
}

/// Puts an agent on or off duty.
///
/// # Errors
///
/// Returns `NotFound` if the agent does not exist.
pub fn set_agent_on_duty(
    persistence: &mut Persistence,
    agent_id: &str,
    request: SetDutyRequest,
) -> Result<AgentInfo, ApiError> {
    persistence
        .set_agent_on_duty(agent_id, request.on_duty)
        .map_err(|e| translate_persistence_error(e, "Agent"))?;
    reload_agent(persistence, agent_id)
}

/// Activates or deactivates an agent's account.
///
/// # Errors
///
/// Returns `NotFound` if the agent does not exist.
pub fn set_agent_active(
    persistence: &mut Persistence,
    agent_id: &str,
    request: SetActiveRequest,
) -> Result<AgentInfo, ApiError> {
    persistence
        .set_agent_active(agent_id, request.active)
        .map_err(|e| translate_persistence_error(e, "Agent"))?;
    reload_agent(persistence, agent_id)
}

/// Moves an agent to a new rotation position.
///
/// # Errors
///
/// Returns `NotFound` if the agent does not exist.
pub fn set_agent_position(
    persistence: &mut Persistence,
    agent_id: &str,
    request: SetPositionRequest,
) -> Result<AgentInfo, ApiError> {
    persistence
        .set_agent_position(agent_id, request.position)
        .map_err(|e| translate_persistence_error(e, "Agent"))?;
    reload_agent(persistence, agent_id)
}

/// Ends an agent's snooze early.
///
/// # Errors
///
/// Returns `NotFound` if the agent does not exist.
pub fn clear_agent_snooze(
    persistence: &mut Persistence,
    agent_id: &str,
) -> Result<AgentInfo, ApiError> {
    persistence
        .clear_agent_snooze(agent_id)
        .map_err(|e| translate_persistence_error(e, "Agent"))?;
    reload_agent(persistence, agent_id)
}

fn reload_agent(persistence: &mut Persistence, agent_id: &str) -> Result<AgentInfo, ApiError> {
    persistence
        .get_agent(agent_id)
        .map(|agent| agent_to_info(&agent))
        .map_err(|e| translate_persistence_error(e, "Agent"))
}

/// Validates a configured default snooze length.
///
/// # Errors
///
/// Returns `InvalidInput` if the value is out of range.
pub fn validate_default_snooze(minutes: u32) -> Result<u32, ApiError> {
    validate_snooze_minutes(minutes).map_err(translate_domain_error)
}
