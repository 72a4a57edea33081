// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One optimistic attempt at an assignment or skip.
//!
//! The attempt reads the rotation row and every agent with their versions,
//! computes the transition with the pure engine, and writes the pointer,
//! the lead or snooze, and the log entry. Writes are conditioned on the
//! versions read. Everything happens in one `BEGIN IMMEDIATE` transaction,
//! so a failed attempt leaves nothing behind. Taking the write lock up front
//! means a concurrent commit makes this attempt wait on the busy timeout
//! instead of failing its first write on a stale WAL snapshot.

use diesel::SqliteConnection;
use lead_rotation::{Command, Effect, RotationView, TransitionResult, apply};
use lead_rotation_audit::{Actor, LogEntry};
use lead_rotation_domain::{Agent, AgentId, Lead};
use std::collections::HashMap;
use time::OffsetDateTime;
use tracing::info;

use crate::data_models::CommittedTransition;
use crate::error::PersistenceError;
use crate::mutations::{agents, audit, leads, rotation};
use crate::queries;

/// Runs one read-compute-write attempt in its own transaction.
///
/// # Errors
///
/// Returns `Conflict` if a concurrent writer invalidated what was read,
/// `Rejected` if the engine refused the command, or a database error.
pub fn execute_command(
    conn: &mut SqliteConnection,
    command: &Command,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<CommittedTransition, PersistenceError> {
    conn.immediate_transaction::<CommittedTransition, PersistenceError, _>(|conn| {
        let (rotation_state, rotation_version) =
            queries::rotation::get_rotation_state_with_version(conn)?;
        let agent_rows: Vec<(Agent, i64)> = queries::agents::list_agents_with_versions(conn)?;
        let versions: HashMap<AgentId, i64> = agent_rows
            .iter()
            .map(|(agent, version)| (agent.id.clone(), *version))
            .collect();
        let view: RotationView = RotationView::new(
            rotation_state,
            agent_rows.into_iter().map(|(agent, _)| agent).collect(),
        );

        let result: TransitionResult = apply(&view, command.clone(), actor.clone(), now)?;

        persist_transition(conn, result, rotation_version, &versions, now)
    })
}

fn persist_transition(
    conn: &mut SqliteConnection,
    result: TransitionResult,
    rotation_version: Option<i64>,
    agent_versions: &HashMap<AgentId, i64>,
    now: OffsetDateTime,
) -> Result<CommittedTransition, PersistenceError> {
    rotation::write_rotation_state_guarded(conn, &result.new_rotation, rotation_version)?;

    let (lead, snooze_until): (Option<Lead>, Option<OffsetDateTime>) = match result.effect {
        Effect::LeadCreated(lead) => {
            let lead_id: i64 = leads::insert_lead(conn, &lead)?;
            (Some(lead.with_id(lead_id)), None)
        }
        Effect::AgentSnoozed {
            agent_id,
            snooze_until,
        } => {
            let expected_version: i64 = *agent_versions.get(&agent_id).ok_or_else(|| {
                PersistenceError::ReconstructionError(format!(
                    "No version recorded for agent '{agent_id}'"
                ))
            })?;
            agents::snooze_agent_guarded(conn, &agent_id, snooze_until, expected_version, now)?;
            (None, Some(snooze_until))
        }
    };

    let log_id: i64 = audit::append_log_entry(conn, &result.log_entry)?;
    let log_entry: LogEntry = result.log_entry.with_id(log_id);

    info!(
        log_id,
        kind = %log_entry.kind(),
        agent_id = %log_entry.target_id(),
        pointer_pos = result.new_rotation.pointer_pos,
        "Committed rotation transition"
    );

    Ok(CommittedTransition {
        rotation: result.new_rotation,
        lead,
        snooze_until,
        log_entry,
    })
}
