// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Agent directory writes.
//!
//! Every write bumps the row's `version`, so an in-flight transition that
//! read the old version loses its guarded write and retries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use lead_rotation_domain::{Agent, AgentId};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::diesel_schema::agents;
use crate::error::PersistenceError;
use crate::timestamps;

fn bool_flag(value: bool) -> i32 {
    i32::from(value)
}

fn require_updated(rows: usize, agent_id: &str) -> Result<(), PersistenceError> {
    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("Agent '{agent_id}'")));
    }
    Ok(())
}

/// Creates an agent, or replaces every field of an existing one.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_agent(
    conn: &mut SqliteConnection,
    agent: &Agent,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let snooze_until: Option<String> = timestamps::encode_opt(agent.snooze_until)?;
    let updated_at: String = timestamps::encode(now)?;

    info!(
        agent_id = %agent.id,
        role = %agent.role,
        position = agent.position,
        "Upserting agent"
    );

    diesel::insert_into(agents::table)
        .values((
            agents::agent_id.eq(agent.id.value()),
            agents::name.eq(&agent.name),
            agents::role.eq(agent.role.as_str()),
            agents::active.eq(bool_flag(agent.active)),
            agents::on_duty.eq(bool_flag(agent.on_duty)),
            agents::position.eq(agent.position),
            agents::snooze_until.eq(&snooze_until),
            agents::version.eq(1_i64),
            agents::updated_at.eq(&updated_at),
        ))
        .on_conflict(agents::agent_id)
        .do_update()
        .set((
            agents::name.eq(&agent.name),
            agents::role.eq(agent.role.as_str()),
            agents::active.eq(bool_flag(agent.active)),
            agents::on_duty.eq(bool_flag(agent.on_duty)),
            agents::position.eq(agent.position),
            agents::snooze_until.eq(&snooze_until),
            agents::version.eq(agents::version + 1),
            agents::updated_at.eq(&updated_at),
        ))
        .execute(conn)?;

    Ok(())
}

/// Sets whether an agent is on duty.
///
/// # Errors
///
/// Returns `NotFound` if the agent does not exist.
pub fn set_on_duty(
    conn: &mut SqliteConnection,
    agent_id: &str,
    on_duty: bool,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    debug!(agent_id, on_duty, "Setting agent duty status");
    let rows: usize = diesel::update(agents::table.filter(agents::agent_id.eq(agent_id)))
        .set((
            agents::on_duty.eq(bool_flag(on_duty)),
            agents::version.eq(agents::version + 1),
            agents::updated_at.eq(timestamps::encode(now)?),
        ))
        .execute(conn)?;
    require_updated(rows, agent_id)
}

/// Sets whether an agent's account is active.
///
/// # Errors
///
/// Returns `NotFound` if the agent does not exist.
pub fn set_active(
    conn: &mut SqliteConnection,
    agent_id: &str,
    active: bool,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    debug!(agent_id, active, "Setting agent active flag");
    let rows: usize = diesel::update(agents::table.filter(agents::agent_id.eq(agent_id)))
        .set((
            agents::active.eq(bool_flag(active)),
            agents::version.eq(agents::version + 1),
            agents::updated_at.eq(timestamps::encode(now)?),
        ))
        .execute(conn)?;
    require_updated(rows, agent_id)
}

/// Moves an agent to a new rotation position.
///
/// # Errors
///
/// Returns `NotFound` if the agent does not exist.
pub fn set_position(
    conn: &mut SqliteConnection,
    agent_id: &str,
    position: i64,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    info!(agent_id, position, "Reordering agent");
    let rows: usize = diesel::update(agents::table.filter(agents::agent_id.eq(agent_id)))
        .set((
            agents::position.eq(position),
            agents::version.eq(agents::version + 1),
            agents::updated_at.eq(timestamps::encode(now)?),
        ))
        .execute(conn)?;
    require_updated(rows, agent_id)
}

/// Ends an agent's snooze early.
///
/// # Errors
///
/// Returns `NotFound` if the agent does not exist.
pub fn clear_snooze(
    conn: &mut SqliteConnection,
    agent_id: &str,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    info!(agent_id, "Clearing agent snooze");
    let rows: usize = diesel::update(agents::table.filter(agents::agent_id.eq(agent_id)))
        .set((
            agents::snooze_until.eq(None::<String>),
            agents::version.eq(agents::version + 1),
            agents::updated_at.eq(timestamps::encode(now)?),
        ))
        .execute(conn)?;
    require_updated(rows, agent_id)
}

/// Sets an agent's snooze deadline, conditioned on the version read earlier
/// in the same transaction.
///
/// # Errors
///
/// Returns `Conflict` if the agent was modified since it was read.
pub fn snooze_agent_guarded(
    conn: &mut SqliteConnection,
    agent_id: &AgentId,
    snooze_until: OffsetDateTime,
    expected_version: i64,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(
        agents::table
            .filter(agents::agent_id.eq(agent_id.value()))
            .filter(agents::version.eq(expected_version)),
    )
    .set((
        agents::snooze_until.eq(timestamps::encode(snooze_until)?),
        agents::version.eq(expected_version + 1),
        agents::updated_at.eq(timestamps::encode(now)?),
    ))
    .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::Conflict(format!(
            "Agent '{agent_id}' changed since version {expected_version}"
        )));
    }
    debug!(agent_id = %agent_id, "Snoozed agent");
    Ok(())
}
