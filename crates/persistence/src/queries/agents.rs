// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use lead_rotation_domain::Agent;
use tracing::debug;

use crate::data_models::AgentRow;
use crate::diesel_schema::agents;
use crate::error::PersistenceError;

/// Loads every agent with its row version, in rotation order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_agents_with_versions(
    conn: &mut SqliteConnection,
) -> Result<Vec<(Agent, i64)>, PersistenceError> {
    let rows: Vec<AgentRow> = agents::table
        .select(AgentRow::as_select())
        .order((agents::position.asc(), agents::agent_id.asc()))
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            let version: i64 = row.version;
            row.into_agent().map(|agent| (agent, version))
        })
        .collect()
}

/// Loads every agent in rotation order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_agents(conn: &mut SqliteConnection) -> Result<Vec<Agent>, PersistenceError> {
    Ok(list_agents_with_versions(conn)?
        .into_iter()
        .map(|(agent, _)| agent)
        .collect())
}

/// Retrieves an agent by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the agent is not found.
pub fn get_agent(
    conn: &mut SqliteConnection,
    agent_id: &str,
) -> Result<Option<Agent>, PersistenceError> {
    debug!("Looking up agent by ID: {}", agent_id);

    let result: Result<AgentRow, diesel::result::Error> = agents::table
        .filter(agents::agent_id.eq(agent_id))
        .select(AgentRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_agent().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
