// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use lead_rotation_domain::Lead;
use num_traits::ToPrimitive;
use time::{OffsetDateTime, Time, UtcOffset};

use crate::data_models::{AssignmentCounts, LeadRow};
use crate::diesel_schema::leads;
use crate::error::PersistenceError;
use crate::timestamps;

/// Retrieves a lead by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the lead is not found.
pub fn get_lead(conn: &mut SqliteConnection, lead_id: i64) -> Result<Option<Lead>, PersistenceError> {
    let row: Option<LeadRow> = leads::table
        .filter(leads::lead_id.eq(lead_id))
        .select(LeadRow::as_select())
        .first(conn)
        .optional()?;

    row.map(LeadRow::into_lead).transpose()
}

/// Lists the leads handed to an agent, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_leads_for_agent(
    conn: &mut SqliteConnection,
    agent_id: &str,
) -> Result<Vec<Lead>, PersistenceError> {
    let rows: Vec<LeadRow> = leads::table
        .filter(leads::assigned_to.eq(agent_id))
        .order((leads::assigned_at.desc(), leads::lead_id.desc()))
        .select(LeadRow::as_select())
        .load(conn)?;

    rows.into_iter().map(LeadRow::into_lead).collect()
}

fn count_assigned_since(
    conn: &mut SqliteConnection,
    agent_id: &str,
    since: OffsetDateTime,
) -> Result<u64, PersistenceError> {
    let since: String = timestamps::encode(since)?;
    let count: i64 = leads::table
        .filter(leads::assigned_to.eq(agent_id))
        .filter(leads::assigned_at.ge(&since))
        .count()
        .get_result(conn)?;

    count
        .to_u64()
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("Negative count: {count}")))
}

/// Counts the leads handed to an agent since 00:00 UTC today and since the
/// first day of the current UTC month.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn count_assignments(
    conn: &mut SqliteConnection,
    agent_id: &str,
    now: OffsetDateTime,
) -> Result<AssignmentCounts, PersistenceError> {
    let today: OffsetDateTime = now.to_offset(UtcOffset::UTC).replace_time(Time::MIDNIGHT);
    let month_start: OffsetDateTime = today
        .replace_day(1)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    Ok(AssignmentCounts {
        assigned_today: count_assigned_since(conn, agent_id, today)?,
        assigned_month: count_assigned_since(conn, agent_id, month_start)?,
    })
}
