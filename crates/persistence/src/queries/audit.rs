// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use lead_rotation_audit::LogEntry;
use num_traits::ToPrimitive;

use crate::data_models::LogEntryRow;
use crate::diesel_schema::rotation_log;
use crate::error::PersistenceError;

/// Largest number of log entries a single read returns.
pub const MAX_RECENT_LOGS: usize = 500;

/// Returns the most recent log entries, newest first.
///
/// `limit` is clamped to [`MAX_RECENT_LOGS`]. Entries sharing a timestamp are
/// ordered by id, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn get_recent_logs(
    conn: &mut SqliteConnection,
    limit: usize,
) -> Result<Vec<LogEntry>, PersistenceError> {
    let limit: i64 = limit
        .min(MAX_RECENT_LOGS)
        .to_i64()
        .ok_or_else(|| PersistenceError::QueryFailed(format!("Invalid limit: {limit}")))?;
    if limit == 0 {
        return Ok(Vec::new());
    }

    let rows: Vec<LogEntryRow> = rotation_log::table
        .order((rotation_log::created_at.desc(), rotation_log::log_id.desc()))
        .limit(limit)
        .select(LogEntryRow::as_select())
        .load(conn)?;

    rows.into_iter().map(LogEntryRow::into_entry).collect()
}

/// Retrieves a log entry by ID.
///
/// # Errors
///
/// Returns an error if the entry does not exist or cannot be decoded.
pub fn get_log_entry(conn: &mut SqliteConnection, log_id: i64) -> Result<LogEntry, PersistenceError> {
    let row: LogEntryRow = rotation_log::table
        .filter(rotation_log::log_id.eq(log_id))
        .select(LogEntryRow::as_select())
        .first(conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                PersistenceError::NotFound(format!("Log entry {log_id}"))
            }
            other => PersistenceError::from(other),
        })?;

    row.into_entry()
}
