// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rotation log appends.
//!
//! The table rejects updates and deletes, so inserting is the only write.

use diesel::SqliteConnection;
use diesel::prelude::*;
use lead_rotation_audit::LogEntry;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::rotation_log;
use crate::error::PersistenceError;
use crate::timestamps;

/// Appends a log entry and returns its new ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn append_log_entry(
    conn: &mut SqliteConnection,
    entry: &LogEntry,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(rotation_log::table)
        .values((
            rotation_log::entry_type.eq(entry.kind().as_str()),
            rotation_log::target_id.eq(entry.target_id().value()),
            rotation_log::target_name.eq(entry.target_name()),
            rotation_log::reason.eq(entry.reason()),
            rotation_log::customer.eq(entry.customer()),
            rotation_log::pointer_pos_after.eq(entry.pointer_pos_after()),
            rotation_log::manager_id.eq(&entry.manager().id),
            rotation_log::manager_name.eq(&entry.manager().name),
            rotation_log::created_at.eq(timestamps::encode(entry.created_at())?),
        ))
        .execute(conn)?;

    let log_id: i64 = conn.get_last_insert_rowid()?;
    debug!(log_id, kind = %entry.kind(), "Appended rotation log entry");
    Ok(log_id)
}
