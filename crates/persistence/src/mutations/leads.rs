// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use lead_rotation_domain::Lead;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::leads;
use crate::error::PersistenceError;
use crate::timestamps;

/// Inserts a lead and returns its new ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_lead(conn: &mut SqliteConnection, lead: &Lead) -> Result<i64, PersistenceError> {
    diesel::insert_into(leads::table)
        .values((
            leads::customer.eq(&lead.customer),
            leads::assigned_to.eq(lead.assigned_to.value()),
            leads::assigned_to_name.eq(&lead.assigned_to_name),
            leads::assigned_by.eq(&lead.assigned_by),
            leads::assigned_by_name.eq(&lead.assigned_by_name),
            leads::assigned_at.eq(timestamps::encode(lead.assigned_at)?),
            leads::status.eq(lead.status.as_str()),
            leads::follow_up_due.eq(timestamps::encode(lead.follow_up_due)?),
            leads::closed.eq(i32::from(lead.closed)),
            leads::source.eq(&lead.source),
        ))
        .execute(conn)?;

    let lead_id: i64 = conn.get_last_insert_rowid()?;
    debug!(lead_id, assigned_to = %lead.assigned_to, "Inserted lead");
    Ok(lead_id)
}
