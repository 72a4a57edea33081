// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use lead_rotation_domain::{AgentId, RotationState};
use tracing::debug;

use crate::diesel_schema::rotation_state;
use crate::error::PersistenceError;
use crate::queries::rotation::ROTATION_ID;
use crate::timestamps;

/// Writes the rotation pointer, conditioned on the version read earlier in
/// the same transaction.
///
/// `expected_version` is `None` when the singleton row did not exist yet; the
/// row is then inserted, and a concurrent insert is reported as a conflict.
///
/// # Errors
///
/// Returns `Conflict` if another writer moved the pointer since it was read.
pub fn write_rotation_state_guarded(
    conn: &mut SqliteConnection,
    state: &RotationState,
    expected_version: Option<i64>,
) -> Result<i64, PersistenceError> {
    let pointer_agent: Option<&str> = state.pointer_agent.as_ref().map(AgentId::value);
    let last_assigned_to: Option<&str> = state.last_assigned_to.as_ref().map(AgentId::value);
    let last_assigned_at: Option<String> = timestamps::encode_opt(state.last_assigned_at)?;

    match expected_version {
        None => {
            let inserted = diesel::insert_into(rotation_state::table)
                .values((
                    rotation_state::rotation_id.eq(ROTATION_ID),
                    rotation_state::pointer_pos.eq(state.pointer_pos),
                    rotation_state::pointer_agent.eq(pointer_agent),
                    rotation_state::last_assigned_to.eq(last_assigned_to),
                    rotation_state::last_assigned_at.eq(&last_assigned_at),
                    rotation_state::updated_by.eq(&state.updated_by),
                    rotation_state::version.eq(1_i64),
                ))
                .execute(conn);

            match inserted {
                Ok(_) => {
                    debug!(pointer_pos = state.pointer_pos, "Created rotation state");
                    Ok(1)
                }
                Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    Err(PersistenceError::Conflict(String::from(
                        "Rotation state was created concurrently",
                    )))
                }
                Err(e) => Err(PersistenceError::from(e)),
            }
        }
        Some(version) => {
            let rows: usize = diesel::update(
                rotation_state::table
                    .filter(rotation_state::rotation_id.eq(ROTATION_ID))
                    .filter(rotation_state::version.eq(version)),
            )
            .set((
                rotation_state::pointer_pos.eq(state.pointer_pos),
                rotation_state::pointer_agent.eq(pointer_agent),
                rotation_state::last_assigned_to.eq(last_assigned_to),
                rotation_state::last_assigned_at.eq(&last_assigned_at),
                rotation_state::updated_by.eq(&state.updated_by),
                rotation_state::version.eq(version + 1),
            ))
            .execute(conn)?;

            if rows == 0 {
                return Err(PersistenceError::Conflict(format!(
                    "Rotation pointer changed since version {version}"
                )));
            }
            debug!(
                pointer_pos = state.pointer_pos,
                version = version + 1,
                "Advanced rotation state"
            );
            Ok(version + 1)
        }
    }
}
