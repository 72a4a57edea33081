// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use lead_rotation_domain::RotationState;

use crate::data_models::RotationStateRow;
use crate::diesel_schema::rotation_state;
use crate::error::PersistenceError;

/// Primary key of the singleton rotation row.
pub const ROTATION_ID: i64 = 1;

/// Reads the rotation pointer and its row version.
///
/// A rotation that has never been used has no row yet; it reads as the
/// initial state with version `None`.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn get_rotation_state_with_version(
    conn: &mut SqliteConnection,
) -> Result<(RotationState, Option<i64>), PersistenceError> {
    let row: Option<RotationStateRow> = rotation_state::table
        .filter(rotation_state::rotation_id.eq(ROTATION_ID))
        .select(RotationStateRow::as_select())
        .first(conn)
        .optional()?;

    match row {
        Some(row) => {
            let version: i64 = row.version;
            Ok((row.into_state()?, Some(version)))
        }
        None => Ok((RotationState::initial(), None)),
    }
}

/// Reads the rotation pointer.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn get_rotation_state(conn: &mut SqliteConnection) -> Result<RotationState, PersistenceError> {
    Ok(get_rotation_state_with_version(conn)?.0)
}
