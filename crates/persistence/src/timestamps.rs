// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp encoding for text columns.
//!
//! Instants are stored as fixed-width UTC RFC 3339 strings with microsecond
//! precision, e.g. `2026-03-14T15:00:00.000000Z`. Lexical order on the column
//! is chronological order, so range filters and `ORDER BY` work on the text.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::PersistenceError;

const STORED_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

/// Drops sub-microsecond precision so a value survives a storage round trip.
///
/// # Errors
///
/// Returns an error if the instant cannot be represented.
pub fn truncate_to_micros(at: OffsetDateTime) -> Result<OffsetDateTime, PersistenceError> {
    let nanos: u32 = at.nanosecond() / 1_000 * 1_000;
    at.to_offset(UtcOffset::UTC)
        .replace_nanosecond(nanos)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

/// Encodes an instant for storage.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted (e.g. a year
/// outside 0..=9999).
pub fn encode(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.to_offset(UtcOffset::UTC)
        .format(STORED_FORMAT)
        .map_err(|e| PersistenceError::QueryFailed(format!("Failed to format timestamp: {e}")))
}

/// Decodes a stored instant.
///
/// # Errors
///
/// Returns an error if the text is not in the stored format.
pub fn decode(text: &str) -> Result<OffsetDateTime, PersistenceError> {
    PrimitiveDateTime::parse(text, STORED_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| PersistenceError::ReconstructionError(format!("Bad timestamp '{text}': {e}")))
}

/// Decodes an optional stored instant.
///
/// # Errors
///
/// Returns an error if the text is present but not in the stored format.
pub fn decode_opt(text: Option<&str>) -> Result<Option<OffsetDateTime>, PersistenceError> {
    text.map(decode).transpose()
}

/// Encodes an optional instant.
///
/// # Errors
///
/// Returns an error if the instant is present but cannot be formatted.
pub fn encode_opt(at: Option<OffsetDateTime>) -> Result<Option<String>, PersistenceError> {
    at.map(encode).transpose()
}
