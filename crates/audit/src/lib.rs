// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use lead_rotation_domain::{AgentId, DEFAULT_MANAGER_NAME, DomainError};
use std::str::FromStr;
use time::OffsetDateTime;

/// The manager performing a rotation action.
///
/// Every assignment and skip is attributed to exactly one actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The manager's user id.
    pub id: String,
    /// The manager's display name.
    pub name: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// A blank name is recorded as `"Manager"`.
    ///
    /// # Arguments
    ///
    /// * `id` - The manager's user id
    /// * `name` - The manager's display name, possibly empty
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        let trimmed: &str = name.trim();
        let name: &str = if trimmed.is_empty() {
            DEFAULT_MANAGER_NAME
        } else {
            trimmed
        };
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// The kind of event a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogEntryKind {
    /// A lead was handed to an agent.
    Assign,
    /// An agent was snoozed and passed over.
    Skip,
}

impl LogEntryKind {
    /// Converts this kind to its persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Skip => "skip",
        }
    }
}

impl FromStr for LogEntryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assign" => Ok(Self::Assign),
            "skip" => Ok(Self::Skip),
            _ => Err(DomainError::InvalidLogEntryKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for LogEntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable record of one assignment or skip.
///
/// Entries are append-only. The constructors enforce the shape of each kind:
/// - an `assign` entry carries the customer and no reason
/// - a `skip` entry carries a reason and no customer
///
/// Fields are private so an entry cannot be altered after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    log_id: Option<i64>,
    kind: LogEntryKind,
    target_id: AgentId,
    target_name: String,
    reason: Option<String>,
    customer: Option<String>,
    pointer_pos_after: i64,
    created_at: OffsetDateTime,
    manager: Actor,
}

impl LogEntry {
    /// Creates an entry recording that `target` received a lead for `customer`.
    #[must_use]
    pub fn assign(
        target_id: AgentId,
        target_name: String,
        customer: String,
        pointer_pos_after: i64,
        created_at: OffsetDateTime,
        manager: Actor,
    ) -> Self {
        Self {
            log_id: None,
            kind: LogEntryKind::Assign,
            target_id,
            target_name,
            reason: None,
            customer: Some(customer),
            pointer_pos_after,
            created_at,
            manager,
        }
    }

    /// Creates an entry recording that `target` was skipped for `reason`.
    #[must_use]
    pub fn skip(
        target_id: AgentId,
        target_name: String,
        reason: String,
        pointer_pos_after: i64,
        created_at: OffsetDateTime,
        manager: Actor,
    ) -> Self {
        Self {
            log_id: None,
            kind: LogEntryKind::Skip,
            target_id,
            target_name,
            reason: Some(reason),
            customer: None,
            pointer_pos_after,
            created_at,
            manager,
        }
    }

    /// Returns this entry with its persisted identifier set.
    #[must_use]
    pub const fn with_id(mut self, log_id: i64) -> Self {
        self.log_id = Some(log_id);
        self
    }

    /// The persisted identifier, if the entry has been stored.
    #[must_use]
    pub const fn log_id(&self) -> Option<i64> {
        self.log_id
    }

    #[must_use]
    pub const fn kind(&self) -> LogEntryKind {
        self.kind
    }

    #[must_use]
    pub const fn target_id(&self) -> &AgentId {
        &self.target_id
    }

    #[must_use]
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// The skip reason. Always `None` for assignments.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// The customer handed out. Always `None` for skips.
    #[must_use]
    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    /// Pointer position after the event was applied.
    #[must_use]
    pub const fn pointer_pos_after(&self) -> i64 {
        self.pointer_pos_after
    }

    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    #[must_use]
    pub const fn manager(&self) -> &Actor {
        &self.manager
    }
}

#[cfg(test)]
mod tests;
