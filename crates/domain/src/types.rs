// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::rotation::{RotationCursor, follow_up_due};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Display name recorded for an agent whose profile has no name.
pub const UNNAMED_AGENT: &str = "User";

/// Display name recorded for a manager who did not supply one.
pub const DEFAULT_MANAGER_NAME: &str = "Manager";

/// Source recorded on leads created by the rotation.
pub const DEFAULT_LEAD_SOURCE: &str = "BDC Portal";

/// Stable identifier of an agent in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Creates a new `AgentId`.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role an agent holds in the user directory.
///
/// Only `Staff` agents are routable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Sales staff receiving leads.
    #[default]
    Staff,
    /// Managers dispatch leads but never receive them.
    Manager,
}

impl AgentRole {
    /// Converts this role to its persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Manager => "manager",
        }
    }

    /// Returns whether agents with this role may receive leads.
    #[must_use]
    pub const fn is_routable(&self) -> bool {
        matches!(self, Self::Staff)
    }
}

impl FromStr for AgentRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "staff" => Ok(Self::Staff),
            "manager" => Ok(Self::Manager),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An agent record as seen by the rotation engine.
///
/// The record is owned by the user directory. The engine reads the flags and
/// position, and writes only `snooze_until` and `position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// The agent's identifier.
    pub id: AgentId,
    /// The agent's display name.
    pub name: String,
    /// The agent's role.
    pub role: AgentRole,
    /// Whether the agent's account is active.
    pub active: bool,
    /// Whether the agent is currently on duty.
    pub on_duty: bool,
    /// Rotation order. Need not be contiguous.
    pub position: i64,
    /// The agent is excluded from the rotation until this instant.
    #[serde(with = "time::serde::rfc3339::option")]
    pub snooze_until: Option<OffsetDateTime>,
}

impl Agent {
    /// Creates an active, on-duty agent with no snooze.
    #[must_use]
    pub fn new(id: &str, name: &str, role: AgentRole, position: i64) -> Self {
        Self {
            id: AgentId::new(id),
            name: name.to_string(),
            role,
            active: true,
            on_duty: true,
            position,
            snooze_until: None,
        }
    }

    /// Returns the name to record for this agent in leads and log entries.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let trimmed: &str = self.name.trim();
        if trimmed.is_empty() {
            UNNAMED_AGENT
        } else {
            trimmed
        }
    }
}

/// The singleton rotation pointer.
///
/// `pointer_pos` is the position of the most recently served (or skip-passed)
/// agent, or 0 if the rotation has never been used.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RotationState {
    /// Position of the last served or passed agent.
    pub pointer_pos: i64,
    /// The agent at `pointer_pos` that was served or passed, if known.
    pub pointer_agent: Option<AgentId>,
    /// The agent that received the most recent lead.
    pub last_assigned_to: Option<AgentId>,
    /// When the most recent lead was assigned.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_assigned_at: Option<OffsetDateTime>,
    /// The manager that last moved the pointer.
    pub updated_by: Option<String>,
}

impl RotationState {
    /// Returns the state of a rotation that has never been used.
    #[must_use]
    pub fn initial() -> Self {
        Self::default()
    }

    /// Returns the cursor the next selection starts after.
    #[must_use]
    pub fn cursor(&self) -> RotationCursor {
        RotationCursor {
            position: self.pointer_pos,
            agent: self.pointer_agent.clone(),
        }
    }
}

/// Lifecycle status of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    /// Handed to an agent and awaiting follow-up.
    #[default]
    Handed,
    /// Closed by lead management.
    Closed,
}

impl LeadStatus {
    /// Converts this status to its persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Handed => "handed",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "handed" => Ok(Self::Handed),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidLeadStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer inquiry assigned to exactly one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    /// The persisted identifier. `None` until the lead is stored.
    pub lead_id: Option<i64>,
    /// The customer name, trimmed.
    pub customer: String,
    /// The agent the lead was handed to.
    pub assigned_to: AgentId,
    /// The agent's display name at assignment time.
    pub assigned_to_name: String,
    /// The manager that dispatched the lead.
    pub assigned_by: String,
    /// The manager's display name.
    pub assigned_by_name: String,
    /// When the lead was assigned.
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
    /// Lifecycle status.
    pub status: LeadStatus,
    /// When the first follow-up is due.
    #[serde(with = "time::serde::rfc3339")]
    pub follow_up_due: OffsetDateTime,
    /// Whether the lead is closed.
    pub closed: bool,
    /// Where the lead came from.
    pub source: String,
}

impl Lead {
    /// Creates a freshly handed lead.
    ///
    /// # Errors
    ///
    /// Returns an error if the follow-up deadline overflows.
    pub fn handed(
        customer: &str,
        agent: &Agent,
        assigned_by: &str,
        assigned_by_name: &str,
        assigned_at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            lead_id: None,
            customer: customer.to_string(),
            assigned_to: agent.id.clone(),
            assigned_to_name: agent.display_name().to_string(),
            assigned_by: assigned_by.to_string(),
            assigned_by_name: assigned_by_name.to_string(),
            assigned_at,
            status: LeadStatus::Handed,
            follow_up_due: follow_up_due(assigned_at)?,
            closed: false,
            source: DEFAULT_LEAD_SOURCE.to_string(),
        })
    }

    /// Returns this lead with its persisted identifier set.
    #[must_use]
    pub fn with_id(mut self, lead_id: i64) -> Self {
        self.lead_id = Some(lead_id);
        self
    }
}
