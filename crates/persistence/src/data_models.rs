// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types shared by queries and mutations, and their conversions to
//! domain values.

use diesel::prelude::*;
use lead_rotation_audit::{Actor, LogEntry, LogEntryKind};
use lead_rotation_domain::{Agent, AgentId, AgentRole, Lead, LeadStatus, RotationState};
use std::str::FromStr;
use time::OffsetDateTime;

use crate::diesel_schema::{agents, leads, rotation_log, rotation_state};
use crate::error::PersistenceError;
use crate::timestamps;

/// Diesel Queryable struct for agent rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = agents)]
pub struct AgentRow {
    pub agent_id: String,
    pub name: String,
    pub role: String,
    pub active: i32,
    pub on_duty: i32,
    pub position: i64,
    pub snooze_until: Option<String>,
    pub version: i64,
}

impl AgentRow {
    /// Converts this row into a domain agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the role or snooze deadline cannot be decoded.
    pub fn into_agent(self) -> Result<Agent, PersistenceError> {
        let role: AgentRole = AgentRole::from_str(&self.role)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        Ok(Agent {
            id: AgentId::new(&self.agent_id),
            name: self.name,
            role,
            active: self.active != 0,
            on_duty: self.on_duty != 0,
            position: self.position,
            snooze_until: timestamps::decode_opt(self.snooze_until.as_deref())?,
        })
    }
}

/// Diesel Queryable struct for the rotation singleton.
#[derive(Queryable, Selectable)]
#[diesel(table_name = rotation_state)]
pub struct RotationStateRow {
    pub pointer_pos: i64,
    pub pointer_agent: Option<String>,
    pub last_assigned_to: Option<String>,
    pub last_assigned_at: Option<String>,
    pub updated_by: Option<String>,
    pub version: i64,
}

impl RotationStateRow {
    /// Converts this row into the domain rotation state.
    ///
    /// # Errors
    ///
    /// Returns an error if `last_assigned_at` cannot be decoded.
    pub fn into_state(self) -> Result<RotationState, PersistenceError> {
        Ok(RotationState {
            pointer_pos: self.pointer_pos,
            pointer_agent: self.pointer_agent.as_deref().map(AgentId::new),
            last_assigned_to: self.last_assigned_to.as_deref().map(AgentId::new),
            last_assigned_at: timestamps::decode_opt(self.last_assigned_at.as_deref())?,
            updated_by: self.updated_by,
        })
    }
}

/// Diesel Queryable struct for lead rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = leads)]
pub struct LeadRow {
    pub lead_id: i64,
    pub customer: String,
    pub assigned_to: String,
    pub assigned_to_name: String,
    pub assigned_by: String,
    pub assigned_by_name: String,
    pub assigned_at: String,
    pub status: String,
    pub follow_up_due: String,
    pub closed: i32,
    pub source: String,
}

impl LeadRow {
    /// Converts this row into a domain lead.
    ///
    /// # Errors
    ///
    /// Returns an error if the status or a timestamp cannot be decoded.
    pub fn into_lead(self) -> Result<Lead, PersistenceError> {
        let status: LeadStatus = LeadStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        Ok(Lead {
            lead_id: Some(self.lead_id),
            customer: self.customer,
            assigned_to: AgentId::new(&self.assigned_to),
            assigned_to_name: self.assigned_to_name,
            assigned_by: self.assigned_by,
            assigned_by_name: self.assigned_by_name,
            assigned_at: timestamps::decode(&self.assigned_at)?,
            status,
            follow_up_due: timestamps::decode(&self.follow_up_due)?,
            closed: self.closed != 0,
            source: self.source,
        })
    }
}

/// Diesel Queryable struct for rotation log rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = rotation_log)]
pub struct LogEntryRow {
    pub log_id: i64,
    pub entry_type: String,
    pub target_id: String,
    pub target_name: String,
    pub reason: Option<String>,
    pub customer: Option<String>,
    pub pointer_pos_after: i64,
    pub manager_id: String,
    pub manager_name: String,
    pub created_at: String,
}

impl LogEntryRow {
    /// Converts this row into an immutable log entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind or timestamp cannot be decoded, or if the
    /// row's fields do not match its kind.
    pub fn into_entry(self) -> Result<LogEntry, PersistenceError> {
        let kind: LogEntryKind = LogEntryKind::from_str(&self.entry_type)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        let created_at = timestamps::decode(&self.created_at)?;
        let manager: Actor = Actor {
            id: self.manager_id,
            name: self.manager_name,
        };
        let target_id: AgentId = AgentId::new(&self.target_id);

        let entry: LogEntry = match (kind, self.customer, self.reason) {
            (LogEntryKind::Assign, Some(customer), None) => LogEntry::assign(
                target_id,
                self.target_name,
                customer,
                self.pointer_pos_after,
                created_at,
                manager,
            ),
            (LogEntryKind::Skip, None, Some(reason)) => LogEntry::skip(
                target_id,
                self.target_name,
                reason,
                self.pointer_pos_after,
                created_at,
                manager,
            ),
            _ => {
                return Err(PersistenceError::ReconstructionError(format!(
                    "Log entry {} has fields inconsistent with kind '{kind}'",
                    self.log_id
                )));
            }
        };
        Ok(entry.with_id(self.log_id))
    }
}

/// What a committed assignment or skip wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedTransition {
    /// The rotation pointer after commit.
    pub rotation: RotationState,
    /// The created lead, with its id. `None` for skips.
    pub lead: Option<Lead>,
    /// The snooze deadline a skip wrote. `None` for assignments.
    pub snooze_until: Option<OffsetDateTime>,
    /// The appended log entry, with its id.
    pub log_entry: LogEntry,
}

/// Leads handed to one agent in the current UTC day and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentCounts {
    pub assigned_today: u64,
    pub assigned_month: u64,
}
