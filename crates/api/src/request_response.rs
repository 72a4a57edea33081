// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Logs returned by `fetch_recent_logs` when the caller gives no limit.
pub const DEFAULT_LOG_LIMIT: usize = 10;

/// An agent as presented by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// The agent's identifier.
    pub agent_id: String,
    /// The agent's display name.
    pub name: String,
    /// `staff` or `manager`.
    pub role: String,
    /// Whether the account is active.
    pub active: bool,
    /// Whether the agent is on duty.
    pub on_duty: bool,
    /// Rotation position.
    pub position: i64,
    /// End of the current snooze, if any.
    #[serde(with = "time::serde::rfc3339::option")]
    pub snooze_until: Option<OffsetDateTime>,
}

/// API request to create or replace an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertAgentRequest {
    /// The agent's identifier.
    pub agent_id: String,
    /// The agent's display name.
    pub name: String,
    /// `staff` or `manager`. Defaults to `staff`.
    #[serde(default)]
    pub role: Option<String>,
    /// Defaults to `true`.
    #[serde(default)]
    pub active: Option<bool>,
    /// Defaults to `true`.
    #[serde(default)]
    pub on_duty: Option<bool>,
    /// Rotation position.
    pub position: i64,
}

/// API request to put an agent on or off duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDutyRequest {
    pub on_duty: bool,
}

/// API request to activate or deactivate an agent's account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// API request to move an agent within the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPositionRequest {
    pub position: i64,
}

/// API response listing agents in rotation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAgentsResponse {
    pub agents: Vec<AgentInfo>,
}

/// API response previewing the next assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextUpResponse {
    /// Who the next assignment would pick. `None` for an empty pool.
    pub next: Option<AgentInfo>,
    /// The eligible pool the preview was computed from.
    pub eligible: Vec<AgentInfo>,
    /// The current rotation pointer.
    pub pointer_pos: i64,
}

/// API request to hand a lead to the next agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignLeadRequest {
    /// The customer's name.
    pub customer: String,
    /// The dispatching manager.
    pub manager_id: String,
    /// The manager's display name. Defaults to `Manager`.
    #[serde(default)]
    pub manager_name: String,
}

/// A lead as presented by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadInfo {
    pub lead_id: i64,
    pub customer: String,
    pub assigned_to: String,
    pub assigned_to_name: String,
    pub assigned_by: String,
    pub assigned_by_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
    /// `handed` or `closed`.
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub follow_up_due: OffsetDateTime,
    pub closed: bool,
    pub source: String,
}

/// API response for a successful assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignLeadResponse {
    /// The created lead.
    pub lead: LeadInfo,
    /// The rotation pointer after the assignment.
    pub pointer_pos: i64,
    /// The ID of the log entry recording the assignment.
    pub log_id: i64,
}

/// API request to skip an agent once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipAgentRequest {
    /// The agent to skip.
    pub target_agent_id: String,
    /// Why the agent is skipped.
    pub reason: String,
    /// The manager performing the skip.
    pub manager_id: String,
    /// The manager's display name. Defaults to `Manager`.
    #[serde(default)]
    pub manager_name: String,
    /// Snooze length. The server default applies when absent.
    #[serde(default)]
    pub snooze_minutes: Option<u32>,
}

/// API response for a successful skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipAgentResponse {
    /// The rotation pointer after the skip.
    pub next_pointer_pos: i64,
    /// The skipped agent.
    pub agent_id: String,
    /// When the skipped agent becomes eligible again.
    #[serde(with = "time::serde::rfc3339")]
    pub snooze_until: OffsetDateTime,
    /// The ID of the log entry recording the skip.
    pub log_id: i64,
}

/// A rotation log entry as presented by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryInfo {
    pub log_id: i64,
    /// `assign` or `skip`.
    #[serde(rename = "type")]
    pub kind: String,
    pub target_id: String,
    pub target_name: String,
    /// Present only on skips.
    pub reason: Option<String>,
    /// Present only on assignments.
    pub customer: Option<String>,
    pub pointer_pos_after: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub manager_id: String,
    pub manager_name: String,
}

/// API response listing recent log entries, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentLogsResponse {
    pub entries: Vec<LogEntryInfo>,
}

/// API response listing an agent's leads, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLeadsResponse {
    pub agent_id: String,
    pub leads: Vec<LeadInfo>,
}

/// API response with an agent's assignment counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentCountsResponse {
    pub agent_id: String,
    /// Leads since 00:00 UTC today.
    pub assigned_today: u64,
    /// Leads since the first of the current UTC month.
    pub assigned_month: u64,
}
