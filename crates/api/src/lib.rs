// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the lead rotation engine.
//!
//! Handlers take request DTOs, call into the persistence adapter, and turn
//! lower-layer errors into [`ApiError`]. Nothing below this crate is exposed
//! to callers directly.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    assign_next_lead, clear_agent_snooze, fetch_eligible_users, fetch_next_up, fetch_recent_logs,
    get_assignment_counts, get_lead, list_agent_leads, list_agents, set_agent_active,
    set_agent_on_duty, set_agent_position, skip_user_once, upsert_agent, validate_default_snooze,
};
pub use request_response::{
    AgentInfo, AssignLeadRequest, AssignLeadResponse, AssignmentCountsResponse, DEFAULT_LOG_LIMIT,
    LeadInfo, ListAgentsResponse, ListLeadsResponse, LogEntryInfo, NextUpResponse,
    RecentLogsResponse, SetActiveRequest, SetDutyRequest, SetPositionRequest, SkipAgentRequest,
    SkipAgentResponse, UpsertAgentRequest,
};

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
