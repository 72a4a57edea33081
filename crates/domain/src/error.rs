// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while validating input or applying rotation rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Customer name is empty or invalid.
    InvalidCustomer(String),
    /// Skip reason is empty or invalid.
    InvalidReason(String),
    /// A skip was requested without a target agent id.
    MissingTargetId,
    /// Snooze duration is outside the accepted range.
    InvalidSnoozeMinutes {
        /// The rejected duration.
        minutes: u32,
        /// The largest accepted duration.
        max: u32,
    },
    /// Agent role string is not recognized.
    InvalidRole(String),
    /// Lead status string is not recognized.
    InvalidLeadStatus(String),
    /// Log entry kind string is not recognized.
    InvalidLogEntryKind(String),
    /// The eligible pool is empty.
    NoEligibleAgents,
    /// The referenced agent does not exist.
    AgentNotFound {
        /// The id that was looked up.
        agent_id: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCustomer(msg) => write!(f, "Invalid customer: {msg}"),
            Self::InvalidReason(msg) => write!(f, "Invalid reason: {msg}"),
            Self::MissingTargetId => write!(f, "A target agent id is required"),
            Self::InvalidSnoozeMinutes { minutes, max } => {
                write!(
                    f,
                    "Invalid snooze duration: {minutes} minutes. Must be between 1 and {max}"
                )
            }
            Self::InvalidRole(role) => write!(f, "Invalid agent role: '{role}'"),
            Self::InvalidLeadStatus(status) => write!(f, "Invalid lead status: '{status}'"),
            Self::InvalidLogEntryKind(kind) => write!(f, "Invalid log entry kind: '{kind}'"),
            Self::NoEligibleAgents => write!(f, "No eligible agents right now"),
            Self::AgentNotFound { agent_id } => write!(f, "Agent '{agent_id}' not found"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
