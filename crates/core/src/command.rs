// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use lead_rotation_domain::{
    AgentId, validate_customer, validate_skip_reason, validate_snooze_minutes, validate_target_id,
};

/// A command represents manager intent as data only.
///
/// Commands are the only way to move the rotation pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Hand a new lead to whoever is next in the rotation.
    AssignNextLead {
        /// The customer name.
        customer: String,
    },
    /// Snooze an agent and move the pointer past them.
    SkipAgent {
        /// The agent being skipped.
        target: AgentId,
        /// Why the agent is being skipped.
        reason: String,
        /// How long the agent is excluded from the rotation.
        snooze_minutes: u32,
    },
}

impl Command {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AssignNextLead { .. } => "AssignNextLead",
            Self::SkipAgent { .. } => "SkipAgent",
        }
    }
}

/// Validates a command's inputs and returns its normalized form.
///
/// This never reads state, so it is run before a transaction is opened.
///
/// # Errors
///
/// Returns an error if:
/// - the customer name is blank
/// - the skip target id is blank
/// - the skip reason is blank
/// - the snooze duration is out of range
pub fn validate_command(command: Command) -> Result<Command, CoreError> {
    match command {
        Command::AssignNextLead { customer } => Ok(Command::AssignNextLead {
            customer: validate_customer(&customer)?,
        }),
        Command::SkipAgent {
            target,
            reason,
            snooze_minutes,
        } => Ok(Command::SkipAgent {
            target: validate_target_id(target.value())?,
            reason: validate_skip_reason(&reason)?,
            snooze_minutes: validate_snooze_minutes(snooze_minutes)?,
        }),
    }
}
