// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::rotation::MAX_SNOOZE_MINUTES;
use crate::types::AgentId;

/// Validates a customer name for a new lead.
///
/// # Returns
///
/// The trimmed customer name.
///
/// # Errors
///
/// Returns `InvalidCustomer` if the name is empty after trimming.
pub fn validate_customer(customer: &str) -> Result<String, DomainError> {
    let trimmed: &str = customer.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidCustomer(String::from(
            "Customer is required",
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates the reason given for skipping an agent.
///
/// # Returns
///
/// The trimmed reason.
///
/// # Errors
///
/// Returns `InvalidReason` if the reason is empty after trimming.
pub fn validate_skip_reason(reason: &str) -> Result<String, DomainError> {
    let trimmed: &str = reason.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidReason(String::from("Reason required")));
    }
    Ok(trimmed.to_string())
}

/// Validates the id of the agent a skip targets.
///
/// # Errors
///
/// Returns `MissingTargetId` if the id is empty after trimming.
pub fn validate_target_id(target: &str) -> Result<AgentId, DomainError> {
    let trimmed: &str = target.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingTargetId);
    }
    Ok(AgentId::new(trimmed))
}

/// Validates a snooze duration.
///
/// # Errors
///
/// Returns `InvalidSnoozeMinutes` unless `1 <= minutes <= MAX_SNOOZE_MINUTES`.
pub const fn validate_snooze_minutes(minutes: u32) -> Result<u32, DomainError> {
    if minutes == 0 || minutes > MAX_SNOOZE_MINUTES {
        return Err(DomainError::InvalidSnoozeMinutes {
            minutes,
            max: MAX_SNOOZE_MINUTES,
        });
    }
    Ok(minutes)
}
