// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use lead_rotation::CoreError;
use lead_rotation_domain::DomainError;
use lead_rotation_persistence::PersistenceError;
use thiserror::Error;

/// API-level errors.
///
/// These are distinct from domain, core and persistence errors and
/// represent the API contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided. Nothing was read or written.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },

    /// An assignment found nobody to hand the lead to.
    #[error("No eligible agents right now")]
    NoEligibleAgents,

    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },

    /// Concurrent writers kept invalidating the operation.
    #[error("Rotation is busy after {attempts} attempts; please retry")]
    TransientConflict {
        /// How many attempts were made.
        attempts: u32,
    },

    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidCustomer(msg) => ApiError::InvalidInput {
            field: String::from("customer"),
            message: msg,
        },
        DomainError::InvalidReason(msg) => ApiError::InvalidInput {
            field: String::from("reason"),
            message: msg,
        },
        DomainError::MissingTargetId => ApiError::InvalidInput {
            field: String::from("target_agent_id"),
            message: String::from("Target agent id is required"),
        },
        DomainError::InvalidSnoozeMinutes { minutes, max } => ApiError::InvalidInput {
            field: String::from("snooze_minutes"),
            message: format!("Snooze must be between 1 and {max} minutes, got {minutes}"),
        },
        DomainError::InvalidRole(role) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Unknown role '{role}'. Must be 'staff' or 'manager'"),
        },
        DomainError::NoEligibleAgents => ApiError::NoEligibleAgents,
        DomainError::AgentNotFound { agent_id } => ApiError::NotFound {
            resource_type: String::from("Agent"),
            message: format!("Agent '{agent_id}' does not exist"),
        },
        err @ (DomainError::InvalidLeadStatus(_)
        | DomainError::InvalidLogEntryKind(_)
        | DomainError::DateArithmeticOverflow { .. }) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// `resource_type` names what a `NotFound` refers to in the calling
/// operation.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError, resource_type: &str) -> ApiError {
    match err {
        PersistenceError::Rejected(core_err) => translate_core_error(core_err),
        PersistenceError::NotFound(message) => ApiError::NotFound {
            resource_type: resource_type.to_string(),
            message,
        },
        PersistenceError::TransientConflict { attempts } => {
            ApiError::TransientConflict { attempts }
        }
        // Directory writes run once, so a lost race there surfaces directly.
        PersistenceError::Conflict(_) => ApiError::TransientConflict { attempts: 1 },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
