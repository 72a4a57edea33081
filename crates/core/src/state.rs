// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use lead_rotation_audit::LogEntry;
use lead_rotation_domain::{Agent, AgentId, Lead, RotationState};
use time::OffsetDateTime;

/// Everything a transition reads, captured at one instant.
///
/// Inside a write transaction this must be read fresh on every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationView {
    /// The current rotation pointer.
    pub rotation: RotationState,
    /// Every agent in the directory, eligible or not.
    pub agents: Vec<Agent>,
}

impl RotationView {
    #[must_use]
    pub const fn new(rotation: RotationState, agents: Vec<Agent>) -> Self {
        Self { rotation, agents }
    }

    /// Looks up an agent by id.
    #[must_use]
    pub fn agent(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| &agent.id == id)
    }
}

/// The side effect a transition has besides moving the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A lead was created for the selected agent.
    LeadCreated(Lead),
    /// The skipped agent's snooze deadline was set.
    AgentSnoozed {
        /// The snoozed agent.
        agent_id: AgentId,
        /// When the snooze ends.
        snooze_until: OffsetDateTime,
    },
}

/// The result of a successful transition.
///
/// All three parts must be committed together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The rotation pointer after the transition.
    pub new_rotation: RotationState,
    /// The lead or snooze to write.
    pub effect: Effect,
    /// The log entry to append.
    pub log_entry: LogEntry,
}

/// A read-only preview of the next assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextUp {
    /// Who the next assignment would pick, if anyone is eligible.
    pub next: Option<Agent>,
    /// The eligible pool the preview was computed from.
    pub eligible: Vec<Agent>,
    /// The current pointer position.
    pub pointer_pos: i64,
}
