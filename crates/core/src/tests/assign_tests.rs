// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    apply_and_commit, assign, assigned_to, create_test_actor, create_test_view, staff, test_now,
};
use crate::{CoreError, Effect, NextUp, RotationView, TransitionResult, apply, next_up};
use lead_rotation_audit::LogEntryKind;
use lead_rotation_domain::{AgentId, AgentRole, DomainError, LeadStatus};
use time::Duration;

#[test]
fn test_assignment_sequence_wraps_after_last_position() {
    let mut view: RotationView =
        create_test_view(vec![staff("a", 1), staff("b", 2), staff("c", 3)]);

    let expected: [(&str, i64); 4] = [("a", 1), ("b", 2), ("c", 3), ("a", 1)];
    for (agent, pointer) in expected {
        let result: TransitionResult = apply_and_commit(&mut view, assign("Jane"), test_now());
        assert_eq!(assigned_to(&result), agent);
        assert_eq!(result.new_rotation.pointer_pos, pointer);
        assert_eq!(result.log_entry.pointer_pos_after(), pointer);
    }
}

#[test]
fn test_assignment_creates_handed_lead() {
    let view: RotationView = create_test_view(vec![staff("a", 1)]);
    let result: TransitionResult =
        apply(&view, assign("  Jane Doe  "), create_test_actor(), test_now()).unwrap();

    let Effect::LeadCreated(lead) = result.effect else {
        panic!("expected a lead");
    };
    assert_eq!(lead.customer, "Jane Doe");
    assert_eq!(lead.assigned_to, AgentId::new("a"));
    assert_eq!(lead.assigned_to_name, "Agent a");
    assert_eq!(lead.assigned_by, "manager-1");
    assert_eq!(lead.assigned_by_name, "Morgan");
    assert_eq!(lead.status, LeadStatus::Handed);
    assert!(!lead.closed);
    assert_eq!(lead.follow_up_due, test_now() + Duration::hours(24));
}

#[test]
fn test_assignment_updates_rotation_state() {
    let view: RotationView = create_test_view(vec![staff("a", 4)]);
    let result: TransitionResult =
        apply(&view, assign("Jane"), create_test_actor(), test_now()).unwrap();

    assert_eq!(result.new_rotation.pointer_pos, 4);
    assert_eq!(result.new_rotation.pointer_agent, Some(AgentId::new("a")));
    assert_eq!(result.new_rotation.last_assigned_to, Some(AgentId::new("a")));
    assert_eq!(result.new_rotation.last_assigned_at, Some(test_now()));
    assert_eq!(result.new_rotation.updated_by.as_deref(), Some("manager-1"));
}

#[test]
fn test_assignment_emits_assign_log_entry() {
    let view: RotationView = create_test_view(vec![staff("a", 1)]);
    let result: TransitionResult =
        apply(&view, assign("Jane"), create_test_actor(), test_now()).unwrap();

    assert_eq!(result.log_entry.kind(), LogEntryKind::Assign);
    assert_eq!(result.log_entry.customer(), Some("Jane"));
    assert_eq!(result.log_entry.reason(), None);
    assert_eq!(result.log_entry.target_name(), "Agent a");
    assert_eq!(result.log_entry.manager().id, "manager-1");
    assert_eq!(result.log_entry.created_at(), test_now());
}

#[test]
fn test_assignment_with_empty_pool_fails() {
    let mut manager = staff("m", 1);
    manager.role = AgentRole::Manager;
    let view: RotationView = create_test_view(vec![manager]);

    let result: Result<TransitionResult, CoreError> =
        apply(&view, assign("Jane"), create_test_actor(), test_now());
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::NoEligibleAgents))
    );
}

#[test]
fn test_assignment_with_blank_customer_fails_before_reading_pool() {
    // Empty pool: validation must win over NoEligibleAgents.
    let view: RotationView = create_test_view(Vec::new());
    let result: Result<TransitionResult, CoreError> =
        apply(&view, assign("   "), create_test_actor(), test_now());
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidCustomer(_)))
    ));
}

#[test]
fn test_assignment_ignores_snoozed_agent() {
    let mut b = staff("b", 2);
    b.snooze_until = Some(test_now() + Duration::minutes(5));
    let mut view: RotationView = create_test_view(vec![staff("a", 1), b, staff("c", 3)]);
    view.rotation.pointer_pos = 1;

    let result: TransitionResult =
        apply(&view, assign("Jane"), create_test_actor(), test_now()).unwrap();
    assert_eq!(assigned_to(&result), "c");
}

#[test]
fn test_assignment_tolerates_pool_changes_between_calls() {
    let mut view: RotationView =
        create_test_view(vec![staff("a", 10), staff("b", 20), staff("c", 30)]);
    let first: TransitionResult = apply_and_commit(&mut view, assign("One"), test_now());
    assert_eq!(assigned_to(&first), "a");

    // b goes off duty and d joins between a and c.
    view.agents[1].on_duty = false;
    view.agents.push(staff("d", 15));

    let second: TransitionResult = apply_and_commit(&mut view, assign("Two"), test_now());
    assert_eq!(assigned_to(&second), "d");
    let third: TransitionResult = apply_and_commit(&mut view, assign("Three"), test_now());
    assert_eq!(assigned_to(&third), "c");
}

#[test]
fn test_legacy_pointer_without_agent_uses_position_only() {
    let mut view: RotationView = create_test_view(vec![staff("a", 1), staff("b", 2)]);
    view.rotation.pointer_pos = 1;
    view.rotation.pointer_agent = None;

    let result: TransitionResult =
        apply(&view, assign("Jane"), create_test_actor(), test_now()).unwrap();
    assert_eq!(assigned_to(&result), "b");
}

#[test]
fn test_next_up_previews_without_changing_view() {
    let view: RotationView = create_test_view(vec![staff("b", 2), staff("a", 1)]);
    let before: RotationView = view.clone();

    let preview: NextUp = next_up(&view, test_now());
    assert_eq!(preview.next.map(|agent| agent.id), Some(AgentId::new("a")));
    assert_eq!(preview.eligible.len(), 2);
    assert_eq!(preview.eligible[0].id, AgentId::new("a"));
    assert_eq!(preview.pointer_pos, 0);
    assert_eq!(view, before);
}

#[test]
fn test_next_up_matches_next_assignment() {
    let mut view: RotationView =
        create_test_view(vec![staff("a", 1), staff("b", 2), staff("c", 3)]);
    for _ in 0..5 {
        let preview: NextUp = next_up(&view, test_now());
        let result: TransitionResult = apply_and_commit(&mut view, assign("Jane"), test_now());
        assert_eq!(
            preview.next.map(|agent| agent.id.value().to_string()),
            Some(assigned_to(&result).to_string())
        );
    }
}

#[test]
fn test_next_up_with_empty_pool() {
    let view: RotationView = create_test_view(Vec::new());
    let preview: NextUp = next_up(&view, test_now());
    assert!(preview.next.is_none());
    assert!(preview.eligible.is_empty());
}
