// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_seeded_persistence, create_test_persistence, staff};
use crate::PersistenceError;
use lead_rotation_domain::{Agent, AgentRole};

#[test]
fn test_list_agents_in_rotation_order() {
    let (mut persistence, _clock) = create_test_persistence();
    persistence.upsert_agent(&staff("c", 3)).unwrap();
    persistence.upsert_agent(&staff("b", 1)).unwrap();
    persistence.upsert_agent(&staff("a", 1)).unwrap();

    let ids: Vec<String> = persistence
        .list_agents()
        .unwrap()
        .iter()
        .map(|agent| agent.id.value().to_string())
        .collect();

    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn test_upsert_replaces_existing_agent() {
    let (mut persistence, _clock) = create_seeded_persistence();
    let mut renamed: Agent = staff("b", 20);
    renamed.name = String::from("Blake");

    persistence.upsert_agent(&renamed).unwrap();

    let agent: Agent = persistence.get_agent("b").unwrap();
    assert_eq!(agent.name, "Blake");
    assert_eq!(agent.position, 20);
    assert_eq!(persistence.list_agents().unwrap().len(), 3);
}

#[test]
fn test_get_unknown_agent_is_not_found() {
    let (mut persistence, _clock) = create_seeded_persistence();

    let result = persistence.get_agent("nobody");

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_off_duty_agent_is_not_eligible() {
    let (mut persistence, _clock) = create_seeded_persistence();

    persistence.set_agent_on_duty("b", false).unwrap();

    let eligible: Vec<Agent> = persistence.fetch_eligible_agents().unwrap();
    let ids: Vec<&str> = eligible.iter().map(|a| a.id.value()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert!(!persistence.get_agent("b").unwrap().on_duty);
}

#[test]
fn test_inactive_agent_is_not_eligible() {
    let (mut persistence, _clock) = create_seeded_persistence();

    persistence.set_agent_active("a", false).unwrap();

    let eligible: Vec<Agent> = persistence.fetch_eligible_agents().unwrap();
    assert!(eligible.iter().all(|agent| agent.id.value() != "a"));
}

#[test]
fn test_manager_is_listed_but_never_eligible() {
    let (mut persistence, _clock) = create_seeded_persistence();
    persistence
        .upsert_agent(&Agent::new("m", "Morgan", AgentRole::Manager, 0))
        .unwrap();

    assert_eq!(persistence.list_agents().unwrap().len(), 4);
    assert_eq!(persistence.fetch_eligible_agents().unwrap().len(), 3);
}

#[test]
fn test_set_position_reorders_rotation() {
    let (mut persistence, _clock) = create_seeded_persistence();

    persistence.set_agent_position("a", 10).unwrap();

    let eligible: Vec<Agent> = persistence.fetch_eligible_agents().unwrap();
    let ids: Vec<&str> = eligible.iter().map(|a| a.id.value()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
}

#[test]
fn test_flag_updates_on_unknown_agent_are_not_found() {
    let (mut persistence, _clock) = create_seeded_persistence();

    assert!(matches!(
        persistence.set_agent_on_duty("ghost", true),
        Err(PersistenceError::NotFound(_))
    ));
    assert!(matches!(
        persistence.set_agent_active("ghost", true),
        Err(PersistenceError::NotFound(_))
    ));
    assert!(matches!(
        persistence.set_agent_position("ghost", 4),
        Err(PersistenceError::NotFound(_))
    ));
    assert!(matches!(
        persistence.clear_agent_snooze("ghost"),
        Err(PersistenceError::NotFound(_))
    ));
}
