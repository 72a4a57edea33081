// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{staff, test_now};
use crate::{
    Agent, AgentId, DomainError, RotationCursor, select_next, skip_successor, snooze_deadline,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

fn pool() -> Vec<Agent> {
    vec![staff("a", 1), staff("b", 2), staff("c", 3)]
}

fn picked<'a>(candidates: &'a [Agent], cursor: &RotationCursor) -> &'a str {
    select_next(candidates, cursor).unwrap().id.value()
}

#[test]
fn test_select_next_from_start_picks_lowest_position() {
    assert_eq!(picked(&pool(), &RotationCursor::start()), "a");
}

#[test]
fn test_select_next_advances_past_pointer() {
    let cursor: RotationCursor = RotationCursor {
        position: 1,
        agent: None,
    };
    assert_eq!(picked(&pool(), &cursor), "b");
}

#[test]
fn test_select_next_wraps_at_end_of_lap() {
    let cursor: RotationCursor = RotationCursor {
        position: 3,
        agent: None,
    };
    assert_eq!(picked(&pool(), &cursor), "a");

    // A pointer beyond every position also wraps.
    let cursor: RotationCursor = RotationCursor {
        position: 99,
        agent: None,
    };
    assert_eq!(picked(&pool(), &cursor), "a");
}

#[test]
fn test_select_next_tolerates_sparse_positions() {
    let candidates: Vec<Agent> = vec![staff("a", 10), staff("b", 40), staff("c", 70)];
    let cursor: RotationCursor = RotationCursor {
        position: 25,
        agent: None,
    };
    assert_eq!(picked(&candidates, &cursor), "b");
}

#[test]
fn test_select_next_on_empty_pool() {
    assert!(select_next(&[], &RotationCursor::start()).is_none());
}

#[test]
fn test_select_next_serves_shared_positions_once_per_lap() {
    let candidates: Vec<Agent> = vec![staff("a", 1), staff("b", 1), staff("c", 2)];
    let mut cursor: RotationCursor = RotationCursor::start();
    let mut served: Vec<String> = Vec::new();
    for _ in 0..6 {
        let agent: &Agent = select_next(&candidates, &cursor).unwrap();
        served.push(agent.id.value().to_string());
        cursor = RotationCursor::at(agent);
    }
    assert_eq!(served, vec!["a", "b", "c", "a", "b", "c"]);
}

#[test]
fn test_cursor_without_agent_compares_position_only() {
    let cursor: RotationCursor = RotationCursor {
        position: 1,
        agent: None,
    };
    assert!(!cursor.precedes(&staff("a", 1)));
    assert!(cursor.precedes(&staff("b", 2)));

    let cursor: RotationCursor = RotationCursor {
        position: 1,
        agent: Some(AgentId::new("a")),
    };
    assert!(cursor.precedes(&staff("b", 1)));
    assert!(!cursor.precedes(&staff("a", 1)));
}

#[test]
fn test_skip_successor_is_next_after_target() {
    let candidates: Vec<Agent> = vec![staff("b", 2), staff("c", 3)];
    let target: Agent = staff("a", 1);
    assert_eq!(
        skip_successor(&candidates, &target).unwrap().id.value(),
        "b"
    );
}

#[test]
fn test_skip_successor_wraps_to_first() {
    let candidates: Vec<Agent> = vec![staff("a", 1), staff("b", 2)];
    let target: Agent = staff("c", 3);
    assert_eq!(
        skip_successor(&candidates, &target).unwrap().id.value(),
        "a"
    );
}

#[test]
fn test_skip_successor_never_returns_target() {
    let candidates: Vec<Agent> = pool();
    let target: Agent = staff("c", 3);
    assert_eq!(
        skip_successor(&candidates, &target).unwrap().id.value(),
        "a"
    );

    let alone: Vec<Agent> = vec![staff("a", 1)];
    assert!(skip_successor(&alone, &staff("a", 1)).is_none());
}

#[test]
fn test_skip_successor_on_empty_pool() {
    assert!(skip_successor(&[], &staff("a", 1)).is_none());
}

#[test]
fn test_snooze_deadline_adds_minutes() {
    let now: OffsetDateTime = test_now();
    assert_eq!(
        snooze_deadline(now, 30).unwrap(),
        now + Duration::minutes(30)
    );
}

#[test]
fn test_snooze_deadline_overflow() {
    assert!(matches!(
        snooze_deadline(datetime!(9999-12-31 23:59:00 UTC), 5),
        Err(DomainError::DateArithmeticOverflow { .. })
    ));
}
