// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod concurrency_tests;
mod directory_tests;

use crate::Persistence;
use lead_rotation::FixedClock;
use lead_rotation_audit::Actor;
use lead_rotation_domain::{Agent, AgentRole};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use time::macros::datetime;

static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-14 15:00:00 UTC)
}

pub fn create_test_actor() -> Actor {
    Actor::new("manager-1", "Morgan")
}

pub fn staff(id: &str, position: i64) -> Agent {
    Agent::new(id, &format!("Agent {id}"), AgentRole::Staff, position)
}

/// An in-memory store whose clock sits at [`test_now`] until moved.
pub fn create_test_persistence() -> (Persistence, Arc<FixedClock>) {
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(test_now()));
    let persistence: Persistence = Persistence::new_in_memory()
        .unwrap()
        .with_clock(clock.clone());
    (persistence, clock)
}

/// A store seeded with staff `a`, `b`, `c` at positions 1, 2, 3.
pub fn create_seeded_persistence() -> (Persistence, Arc<FixedClock>) {
    let (mut persistence, clock) = create_test_persistence();
    for (id, position) in [("a", 1), ("b", 2), ("c", 3)] {
        persistence.upsert_agent(&staff(id, position)).unwrap();
    }
    (persistence, clock)
}

pub fn assign_to(persistence: &mut Persistence, customer: &str) -> String {
    persistence
        .assign_next_lead(customer, &create_test_actor())
        .unwrap()
        .lead
        .unwrap()
        .assigned_to
        .value()
        .to_string()
}

/// A unique database file path under the system temp directory.
pub fn temp_db_path(label: &str) -> PathBuf {
    let n: u64 = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let path: PathBuf =
        std::env::temp_dir().join(format!("lead_rotation_{label}_{}_{n}.db", std::process::id()));
    remove_db_files(&path);
    path
}

pub fn remove_db_files(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}
