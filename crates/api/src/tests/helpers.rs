// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AssignLeadRequest, SkipAgentRequest, UpsertAgentRequest, upsert_agent};
use lead_rotation::{FixedClock, RetryPolicy};
use lead_rotation_persistence::Persistence;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use time::OffsetDateTime;
use time::macros::datetime;

static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-14 15:00:00 UTC)
}

pub fn create_test_persistence() -> (Persistence, Arc<FixedClock>) {
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(test_now()));
    let persistence: Persistence = Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_clock(clock.clone());
    (persistence, clock)
}

pub fn create_agent_request(agent_id: &str, position: i64) -> UpsertAgentRequest {
    UpsertAgentRequest {
        agent_id: agent_id.to_string(),
        name: format!("Agent {agent_id}"),
        role: None,
        active: None,
        on_duty: None,
        position,
    }
}

/// Persistence seeded with staff `a`, `b`, `c` at positions 1, 2, 3.
pub fn create_seeded_persistence() -> (Persistence, Arc<FixedClock>) {
    let (mut persistence, clock) = create_test_persistence();
    for (id, position) in [("a", 1), ("b", 2), ("c", 3)] {
        upsert_agent(&mut persistence, &create_agent_request(id, position)).unwrap();
    }
    (persistence, clock)
}

pub fn create_assign_request(customer: &str) -> AssignLeadRequest {
    AssignLeadRequest {
        customer: customer.to_string(),
        manager_id: String::from("manager-1"),
        manager_name: String::from("Morgan"),
    }
}

pub fn create_skip_request(target: &str, reason: &str) -> SkipAgentRequest {
    SkipAgentRequest {
        target_agent_id: target.to_string(),
        reason: reason.to_string(),
        manager_id: String::from("manager-1"),
        manager_name: String::from("Morgan"),
        snooze_minutes: None,
    }
}

/// A unique database file path under the system temp directory.
pub fn temp_db_path(label: &str) -> PathBuf {
    let n: u64 = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let path: PathBuf = std::env::temp_dir().join(format!(
        "lead_rotation_api_{label}_{}_{n}.db",
        std::process::id()
    ));
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

/// A file-backed store sharing `clock`, with a generous retry budget.
pub fn open_file_persistence(path: &Path, clock: &Arc<FixedClock>) -> Persistence {
    Persistence::new_with_file(path)
        .expect("Failed to open file persistence")
        .with_retry_policy(RetryPolicy::new(200, Duration::from_millis(2)))
        .with_clock(clock.clone())
}
