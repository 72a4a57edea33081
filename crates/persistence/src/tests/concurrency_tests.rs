// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Several adapters sharing one database file, driven from separate threads.

use super::{create_test_actor, remove_db_files, staff, temp_db_path, test_now};
use crate::{CommittedTransition, Persistence};
use lead_rotation::{FixedClock, RetryPolicy};
use lead_rotation_audit::{LogEntry, LogEntryKind};
use lead_rotation_domain::{Agent, Lead, RotationCursor, RotationState, select_next, skip_successor};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

fn open(path: &Path, clock: &Arc<FixedClock>) -> Persistence {
    Persistence::new_with_file(path)
        .unwrap()
        .with_retry_policy(RetryPolicy::new(200, Duration::from_millis(2)))
        .with_clock(clock.clone())
}

fn seed(path: &Path, clock: &Arc<FixedClock>, ids: &[&str]) {
    let mut persistence: Persistence = open(path, clock);
    for (index, id) in ids.iter().enumerate() {
        let position: i64 = i64::try_from(index).unwrap() + 1;
        persistence.upsert_agent(&staff(id, position)).unwrap();
    }
}

fn run_concurrently(
    path: &Path,
    clock: &Arc<FixedClock>,
    workers: usize,
    per_worker: usize,
) -> Vec<CommittedTransition> {
    let stores: Vec<Persistence> = (0..workers).map(|_| open(path, clock)).collect();
    let barrier: Arc<Barrier> = Arc::new(Barrier::new(workers));

    let handles: Vec<_> = stores
        .into_iter()
        .enumerate()
        .map(|(worker, mut store)| {
            let barrier: Arc<Barrier> = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..per_worker)
                    .map(|i| {
                        store
                            .assign_next_lead(
                                &format!("Customer {worker}-{i}"),
                                &create_test_actor(),
                            )
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect()
}

#[test]
fn test_simultaneous_assignments_pick_different_agents() {
    let path: PathBuf = temp_db_path("pair");
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(test_now()));
    seed(&path, &clock, &["a", "b", "c"]);

    let committed: Vec<CommittedTransition> = run_concurrently(&path, &clock, 2, 1);

    let mut picks: Vec<String> = committed
        .iter()
        .map(|c| c.lead.as_ref().unwrap().assigned_to.value().to_string())
        .collect();
    picks.sort();
    assert_eq!(picks, vec!["a", "b"]);

    let mut persistence: Persistence = open(&path, &clock);
    let state: RotationState = persistence.get_rotation_state().unwrap();
    assert_eq!(state.pointer_pos, 2);
    assert_eq!(persistence.fetch_recent_logs(10).unwrap().len(), 2);
    let leads: usize = ["a", "b", "c"]
        .iter()
        .map(|id| persistence.list_leads_for_agent(id).unwrap().len())
        .sum();
    assert_eq!(leads, 2);

    drop(persistence);
    remove_db_files(&path);
}

#[test]
fn test_concurrent_assignments_stay_fair() {
    let path: PathBuf = temp_db_path("stress");
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(test_now()));
    seed(&path, &clock, &["a", "b", "c"]);

    let committed: Vec<CommittedTransition> = run_concurrently(&path, &clock, 4, 5);
    assert_eq!(committed.len(), 20);

    let mut persistence: Persistence = open(&path, &clock);
    let mut per_agent: HashMap<String, usize> = HashMap::new();
    for id in ["a", "b", "c"] {
        let leads: Vec<Lead> = persistence.list_leads_for_agent(id).unwrap();
        per_agent.insert(id.to_string(), leads.len());
    }
    assert_eq!(per_agent["a"], 7);
    assert_eq!(per_agent["b"], 7);
    assert_eq!(per_agent["c"], 6);

    // Each committed pointer follows the previous one in log order.
    let mut logs = persistence.fetch_recent_logs(100).unwrap();
    logs.reverse();
    let positions: Vec<i64> = logs.iter().map(|l| l.pointer_pos_after()).collect();
    let expected: Vec<i64> = (0..20).map(|i| i % 3 + 1).collect();
    assert_eq!(positions, expected);

    drop(persistence);
    remove_db_files(&path);
}

/// Replays the log in commit order against the selection rules.
///
/// The clock never moves in these tests, so a skipped agent stays snoozed
/// for the rest of the run.
fn replay_log(pool: &[Agent], log: &[LogEntry]) {
    let mut cursor: RotationCursor = RotationCursor::start();
    let mut snoozed: HashSet<String> = HashSet::new();

    for entry in log {
        let target: &Agent = pool
            .iter()
            .find(|agent| agent.id == *entry.target_id())
            .unwrap();
        match entry.kind() {
            LogEntryKind::Assign => {
                assert!(
                    !snoozed.contains(target.id.value()),
                    "lead went to snoozed agent {}",
                    target.id
                );
                let eligible: Vec<Agent> = pool
                    .iter()
                    .filter(|agent| !snoozed.contains(agent.id.value()))
                    .cloned()
                    .collect();
                let expected: &Agent = select_next(&eligible, &cursor).unwrap();
                assert_eq!(expected.id, target.id);
                assert_eq!(entry.pointer_pos_after(), target.position);
                cursor = RotationCursor::at(target);
            }
            LogEntryKind::Skip => {
                snoozed.insert(target.id.value().to_string());
                let eligible: Vec<Agent> = pool
                    .iter()
                    .filter(|agent| !snoozed.contains(agent.id.value()))
                    .cloned()
                    .collect();
                match skip_successor(&eligible, target) {
                    Some(successor) => {
                        assert_eq!(entry.pointer_pos_after(), successor.position);
                        cursor = RotationCursor::at(successor);
                    }
                    None => {
                        assert_eq!(entry.pointer_pos_after(), 0);
                        cursor = RotationCursor::start();
                    }
                }
            }
        }
    }
}

#[test]
fn test_skips_interleaved_with_assignments_follow_rotation() {
    let path: PathBuf = temp_db_path("skip_mix");
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(test_now()));
    let ids: [&str; 4] = ["a", "b", "c", "d"];
    seed(&path, &clock, &ids);

    let barrier: Arc<Barrier> = Arc::new(Barrier::new(3));
    let assigners: Vec<_> = (0..2)
        .map(|worker| {
            let mut store: Persistence = open(&path, &clock);
            let barrier: Arc<Barrier> = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..6 {
                    store
                        .assign_next_lead(&format!("Customer {worker}-{i}"), &create_test_actor())
                        .unwrap();
                }
            })
        })
        .collect();

    let mut skipper: Persistence = open(&path, &clock);
    let skip_barrier: Arc<Barrier> = Arc::clone(&barrier);
    let skips = thread::spawn(move || {
        skip_barrier.wait();
        ["b", "c"]
            .iter()
            .map(|target| {
                thread::sleep(Duration::from_millis(1));
                skipper
                    .skip_agent(target, "Stepped away", 30, &create_test_actor())
                    .unwrap()
            })
            .collect::<Vec<CommittedTransition>>()
    });

    for handle in assigners {
        handle.join().unwrap();
    }
    let committed_skips: Vec<CommittedTransition> = skips.join().unwrap();
    assert_eq!(committed_skips.len(), 2);

    let mut persistence: Persistence = open(&path, &clock);
    let mut log: Vec<LogEntry> = persistence.fetch_recent_logs(100).unwrap();
    log.reverse();
    assert_eq!(log.len(), 14);

    for skip in &committed_skips {
        let matching: usize = log
            .iter()
            .filter(|entry| entry.log_id() == skip.log_entry.log_id())
            .count();
        assert_eq!(matching, 1);
        assert_eq!(skip.log_entry.kind(), LogEntryKind::Skip);
    }
    let skip_entries: usize = log
        .iter()
        .filter(|entry| entry.kind() == LogEntryKind::Skip)
        .count();
    assert_eq!(skip_entries, 2);

    let pool: Vec<Agent> = persistence.list_agents().unwrap();
    replay_log(&pool, &log);

    let leads: usize = ids
        .iter()
        .map(|id| persistence.list_leads_for_agent(id).unwrap().len())
        .sum();
    assert_eq!(leads, 12);

    drop(persistence);
    remove_db_files(&path);
}

#[test]
fn test_skip_commits_first_try_with_own_deadline_under_directory_writes() {
    let path: PathBuf = temp_db_path("skip_clear");
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(test_now()));
    seed(&path, &clock, &["a", "b"]);

    let mut clearer: Persistence = open(&path, &clock);
    // One attempt only: a competing directory write must delay the skip,
    // not fail it.
    let mut skipper: Persistence =
        open(&path, &clock).with_retry_policy(RetryPolicy::new(1, Duration::from_millis(2)));
    let barrier: Arc<Barrier> = Arc::new(Barrier::new(2));

    let clear_barrier: Arc<Barrier> = Arc::clone(&barrier);
    let clears = thread::spawn(move || {
        clear_barrier.wait();
        for _ in 0..40 {
            clearer.clear_agent_snooze("a").unwrap();
        }
    });

    barrier.wait();
    let deadline = test_now() + time::Duration::minutes(30);
    let mut committed_ids: Vec<i64> = Vec::new();
    for _ in 0..40 {
        let committed: CommittedTransition = skipper
            .skip_agent("a", "Stepped away", 30, &create_test_actor())
            .unwrap();
        assert_eq!(committed.snooze_until, Some(deadline));
        committed_ids.push(committed.log_entry.log_id().unwrap());
    }
    clears.join().unwrap();

    let mut persistence: Persistence = open(&path, &clock);
    let log: Vec<LogEntry> = persistence.fetch_recent_logs(100).unwrap();
    assert_eq!(log.len(), 40);
    committed_ids.sort_unstable();
    committed_ids.dedup();
    assert_eq!(committed_ids.len(), 40);

    drop(persistence);
    remove_db_files(&path);
}
