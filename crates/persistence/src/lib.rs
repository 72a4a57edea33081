// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the lead rotation engine.
//!
//! Stores agents, the rotation pointer, leads and the rotation log in
//! `SQLite` through Diesel, and runs assignments and skips as optimistic
//! transactions.
//!
//! ## Concurrency
//!
//! Each write operation is one read-compute-write attempt inside a
//! `BEGIN IMMEDIATE` transaction, so competing writers queue on the busy
//! timeout instead of invalidating each other's snapshot:
//!
//! 1. Read the rotation row and every agent, with their `version` columns
//! 2. Compute the transition with the pure engine (`lead_rotation::apply`)
//! 3. Write the pointer, the lead or snooze, and the log entry, with each
//!    guarded write conditioned on the version read in step 1
//!
//! A guard that matches no row, a lost insert race on the singleton, or a
//! `SQLite` busy/locked failure aborts the attempt with `Conflict`. The
//! adapter then restarts at step 1 under its `RetryPolicy`. Exhausting the
//! policy surfaces `TransientConflict`.
//!
//! Reads outside those operations are not transactional and may trail an
//! in-flight commit.
//!
//! ## Testing
//!
//! - In-memory databases get a unique name per instance for isolation
//! - File databases run in WAL mode with a busy timeout, so several
//!   `Persistence` instances can share one file

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use lead_rotation::{
    Clock, Command, NextUp, RetryError, RetryPolicy, Retryable, RotationView, SystemClock,
    next_up, retry_transient, validate_command,
};
use lead_rotation_audit::{Actor, LogEntry};
use lead_rotation_domain::{Agent, AgentId, Lead, RotationState, eligible_agents};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use tracing::{info, warn};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod timestamps;

#[cfg(test)]
mod tests;

pub use data_models::{AssignmentCounts, CommittedTransition};
pub use error::PersistenceError;
pub use queries::audit::MAX_RECENT_LOGS;

use backend::PersistenceBackend;

/// Persistence adapter for the rotation engine.
///
/// Holds one connection, the retry policy for write operations, and the
/// clock transitions read "now" from.
pub struct Persistence {
    conn: SqliteConnection,
    retry_policy: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_rotation_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self::from_connection(conn))
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Several adapters may open the same file concurrently.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: SqliteConnection) -> Self {
        Self {
            conn,
            retry_policy: RetryPolicy::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the retry policy used by write operations.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Replaces the clock transitions and eligibility reads use.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    fn now(&self) -> Result<OffsetDateTime, PersistenceError> {
        timestamps::truncate_to_micros(self.clock.now())
    }

    // ========================================================================
    // Rotation Transitions
    // ========================================================================

    /// Executes a command as an optimistic transaction, retrying on conflict.
    ///
    /// Input validation happens before the first read. Each attempt reads
    /// the clock once.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` if the command is invalid or refused by the
    /// engine, `TransientConflict` if every attempt conflicted, or a
    /// database error.
    pub fn execute(
        &mut self,
        command: Command,
        actor: &Actor,
    ) -> Result<CommittedTransition, PersistenceError> {
        let command: Command = validate_command(command)?;
        let policy: RetryPolicy = self.retry_policy;
        let clock: Arc<dyn Clock> = Arc::clone(&self.clock);
        let conn: &mut SqliteConnection = &mut self.conn;

        let outcome = retry_transient(&policy, |attempt| {
            let now: OffsetDateTime = timestamps::truncate_to_micros(clock.now())?;
            mutations::execute_command(conn, &command, actor, now).inspect_err(|err| {
                if err.is_transient() {
                    warn!(
                        attempt,
                        max_attempts = policy.max_attempts,
                        command = command.name(),
                        error = %err,
                        "Rotation transaction conflicted"
                    );
                }
            })
        });

        match outcome {
            Ok(committed) => Ok(committed),
            Err(RetryError::Permanent(err)) => Err(err),
            Err(RetryError::Exhausted { attempts, .. }) => {
                warn!(attempts, command = command.name(), "Retry budget exhausted");
                Err(PersistenceError::TransientConflict { attempts })
            }
        }
    }

    /// Hands a lead for `customer` to the next agent in the rotation.
    ///
    /// # Errors
    ///
    /// See [`Persistence::execute`].
    pub fn assign_next_lead(
        &mut self,
        customer: &str,
        actor: &Actor,
    ) -> Result<CommittedTransition, PersistenceError> {
        self.execute(
            Command::AssignNextLead {
                customer: customer.to_string(),
            },
            actor,
        )
    }

    /// Snoozes `target` for `snooze_minutes` and moves the pointer past them.
    ///
    /// # Errors
    ///
    /// See [`Persistence::execute`].
    pub fn skip_agent(
        &mut self,
        target: &str,
        reason: &str,
        snooze_minutes: u32,
        actor: &Actor,
    ) -> Result<CommittedTransition, PersistenceError> {
        self.execute(
            Command::SkipAgent {
                target: AgentId::new(target),
                reason: reason.to_string(),
                snooze_minutes,
            },
            actor,
        )
    }

    // ========================================================================
    // Rotation Reads
    // ========================================================================

    /// Reads the rotation pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_rotation_state(&mut self) -> Result<RotationState, PersistenceError> {
        queries::rotation::get_rotation_state(&mut self.conn)
    }

    /// Returns the agents eligible right now, in rotation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch_eligible_agents(&mut self) -> Result<Vec<Agent>, PersistenceError> {
        let now: OffsetDateTime = self.now()?;
        let agents: Vec<Agent> = queries::agents::list_agents(&mut self.conn)?;
        Ok(eligible_agents(&agents, now))
    }

    /// Previews who the next assignment would pick right now.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn fetch_next_up(&mut self) -> Result<NextUp, PersistenceError> {
        let now: OffsetDateTime = self.now()?;
        let rotation: RotationState = queries::rotation::get_rotation_state(&mut self.conn)?;
        let agents: Vec<Agent> = queries::agents::list_agents(&mut self.conn)?;
        Ok(next_up(&RotationView::new(rotation, agents), now))
    }

    /// Returns up to `limit` log entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch_recent_logs(&mut self, limit: usize) -> Result<Vec<LogEntry>, PersistenceError> {
        queries::audit::get_recent_logs(&mut self.conn, limit)
    }

    /// Retrieves a log entry by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist.
    pub fn get_log_entry(&mut self, log_id: i64) -> Result<LogEntry, PersistenceError> {
        queries::audit::get_log_entry(&mut self.conn, log_id)
    }

    // ========================================================================
    // Leads
    // ========================================================================

    /// Retrieves a lead by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the lead does not exist.
    pub fn get_lead(&mut self, lead_id: i64) -> Result<Lead, PersistenceError> {
        queries::leads::get_lead(&mut self.conn, lead_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Lead {lead_id}")))
    }

    /// Lists the leads handed to an agent, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the agent does not exist.
    pub fn list_leads_for_agent(&mut self, agent_id: &str) -> Result<Vec<Lead>, PersistenceError> {
        self.get_agent(agent_id)?;
        queries::leads::list_leads_for_agent(&mut self.conn, agent_id)
    }

    /// Counts an agent's leads for the current UTC day and month.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the agent does not exist.
    pub fn agent_assignment_counts(
        &mut self,
        agent_id: &str,
    ) -> Result<AssignmentCounts, PersistenceError> {
        self.get_agent(agent_id)?;
        let now: OffsetDateTime = self.now()?;
        queries::leads::count_assignments(&mut self.conn, agent_id, now)
    }

    // ========================================================================
    // Agent Directory
    // ========================================================================

    /// Lists every agent, eligible or not, in rotation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_agents(&mut self) -> Result<Vec<Agent>, PersistenceError> {
        queries::agents::list_agents(&mut self.conn)
    }

    /// Retrieves an agent by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the agent does not exist.
    pub fn get_agent(&mut self, agent_id: &str) -> Result<Agent, PersistenceError> {
        queries::agents::get_agent(&mut self.conn, agent_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Agent '{agent_id}'")))
    }

    /// Creates an agent or replaces an existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_agent(&mut self, agent: &Agent) -> Result<(), PersistenceError> {
        let now: OffsetDateTime = self.now()?;
        mutations::agents::upsert_agent(&mut self.conn, agent, now)
    }

    /// Sets whether an agent is on duty.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the agent does not exist.
    pub fn set_agent_on_duty(
        &mut self,
        agent_id: &str,
        on_duty: bool,
    ) -> Result<(), PersistenceError> {
        let now: OffsetDateTime = self.now()?;
        mutations::agents::set_on_duty(&mut self.conn, agent_id, on_duty, now)
    }

    /// Sets whether an agent's account is active.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the agent does not exist.
    pub fn set_agent_active(&mut self, agent_id: &str, active: bool) -> Result<(), PersistenceError> {
        let now: OffsetDateTime = self.now()?;
        mutations::agents::set_active(&mut self.conn, agent_id, active, now)
    }

    /// Moves an agent to a new rotation position.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the agent does not exist.
    pub fn set_agent_position(
        &mut self,
        agent_id: &str,
        position: i64,
    ) -> Result<(), PersistenceError> {
        let now: OffsetDateTime = self.now()?;
        mutations::agents::set_position(&mut self.conn, agent_id, position, now)
    }

    /// Ends an agent's snooze early.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the agent does not exist.
    pub fn clear_agent_snooze(&mut self, agent_id: &str) -> Result<(), PersistenceError> {
        let now: OffsetDateTime = self.now()?;
        info!(agent_id, "Ending snooze early");
        mutations::agents::clear_snooze(&mut self.conn, agent_id, now)
    }
}
