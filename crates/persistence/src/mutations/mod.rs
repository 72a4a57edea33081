// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! ## Module Organization
//!
//! - `agents` - Directory writes and the version-guarded snooze
//! - `rotation` - Version-guarded writes to the rotation singleton
//! - `leads` - Lead creation
//! - `audit` - Rotation log appends
//! - `transition` - One optimistic read-compute-write attempt
//!
//! Version-guarded writes report a lost race as `PersistenceError::Conflict`.

pub mod agents;
pub mod audit;
pub mod leads;
pub mod rotation;
pub mod transition;

pub use transition::execute_command;
