// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! These run outside write transactions for previews and listings, and
//! inside them to load the view a transition is computed from.
//!
//! ## Module Organization
//!
//! - `agents` - Agent directory reads
//! - `rotation` - The rotation singleton
//! - `leads` - Lead reads and assignment counters
//! - `audit` - Rotation log reads

pub mod agents;
pub mod audit;
pub mod leads;
pub mod rotation;
