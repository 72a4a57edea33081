// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod rotation;

use crate::{Agent, AgentRole};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-14 15:00:00 UTC)
}

pub fn staff(id: &str, position: i64) -> Agent {
    Agent::new(id, &format!("Agent {id}"), AgentRole::Staff, position)
}
