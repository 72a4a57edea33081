// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::test_now;
use crate::{Clock, FixedClock, SystemClock};
use time::{Duration, OffsetDateTime};

#[test]
fn test_fixed_clock_holds_still() {
    let clock: FixedClock = FixedClock::new(test_now());
    assert_eq!(clock.now(), test_now());
    assert_eq!(clock.now(), test_now());
}

#[test]
fn test_fixed_clock_advance_and_set() {
    let clock: FixedClock = FixedClock::new(test_now());
    clock.advance(Duration::minutes(31));
    assert_eq!(clock.now(), test_now() + Duration::minutes(31));

    clock.set(test_now());
    assert_eq!(clock.now(), test_now());
}

#[test]
fn test_system_clock_is_utc() {
    let now: OffsetDateTime = SystemClock.now();
    assert!(now.offset().is_utc());
}
