// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Property tests for the control primitives.

use ferrum_core::control::{
    clamp, hysteresis_check, incremental_adjust, priority_allocate, Direction, Limit,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn bounds() -> impl Strategy<Value = (f64, f64)> {
    (-1.0e6..1.0e6f64, 0.0..1.0e6f64).prop_map(|(lo, width)| (lo, lo + width))
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Increase), Just(Direction::Decrease)]
}

proptest! {
    #[test]
    fn clamp_stays_in_range((lo, hi) in bounds(), v in -1.0e7..1.0e7f64) {
        let c = clamp(v, lo, hi);
        prop_assert!(c >= lo && c <= hi);
    }

    #[test]
    fn clamp_is_idempotent((lo, hi) in bounds(), v in -1.0e7..1.0e7f64) {
        let once = clamp(v, lo, hi);
        prop_assert_eq!(clamp(once, lo, hi), once);
    }

    #[test]
    fn repeated_adjustments_never_leave_the_limit(
        start in 0.0..1.0e5f64,
        steps in prop::collection::vec((direction(), 0.0..0.5f64), 1..50),
    ) {
        let limit = Limit::new(1000.0, 8000.0);
        let mut value = start;
        for (dir, step) in steps {
            value = incremental_adjust(value, dir, step, limit);
            prop_assert!(limit.contains(value), "value {} left the limit", value);
        }
    }

    #[test]
    fn allocation_never_exceeds_supply(
        available in 0.0..1.0e6f64,
        demands in prop::collection::btree_map(0u8..10, 0.0..2.0e5f64, 0..10),
        ranks in prop::collection::btree_map(0u8..10, -5i32..5, 0..10),
    ) {
        let allocation = priority_allocate(available, &demands, &ranks);
        let total: f64 = allocation.values().sum();
        prop_assert!(total <= available + 1e-6);
        prop_assert_eq!(allocation.len(), demands.len());
        for (consumer, granted) in &allocation {
            prop_assert!(*granted >= 0.0);
            prop_assert!(*granted <= demands[consumer] + 1e-9);
        }
    }

    #[test]
    fn higher_priority_is_filled_first(
        available in 0.0..1.0e5f64,
        high in 0.0..1.0e5f64,
        low in 0.0..1.0e5f64,
    ) {
        let demands = BTreeMap::from([("high", high), ("low", low)]);
        let ranks = BTreeMap::from([("high", 2), ("low", 1)]);
        let allocation = priority_allocate(available, &demands, &ranks);
        if allocation["low"] > 0.0 {
            prop_assert_eq!(allocation["high"], high);
        }
    }

    #[test]
    fn active_condition_holds_inside_the_half_band(offset in -5.0..=5.0f64) {
        prop_assert!(hysteresis_check(100.0 + offset, 100.0, 10.0, 10.0, true).active);
    }
}
