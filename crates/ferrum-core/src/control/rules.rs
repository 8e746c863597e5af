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

//! Stateless rule primitives: clamping, proportional steps, hysteresis,
//! and priority-greedy allocation.

use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Inclusive bounds for a controllable quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Limit {
    /// `[0, +inf)`, the default bound of a proportional step.
    pub const NON_NEGATIVE: Limit = Limit {
        min: 0.0,
        max: f64::INFINITY,
    };

    /// Creates a new limit. Callers keep `min <= max`.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `[min, +inf)`.
    pub const fn at_least(min: f64) -> Self {
        Self {
            min,
            max: f64::INFINITY,
        }
    }

    /// `[0, max]`.
    pub const fn up_to(max: f64) -> Self {
        Self { min: 0.0, max }
    }

    /// Clamps `value` into this limit.
    pub fn clamp(&self, value: f64) -> f64 {
        clamp(value, self.min, self.max)
    }

    /// Returns true if `value` lies inside the limit.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::NON_NEGATIVE
    }
}

/// Restricts `value` to `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: a NaN input resolves to `max`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// Direction of a proportional step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Multiply by `1 + step`.
    Increase,
    /// Multiply by `1 - step`.
    Decrease,
}

/// Moves `current` by a fraction `step` of itself, then clamps into `limit`.
///
/// A zero setpoint stays at zero unless the limit's minimum lifts it.
pub fn incremental_adjust(current: f64, direction: Direction, step: f64, limit: Limit) -> f64 {
    let next = match direction {
        Direction::Increase => current * (1.0 + step),
        Direction::Decrease => current * (1.0 - step),
    };
    limit.clamp(next)
}

/// Which band decided a hysteresis outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HysteresisReason {
    /// Value above `target + upper_band`.
    AboveUpperBand,
    /// Value below `target - lower_band`.
    BelowLowerBand,
    /// Already active and still inside the inner half-band.
    WithinHysteresis,
    /// Nothing to do.
    Normal,
}

/// Result of [`hysteresis_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HysteresisOutcome {
    /// Whether the condition should be (or stay) active.
    pub active: bool,
    /// Why.
    pub reason: HysteresisReason,
}

/// Two-band hysteresis around `target`.
///
/// Activates outside `[target - lower_band, target + upper_band]`. Once
/// active, the condition holds while the value stays within the half-bands
/// `[target - lower_band / 2, target + upper_band / 2]`.
pub fn hysteresis_check(
    value: f64,
    target: f64,
    upper_band: f64,
    lower_band: f64,
    currently_active: bool,
) -> HysteresisOutcome {
    let (active, reason) = if value > target + upper_band {
        (true, HysteresisReason::AboveUpperBand)
    } else if value < target - lower_band {
        (true, HysteresisReason::BelowLowerBand)
    } else if currently_active
        && value >= target - lower_band / 2.0
        && value <= target + upper_band / 2.0
    {
        (true, HysteresisReason::WithinHysteresis)
    } else {
        (false, HysteresisReason::Normal)
    };
    HysteresisOutcome { active, reason }
}

/// A named boolean latch owned by an agent.
///
/// Transitions are logged at debug level so rule activity can be traced
/// without touching the control path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HysteresisFlag {
    name: &'static str,
    active: bool,
}

impl HysteresisFlag {
    /// Creates an inactive flag.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            active: false,
        }
    }

    /// Returns the flag's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true while the condition is latched.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Latches the condition.
    pub fn set(&mut self) {
        if !self.active {
            log::debug!("Flag '{}' set", self.name);
        }
        self.active = true;
    }

    /// Releases the condition.
    pub fn clear(&mut self) {
        if self.active {
            log::debug!("Flag '{}' cleared", self.name);
        }
        self.active = false;
    }
}

/// Greedy allocation of `available` across `demands`, highest priority first.
///
/// Consumers missing from `priorities` rank at 0. Ties keep the map's key
/// order. Each consumer receives `min(demand, remaining)`; once nothing
/// remains every later consumer gets 0. Negative demands and a negative
/// supply are treated as 0, so the allocations always sum to at most
/// `max(available, 0)`.
pub fn priority_allocate<K: Ord + Clone>(
    available: f64,
    demands: &BTreeMap<K, f64>,
    priorities: &BTreeMap<K, i32>,
) -> BTreeMap<K, f64> {
    let mut order: Vec<&K> = demands.keys().collect();
    // `sort_by_key` is stable, ties keep key order.
    order.sort_by_key(|consumer| Reverse(priorities.get(*consumer).copied().unwrap_or(0)));

    let mut allocation: BTreeMap<K, f64> = demands.keys().map(|k| (k.clone(), 0.0)).collect();
    let mut remaining = available.max(0.0);

    for consumer in order {
        if remaining <= 0.0 {
            break;
        }
        let demand = demands.get(consumer).copied().unwrap_or(0.0).max(0.0);
        let granted = demand.min(remaining);
        allocation.insert(consumer.clone(), granted);
        remaining -= granted;
    }

    allocation
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ── Clamp ──

    #[test]
    fn test_clamp_inside_and_outside() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-3.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(42.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_clamp_degenerate_range() {
        assert_eq!(clamp(3.0, 7.0, 7.0), 7.0);
    }

    // ── Incremental Adjust ──

    #[test]
    fn test_incremental_adjust_steps() {
        assert_relative_eq!(
            incremental_adjust(100.0, Direction::Increase, 0.1, Limit::NON_NEGATIVE),
            110.0
        );
        assert_relative_eq!(
            incremental_adjust(100.0, Direction::Decrease, 0.1, Limit::NON_NEGATIVE),
            90.0
        );
    }

    #[test]
    fn test_incremental_adjust_respects_limits() {
        let limit = Limit::new(1000.0, 8000.0);
        assert_eq!(
            incremental_adjust(7800.0, Direction::Increase, 0.15, limit),
            8000.0
        );
        assert_eq!(
            incremental_adjust(1100.0, Direction::Decrease, 0.15, limit),
            1000.0
        );
    }

    #[test]
    fn test_incremental_adjust_zero_stays_zero() {
        assert_eq!(
            incremental_adjust(0.0, Direction::Increase, 0.5, Limit::NON_NEGATIVE),
            0.0
        );
        assert_eq!(
            incremental_adjust(0.0, Direction::Increase, 0.5, Limit::new(5.0, 10.0)),
            5.0
        );
    }

    // ── Hysteresis ──

    #[test]
    fn test_hysteresis_boundary_table() {
        use HysteresisReason::*;
        let cases = [
            (103.0, false, false, Normal),
            (112.0, false, true, AboveUpperBand),
            (103.0, true, true, WithinHysteresis),
            (107.0, true, false, Normal),
            (95.0, true, true, WithinHysteresis),
            (89.0, false, true, BelowLowerBand),
            (110.0, true, false, Normal),
        ];
        for (value, was_active, expected_active, expected_reason) in cases {
            let outcome = hysteresis_check(value, 100.0, 10.0, 10.0, was_active);
            assert_eq!(
                outcome.active, expected_active,
                "value {} active {}",
                value, was_active
            );
            assert_eq!(outcome.reason, expected_reason, "value {}", value);
        }
    }

    #[test]
    fn test_hysteresis_half_band_edges_are_inclusive() {
        assert!(hysteresis_check(105.0, 100.0, 10.0, 10.0, true).active);
        assert!(hysteresis_check(95.0, 100.0, 10.0, 10.0, true).active);
        assert!(!hysteresis_check(105.0, 100.0, 10.0, 10.0, false).active);
    }

    #[test]
    fn test_flag_set_and_clear() {
        let mut flag = HysteresisFlag::new("si_high");
        assert!(!flag.is_active());
        flag.set();
        flag.set();
        assert!(flag.is_active());
        flag.clear();
        assert!(!flag.is_active());
        assert_eq!(flag.name(), "si_high");
    }

    // ── Priority Allocation ──

    #[test]
    fn test_priority_allocate_higher_priority_first() {
        let demands = BTreeMap::from([("A", 60.0), ("B", 60.0)]);
        let priorities = BTreeMap::from([("A", 2), ("B", 1)]);
        let allocation = priority_allocate(100.0, &demands, &priorities);
        assert_eq!(allocation["A"], 60.0);
        assert_eq!(allocation["B"], 40.0);
    }

    #[test]
    fn test_priority_allocate_missing_priority_ranks_last() {
        let demands = BTreeMap::from([("A", 50.0), ("B", 50.0), ("C", 50.0)]);
        let priorities = BTreeMap::from([("C", 5)]);
        let allocation = priority_allocate(80.0, &demands, &priorities);
        assert_eq!(allocation["C"], 50.0);
        // A and B tie at 0, key order decides.
        assert_eq!(allocation["A"], 30.0);
        assert_eq!(allocation["B"], 0.0);
    }

    #[test]
    fn test_priority_allocate_surplus_leaves_demands_whole() {
        let demands = BTreeMap::from([("A", 10.0), ("B", 20.0)]);
        let allocation = priority_allocate(1000.0, &demands, &BTreeMap::new());
        assert_eq!(allocation["A"], 10.0);
        assert_eq!(allocation["B"], 20.0);
    }

    #[test]
    fn test_priority_allocate_nothing_available() {
        let demands = BTreeMap::from([("A", 10.0)]);
        let allocation = priority_allocate(0.0, &demands, &BTreeMap::new());
        assert_eq!(allocation["A"], 0.0);
        assert_eq!(allocation.len(), 1);
    }
}
