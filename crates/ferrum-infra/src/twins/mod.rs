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

//! Reference process twins.
//!
//! All three twins are record models: they read the labelled input record,
//! run a chain of per-tonne balances where every intermediate is rounded to
//! two decimals, and write a labelled output record. Each availability
//! check scales production down by `used / required`. A ratio with nothing
//! required is 0 for feedstocks and 1 for the furnace's power and COG.

mod coke_oven;
mod converter;
mod furnace;

pub use coke_oven::*;
pub use converter::*;
pub use furnace::*;

use ferrum_core::twin::TwinRecord;

/// Rounds to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `min(available, required) / required`, or 0 when nothing is required.
pub(crate) fn supply_ratio(available: f64, required: f64) -> f64 {
    if required > 0.0 {
        available.min(required) / required
    } else {
        0.0
    }
}

pub(crate) fn input(record: &TwinRecord, label: &str, default: f64) -> f64 {
    record.get(label).copied().unwrap_or(default)
}

pub(crate) fn output<const N: usize>(entries: [(&str, f64); N]) -> TwinRecord {
    entries
        .into_iter()
        .map(|(label, value)| (label.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(14.254), 14.25);
        assert_eq!(round2(-1.006), -1.01);
    }

    #[test]
    fn test_supply_ratio_degenerate_requirement() {
        assert_eq!(supply_ratio(10.0, 0.0), 0.0);
        assert_eq!(supply_ratio(10.0, 20.0), 0.5);
        assert_eq!(supply_ratio(30.0, 20.0), 1.0);
    }
}
