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

//! Property tests for reward scoring and the gas network.

use ferrum_control::reward::{SOC_BAND_HIGH, SOC_BAND_LOW};
use ferrum_control::{calculate_reward, GasNetwork, GasNetworkConfig};
use ferrum_core::model::{GasHolderState, StandardAction, StandardState};
use ferrum_core::GasKind;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn with_socs(soc_bfg: f64, soc_bofg: f64, soc_cog: f64) -> StandardState {
    StandardState {
        gas_holder: GasHolderState {
            soc_bfg,
            soc_bofg,
            soc_cog,
            ..Default::default()
        },
        ..StandardState::new(1)
    }
}

fn stability(socs: [f64; 3]) -> f64 {
    calculate_reward(
        &StandardState::new(0),
        &StandardAction::default(),
        &with_socs(socs[0], socs[1], socs[2]),
    )
    .stability_score
}

proptest! {
    #[test]
    fn stability_is_one_iff_all_in_band(socs in prop::array::uniform3(0.0..1.0f64)) {
        let in_band = socs.iter().all(|s| (SOC_BAND_LOW..=SOC_BAND_HIGH).contains(s));
        prop_assert_eq!(stability(socs) == 1.0, in_band);
    }

    #[test]
    fn stability_falls_as_soc_leaves_band(
        base in SOC_BAND_HIGH + 0.001..0.95f64,
        extra in 0.001..0.04f64,
    ) {
        let near = stability([base, 0.5, 0.5]);
        let far = stability([base + extra, 0.5, 0.5]);
        prop_assert!(far < near);

        let low = SOC_BAND_LOW - (base - SOC_BAND_HIGH);
        let lower = stability([0.5, low - extra, 0.5]);
        prop_assert!(lower < stability([0.5, low, 0.5]));
    }

    #[test]
    fn scores_stay_in_unit_range(
        socs in prop::array::uniform3(0.0..1.0f64),
        bfg in 0.0..3.0e5f64,
        drawn in 0.0..3.0e5f64,
    ) {
        let mut next = with_socs(socs[0], socs[1], socs[2]);
        next.production.bf_bfg_supply = bfg;
        let mut action = StandardAction::default();
        action.gas_allocation.bfg_to_power_plant = drawn;

        let r = calculate_reward(&StandardState::new(0), &action, &next);
        for score in [r.production_score, r.stability_score, r.efficiency_score, r.total] {
            prop_assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
        }
    }

    #[test]
    fn holder_soc_stays_in_window(
        flows in prop::collection::vec((0.0..5.0e5f64, 0.0..5.0e5f64), 1..40),
    ) {
        let config = GasNetworkConfig::default();
        let mut network = GasNetwork::new(config.clone());
        for (produced, drawn) in flows {
            let production = BTreeMap::from([(GasKind::Cog, produced)]);
            let demands = BTreeMap::from([("cog_to_heating".to_string(), drawn)]);
            let state = network.update(&production, &demands, 1.0);
            prop_assert!(state.cog.soc >= config.soc_min && state.cog.soc <= config.soc_max);
            prop_assert_eq!(state.cog.pressure, config.pressure_at(state.cog.soc));
        }
    }
}
