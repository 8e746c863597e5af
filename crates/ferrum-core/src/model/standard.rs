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

use crate::agent::ActionSet;
use crate::observation::Observation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form annotations attached to a record.
pub type Metadata = BTreeMap<String, Value>;

/// Holder state of charge and pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasHolderState {
    /// BFG state of charge.
    pub soc_bfg: f64,
    /// BOFG state of charge.
    pub soc_bofg: f64,
    /// COG state of charge.
    pub soc_cog: f64,
    /// BFG pressure [kPa].
    pub p_bfg: f64,
    /// BOFG pressure [kPa].
    pub p_bofg: f64,
    /// COG pressure [kPa].
    pub p_cog: f64,
}

impl Default for GasHolderState {
    fn default() -> Self {
        Self {
            soc_bfg: 0.5,
            soc_bofg: 0.5,
            soc_cog: 0.5,
            p_bfg: 12.0,
            p_bofg: 12.0,
            p_cog: 12.0,
        }
    }
}

/// Production-side measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductionState {
    /// BFG produced [Nm3/h].
    pub bf_bfg_supply: f64,
    /// Hot-metal temperature [°C].
    pub bf_t_hot_metal: f64,
    /// Hot-metal silicon [%].
    pub bf_si_content: f64,
    /// BOFG produced [Nm3/h].
    pub bof_bofg_supply: f64,
    /// COG produced [Nm3/h].
    pub coke_cog_supply: f64,
}

impl Default for ProductionState {
    fn default() -> Self {
        Self {
            bf_bfg_supply: 0.0,
            bf_t_hot_metal: 1500.0,
            bf_si_content: 0.45,
            bof_bofg_supply: 0.0,
            coke_cog_supply: 0.0,
        }
    }
}

/// Consumer demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandState {
    /// Power plant gas demand [Nm3/h].
    pub power_plant_demand: f64,
    /// Heating furnace demand [Nm3/h].
    pub heating_demand: f64,
    /// Overall system priority.
    pub priority_level: f64,
}

impl Default for DemandState {
    fn default() -> Self {
        Self {
            power_plant_demand: 50000.0,
            heating_demand: 20000.0,
            priority_level: 0.5,
        }
    }
}

/// The canonical plant state at one step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StandardState {
    /// Step index.
    pub time: u64,
    /// Holder sub-state.
    pub gas_holder: GasHolderState,
    /// Production sub-state.
    pub production: ProductionState,
    /// Demand sub-state.
    pub demand: DemandState,
    /// Annotations.
    pub metadata: Metadata,
}

impl StandardState {
    /// The documented baseline state at step `time`.
    pub fn new(time: u64) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    /// Builds the canonical state from a live observation.
    ///
    /// The loop does not measure demand yet, so the demand sub-state keeps
    /// its defaults.
    pub fn from_observation(obs: &Observation, time: u64) -> Self {
        Self {
            time,
            gas_holder: GasHolderState {
                soc_bfg: obs.soc_bfg,
                soc_bofg: obs.soc_bofg,
                soc_cog: obs.soc_cog,
                p_bfg: obs.p_bfg,
                p_bofg: obs.p_bofg,
                p_cog: obs.p_cog,
            },
            production: ProductionState {
                bf_bfg_supply: obs.bfg_supply,
                bf_t_hot_metal: obs.t_hot_metal,
                bf_si_content: obs.si,
                bof_bofg_supply: obs.bofg_supply,
                coke_cog_supply: obs.cog_supply,
            },
            demand: DemandState::default(),
            metadata: Metadata::new(),
        }
    }
}

/// How the holders share out gas [Nm3/h].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasAllocation {
    /// BFG to the power plant.
    pub bfg_to_power_plant: f64,
    /// BFG to heating.
    pub bfg_to_heating: f64,
    /// BOFG to the power plant.
    pub bofg_to_power_plant: f64,
    /// COG to the blast furnace.
    pub cog_to_bf: f64,
    /// COG to heating.
    pub cog_to_heating: f64,
}

impl Default for GasAllocation {
    fn default() -> Self {
        Self {
            bfg_to_power_plant: 30000.0,
            bfg_to_heating: 20000.0,
            bofg_to_power_plant: 10000.0,
            cog_to_bf: 5000.0,
            cog_to_heating: 3000.0,
        }
    }
}

impl GasAllocation {
    /// Sum of every allocated flow.
    pub fn total(&self) -> f64 {
        self.bfg_to_power_plant
            + self.bfg_to_heating
            + self.bofg_to_power_plant
            + self.cog_to_bf
            + self.cog_to_heating
    }
}

/// Production unit setpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductionControl {
    /// Hot-blast volume [Nm3/min].
    pub bf_wind_volume: f64,
    /// Pulverised coal injection [kg/tHM].
    pub bf_pci: f64,
    /// Oxygen enrichment [%].
    pub bf_o2_enrichment: f64,
    /// Converter oxygen [Nm3/h].
    pub bof_oxygen: f64,
    /// Converter scrap [t/batch].
    pub bof_scrap_steel: f64,
    /// Coke-oven pushing rate.
    pub coke_pushing_rate: f64,
    /// Coke-oven heating gas [Nm3/h].
    pub coke_heating_gas: f64,
}

impl Default for ProductionControl {
    fn default() -> Self {
        Self {
            bf_wind_volume: 4000.0,
            bf_pci: 150.0,
            bf_o2_enrichment: 3.5,
            bof_oxygen: 20000.0,
            bof_scrap_steel: 20.0,
            coke_pushing_rate: 1.2,
            coke_heating_gas: 15000.0,
        }
    }
}

/// The canonical joint action at one step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StandardAction {
    /// Gas sharing.
    pub gas_allocation: GasAllocation,
    /// Unit setpoints.
    pub production_control: ProductionControl,
    /// Annotations.
    pub metadata: Metadata,
}

impl StandardAction {
    /// Builds the canonical action from every agent's setpoints.
    pub fn from_actions(actions: &ActionSet) -> Self {
        let gh = &actions.gas_holder;
        Self {
            gas_allocation: GasAllocation {
                bfg_to_power_plant: gh.bfg_to_pp,
                bfg_to_heating: gh.bfg_to_heating,
                bofg_to_power_plant: gh.bofg_to_pp,
                cog_to_bf: gh.cog_to_bf,
                cog_to_heating: gh.cog_to_heating,
            },
            production_control: ProductionControl {
                bf_wind_volume: actions.furnace.wind_volume,
                bf_pci: actions.furnace.pci,
                bf_o2_enrichment: actions.furnace.o2_enrichment,
                bof_oxygen: actions.converter.oxygen_flow,
                bof_scrap_steel: actions.converter.scrap_steel,
                coke_pushing_rate: actions.coke_oven.pushing_rate,
                coke_heating_gas: actions.coke_oven.heating_gas_input,
            },
            metadata: Metadata::new(),
        }
    }
}

/// Multi-objective score of one transition. Derived, never stored as state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reward {
    /// Output score in `[0, 1]`.
    pub production_score: f64,
    /// Holder stability score in `[0, 1]`.
    pub stability_score: f64,
    /// Gas utilisation score in `[0, 1]`.
    pub efficiency_score: f64,
    /// Weighted sum of the three.
    pub total: f64,
    /// Intermediate values.
    pub breakdown: BTreeMap<String, f64>,
}

/// One recorded `(s, a, s', r)` step. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Index in the log.
    pub step: usize,
    /// State before the action.
    pub state: StandardState,
    /// The action taken.
    pub action: StandardAction,
    /// State after the action.
    pub next_state: StandardState,
    /// Score.
    pub reward: Reward,
    /// End of episode.
    pub done: bool,
    /// Annotations.
    pub info: Metadata,
}
