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

//! Control records emitted by the agents.
//!
//! Each record is the agent's full set of setpoints, not a delta.

use super::AgentId;
use crate::gas::GasKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Blast-furnace setpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FurnaceControl {
    /// Hot-blast volume [m3/min].
    pub wind_volume: f64,
    /// Oxygen enrichment [%].
    pub o2_enrichment: f64,
    /// Pulverised coal injection [kg/t].
    pub pci: f64,
    /// Share of coke-oven gas in the injection.
    pub cog_ratio: f64,
    /// Silicon target [%].
    pub si_target: f64,
    /// Hot-metal temperature target [°C].
    pub t_target: f64,
}

impl Default for FurnaceControl {
    fn default() -> Self {
        Self {
            wind_volume: 4000.0,
            o2_enrichment: 3.5,
            pci: 150.0,
            cog_ratio: 0.2,
            si_target: 0.45,
            t_target: 1500.0,
        }
    }
}

/// Converter setpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConverterControl {
    /// Blown oxygen [m3/h].
    pub oxygen_flow: f64,
    /// Scrap charged per batch [t/batch].
    pub scrap_steel: f64,
    /// Steel temperature target [°C].
    pub t_target: f64,
    /// Elapsed time in the current blow [min].
    pub blow_time: f64,
    /// Nominal blow duration [min].
    pub blow_duration: f64,
}

impl Default for ConverterControl {
    fn default() -> Self {
        Self {
            oxygen_flow: 45000.0,
            scrap_steel: 20.0,
            t_target: 1650.0,
            blow_time: 0.0,
            blow_duration: 18.0,
        }
    }
}

/// Coke-oven setpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CokeOvenControl {
    /// Heating gas input [m3/h].
    pub heating_gas_input: f64,
    /// Relative pushing rate (1.0 is nominal).
    pub pushing_rate: f64,
    /// Flue temperature target [°C].
    pub t_target: f64,
}

impl Default for CokeOvenControl {
    fn default() -> Self {
        Self {
            heating_gas_input: 15000.0,
            pushing_rate: 1.0,
            t_target: 1200.0,
        }
    }
}

/// Gas-holder outflow setpoints [m3/h].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HolderControl {
    /// BFG to the power plant.
    pub bfg_to_pp: f64,
    /// BFG to heating.
    pub bfg_to_heating: f64,
    /// BOFG to the power plant.
    pub bofg_to_pp: f64,
    /// BOFG to heating.
    pub bofg_to_heating: f64,
    /// COG to heating.
    pub cog_to_heating: f64,
    /// COG back into the blast furnace.
    pub cog_to_bf: f64,
}

impl Default for HolderControl {
    fn default() -> Self {
        Self {
            bfg_to_pp: 50000.0,
            bfg_to_heating: 30000.0,
            bofg_to_pp: 20000.0,
            bofg_to_heating: 10000.0,
            cog_to_heating: 8000.0,
            cog_to_bf: 5000.0,
        }
    }
}

impl HolderControl {
    /// Outflows as consumer-labelled demands, the shape the gas network sums.
    pub fn demands(&self) -> BTreeMap<String, f64> {
        [
            ("bfg_to_pp", self.bfg_to_pp),
            ("bfg_to_heating", self.bfg_to_heating),
            ("bofg_to_pp", self.bofg_to_pp),
            ("bofg_to_heating", self.bofg_to_heating),
            ("cog_to_heating", self.cog_to_heating),
            ("cog_to_bf", self.cog_to_bf),
        ]
        .into_iter()
        .map(|(label, rate)| (label.to_string(), rate))
        .collect()
    }

    /// Sum of all outflows for one gas.
    pub fn total_outflow(&self, gas: GasKind) -> f64 {
        match gas {
            GasKind::Bfg => self.bfg_to_pp + self.bfg_to_heating,
            GasKind::Bofg => self.bofg_to_pp + self.bofg_to_heating,
            GasKind::Cog => self.cog_to_heating + self.cog_to_bf,
        }
    }
}

/// The output of one agent step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AgentAction {
    /// From the furnace agent.
    Furnace(FurnaceControl),
    /// From the converter agent.
    Converter(ConverterControl),
    /// From the coke-oven agent.
    CokeOven(CokeOvenControl),
    /// From the gas-holder agent.
    GasHolder(HolderControl),
}

impl AgentAction {
    /// The agent this action belongs to.
    pub fn agent_id(&self) -> AgentId {
        match self {
            AgentAction::Furnace(_) => AgentId::Furnace,
            AgentAction::Converter(_) => AgentId::Converter,
            AgentAction::CokeOven(_) => AgentId::CokeOven,
            AgentAction::GasHolder(_) => AgentId::GasHolder,
        }
    }
}

/// The actions of every agent for one tick.
///
/// Units whose agent is not registered keep the default setpoints.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionSet {
    /// Furnace setpoints.
    pub furnace: FurnaceControl,
    /// Converter setpoints.
    pub converter: ConverterControl,
    /// Coke-oven setpoints.
    pub coke_oven: CokeOvenControl,
    /// Gas-holder outflows.
    pub gas_holder: HolderControl,
}

impl ActionSet {
    /// Stores an action in its slot.
    pub fn insert(&mut self, action: AgentAction) {
        match action {
            AgentAction::Furnace(c) => self.furnace = c,
            AgentAction::Converter(c) => self.converter = c,
            AgentAction::CokeOven(c) => self.coke_oven = c,
            AgentAction::GasHolder(c) => self.gas_holder = c,
        }
    }
}

impl FromIterator<AgentAction> for ActionSet {
    fn from_iter<I: IntoIterator<Item = AgentAction>>(iter: I) -> Self {
        let mut set = ActionSet::default();
        for action in iter {
            set.insert(action);
        }
        set
    }
}
