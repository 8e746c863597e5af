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

use ferrum_core::{ActionSet, Observation};
use serde::{Deserialize, Serialize};

/// Per-tick time series of a run, one entry per column per step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationHistory {
    /// Simulated time [min].
    pub time: Vec<f64>,
    /// BFG holder state of charge.
    pub soc_bfg: Vec<f64>,
    /// BOFG holder state of charge.
    pub soc_bofg: Vec<f64>,
    /// COG holder state of charge.
    pub soc_cog: Vec<f64>,
    /// BFG holder pressure [kPa].
    pub p_bfg: Vec<f64>,
    /// Hot-metal silicon [%].
    pub si: Vec<f64>,
    /// Furnace hot-blast setpoint [Nm3/min].
    pub wind_volume: Vec<f64>,
    /// BFG to the power plant [Nm3/h].
    pub bfg_to_pp: Vec<f64>,
    /// BFG to heating [Nm3/h].
    pub bfg_to_heating: Vec<f64>,
}

impl SimulationHistory {
    /// Appends one tick.
    pub fn push(&mut self, time: f64, obs: &Observation, actions: &ActionSet) {
        self.time.push(time);
        self.soc_bfg.push(obs.soc_bfg);
        self.soc_bofg.push(obs.soc_bofg);
        self.soc_cog.push(obs.soc_cog);
        self.p_bfg.push(obs.p_bfg);
        self.si.push(obs.si);
        self.wind_volume.push(actions.furnace.wind_volume);
        self.bfg_to_pp.push(actions.gas_holder.bfg_to_pp);
        self.bfg_to_heating.push(actions.gas_holder.bfg_to_heating);
    }

    /// Number of ticks recorded.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True if no tick was recorded.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Total BFG outflow per tick [Nm3/h].
    pub fn bfg_outflow(&self) -> Vec<f64> {
        self.bfg_to_pp
            .iter()
            .zip(&self.bfg_to_heating)
            .map(|(pp, heating)| pp + heating)
            .collect()
    }
}
