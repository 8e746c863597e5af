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

//! The gas network: three holders integrating production against demand.

use crate::config::{ConfigError, GasNetworkConfig, HolderModelsConfig};
use ferrum_core::control::clamp;
use ferrum_core::twin::{HolderInput, HolderModel};
use ferrum_core::{GasKind, Observation};
use ferrum_infra::StateSpaceHolder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Buffered state of one holder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HolderState {
    /// State of charge, inside the configured SOC window.
    pub soc: f64,
    /// Pressure [kPa], linear in the state of charge.
    pub pressure: f64,
    /// Level from the holder model, or the state of charge without one.
    pub level: f64,
}

/// Snapshot of all three holders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasNetworkState {
    /// BFG holder.
    pub bfg: HolderState,
    /// BOFG holder.
    pub bofg: HolderState,
    /// COG holder.
    pub cog: HolderState,
}

impl GasNetworkState {
    fn uniform(holder: HolderState) -> Self {
        Self {
            bfg: holder,
            bofg: holder,
            cog: holder,
        }
    }

    /// State of the holder for `gas`.
    pub fn holder(&self, gas: GasKind) -> &HolderState {
        match gas {
            GasKind::Bfg => &self.bfg,
            GasKind::Bofg => &self.bofg,
            GasKind::Cog => &self.cog,
        }
    }

    fn holder_mut(&mut self, gas: GasKind) -> &mut HolderState {
        match gas {
            GasKind::Bfg => &mut self.bfg,
            GasKind::Bofg => &mut self.bofg,
            GasKind::Cog => &mut self.cog,
        }
    }

    /// Writes SOC, pressure and level of every holder into the observation.
    pub fn merge_into(&self, obs: &mut Observation) {
        obs.soc_bfg = self.bfg.soc;
        obs.p_bfg = self.bfg.pressure;
        obs.level_bfg = self.bfg.level;
        obs.soc_bofg = self.bofg.soc;
        obs.p_bofg = self.bofg.pressure;
        obs.level_bofg = self.bofg.level;
        obs.soc_cog = self.cog.soc;
        obs.p_cog = self.cog.pressure;
        obs.level_cog = self.cog.level;
    }
}

/// Sum of the demands whose label names `gas`.
///
/// Labels are matched by lowercase substring, so `"bfg_to_pp"` counts
/// towards BFG while `"bofg_to_pp"` does not.
pub fn consumption(gas: GasKind, demands: &BTreeMap<String, f64>) -> f64 {
    demands
        .iter()
        .filter(|(label, _)| gas.matches_label(label))
        .map(|(_, rate)| rate)
        .sum()
}

/// Coordinates the three gas holders.
///
/// Each update integrates net flow into the state of charge, clips it to
/// the SOC window and derives pressure from it. An attached holder model
/// refines the level; when it fails the level falls back to the SOC.
pub struct GasNetwork {
    config: GasNetworkConfig,
    state: GasNetworkState,
    models: HashMap<GasKind, HolderModel>,
}

impl GasNetwork {
    /// Creates a network at its initial state, without holder models.
    pub fn new(config: GasNetworkConfig) -> Self {
        let state = Self::initial_state(&config);
        Self {
            config,
            state,
            models: HashMap::new(),
        }
    }

    /// Builds the state-space holder models for all three gases.
    pub fn with_state_space_models(
        mut self,
        models: &HolderModelsConfig,
    ) -> Result<Self, ConfigError> {
        for gas in GasKind::ALL {
            let holder = StateSpaceHolder::new(models.params(gas).clone())
                .map_err(|source| ConfigError::HolderModel { gas, source })?;
            self.attach_model(gas, Box::new(holder));
        }
        log::debug!("GasNetwork: state-space holder models attached");
        Ok(self)
    }

    /// Attaches, or replaces, the model of one holder.
    pub fn attach_model(&mut self, gas: GasKind, model: HolderModel) {
        self.models.insert(gas, model);
    }

    /// True if `gas` has a holder model.
    pub fn has_model(&self, gas: GasKind) -> bool {
        self.models.contains_key(&gas)
    }

    fn initial_state(config: &GasNetworkConfig) -> GasNetworkState {
        GasNetworkState::uniform(HolderState {
            soc: config.initial_soc,
            pressure: config.pressure_at(config.initial_soc),
            level: config.initial_soc,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &GasNetworkConfig {
        &self.config
    }

    /// The current snapshot.
    pub fn state(&self) -> &GasNetworkState {
        &self.state
    }

    /// Advances every holder by `timestep` minutes.
    ///
    /// ## Arguments
    ///
    /// * `production` - Production rate per gas [Nm3/h]. Missing gases produce nothing.
    /// * `demands` - Consumer-labelled draw rates [Nm3/h], matched to gases by label.
    /// * `timestep` - Step length [min].
    ///
    /// ## Returns
    ///
    /// The new snapshot.
    pub fn update(
        &mut self,
        production: &BTreeMap<GasKind, f64>,
        demands: &BTreeMap<String, f64>,
        timestep: f64,
    ) -> GasNetworkState {
        for gas in GasKind::ALL {
            let produced = production.get(&gas).copied().unwrap_or(0.0);
            let net_flow = produced - consumption(gas, demands);
            self.update_holder(gas, net_flow, timestep);
        }
        self.state
    }

    fn update_holder(&mut self, gas: GasKind, net_flow: f64, timestep: f64) {
        let config = &self.config;
        let current = self.state.holder(gas).soc;

        let delta_soc = (net_flow / 3600.0) * timestep * 60.0 / config.capacity(gas);
        let soc = clamp(current + delta_soc, config.soc_min, config.soc_max);
        let pressure = config.pressure_at(soc);

        let level = match self.models.get_mut(&gas) {
            Some(model) => match model.step(&HolderInput {
                gas_net_flow: net_flow,
            }) {
                Ok(output) => output.level,
                Err(e) => {
                    log::debug!("GasNetwork: {} holder model failed ({}), using SOC", gas, e);
                    soc
                }
            },
            None => soc,
        };

        *self.state.holder_mut(gas) = HolderState {
            soc,
            pressure,
            level,
        };
    }

    /// Returns every holder, and every holder model, to its initial state.
    pub fn reset(&mut self) {
        self.state = Self::initial_state(&self.config);
        for model in self.models.values_mut() {
            model.reset();
        }
    }
}
