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

//! Run configuration, loadable from TOML.
//!
//! Every field is optional in the file; anything left out takes the default
//! documented on the struct.

use ferrum_core::twin::TwinError;
use ferrum_core::GasKind;
use ferrum_infra::StateSpaceParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or checking a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for this schema.
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
    /// A holder model's matrices do not line up.
    #[error("invalid {gas} holder model: {source}")]
    HolderModel {
        /// Which holder.
        gas: GasKind,
        /// What was wrong.
        #[source]
        source: TwinError,
    },
}

/// Holder sizes and the pressure model of the gas network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasNetworkConfig {
    /// BFG holder capacity [Nm3].
    pub capacity_bfg: f64,
    /// BOFG holder capacity [Nm3].
    pub capacity_bofg: f64,
    /// COG holder capacity [Nm3].
    pub capacity_cog: f64,
    /// Pressure at zero fill [kPa].
    pub p_min: f64,
    /// Pressure gained from empty to full [kPa].
    pub p_range: f64,
    /// Lowest reachable state of charge.
    pub soc_min: f64,
    /// Highest reachable state of charge.
    pub soc_max: f64,
    /// State of charge after a reset.
    pub initial_soc: f64,
}

impl Default for GasNetworkConfig {
    fn default() -> Self {
        Self {
            capacity_bfg: 400000.0,
            capacity_bofg: 150000.0,
            capacity_cog: 100000.0,
            p_min: 8.0,
            p_range: 8.0,
            soc_min: 0.05,
            soc_max: 0.95,
            initial_soc: 0.5,
        }
    }
}

impl GasNetworkConfig {
    /// Capacity of the holder for `gas` [Nm3].
    pub fn capacity(&self, gas: GasKind) -> f64 {
        match gas {
            GasKind::Bfg => self.capacity_bfg,
            GasKind::Bofg => self.capacity_bofg,
            GasKind::Cog => self.capacity_cog,
        }
    }

    /// Pressure at a given state of charge [kPa].
    pub fn pressure_at(&self, soc: f64) -> f64 {
        self.p_min + soc * self.p_range
    }

    /// Checks capacities are positive and the SOC window is ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for gas in GasKind::ALL {
            let capacity = self.capacity(gas);
            if !capacity.is_finite() || capacity <= 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "{gas} capacity must be positive, got {capacity}"
                )));
            }
        }
        if !self.p_range.is_finite() || self.p_range <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "p_range must be positive, got {}",
                self.p_range
            )));
        }
        if self.soc_min >= self.soc_max {
            return Err(ConfigError::InvalidValue(format!(
                "soc_min ({}) must be below soc_max ({})",
                self.soc_min, self.soc_max
            )));
        }
        if self.initial_soc < self.soc_min || self.initial_soc > self.soc_max {
            return Err(ConfigError::InvalidValue(format!(
                "initial_soc {} lies outside [{}, {}]",
                self.initial_soc, self.soc_min, self.soc_max
            )));
        }
        Ok(())
    }
}

/// Matrices of the three holder models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolderModelsConfig {
    /// BFG holder.
    pub bfg: StateSpaceParams,
    /// BOFG holder.
    pub bofg: StateSpaceParams,
    /// COG holder.
    pub cog: StateSpaceParams,
}

impl Default for HolderModelsConfig {
    fn default() -> Self {
        Self {
            bfg: StateSpaceParams::bfg(),
            bofg: StateSpaceParams::bofg(),
            cog: StateSpaceParams::cog(),
        }
    }
}

impl HolderModelsConfig {
    /// Parameters for `gas`.
    pub fn params(&self, gas: GasKind) -> &StateSpaceParams {
        match gas {
            GasKind::Bfg => &self.bfg,
            GasKind::Bofg => &self.bofg,
            GasKind::Cog => &self.cog,
        }
    }
}

/// Configuration for the [`Orchestrator`](crate::Orchestrator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Simulated minutes per tick.
    pub timestep: f64,
    /// Attach the reference furnace, converter and coke-oven twins.
    pub use_reference_twins: bool,
    /// Attach the state-space holder models to the gas network.
    pub use_holder_models: bool,
    /// Seed of the simplified furnace dynamics.
    pub seed: u64,
    /// Samples kept per rolling metric.
    pub metric_window: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0,
            use_reference_twins: true,
            use_holder_models: true,
            seed: 42,
            metric_window: 120,
        }
    }
}

/// Everything needed to build a run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Gas network sizing.
    pub gas_network: GasNetworkConfig,
    /// Loop settings.
    pub orchestrator: OrchestratorConfig,
    /// Holder model matrices.
    pub holder_models: HolderModelsConfig,
}

impl SimulationConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        log::debug!("Loading simulation config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gas_network.validate()?;

        let o = &self.orchestrator;
        if !o.timestep.is_finite() || o.timestep <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "timestep must be positive, got {}",
                o.timestep
            )));
        }
        if o.metric_window == 0 {
            return Err(ConfigError::InvalidValue(
                "metric_window must be at least 1".to_string(),
            ));
        }

        for gas in GasKind::ALL {
            self.holder_models
                .params(gas)
                .dimensions()
                .map_err(|source| ConfigError::HolderModel { gas, source })?;
        }
        Ok(())
    }
}
