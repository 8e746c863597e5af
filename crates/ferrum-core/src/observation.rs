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

//! The shared plant observation and the per-agent views of it.
//!
//! [`Observation`] is the single flat record the orchestrator rebuilds every
//! tick. Each agent reads its own input struct (for example
//! [`FurnaceInputs`]) built from it. Every input field has a literal
//! default, so a value the plant does not measure never stops a step.

use serde::{Deserialize, Serialize};

/// Everything measured or derived about the plant after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Observation {
    // ── Blast furnace ──
    /// Hot-metal silicon content [%].
    pub si: f64,
    /// Hot-metal temperature [°C].
    pub t_hot_metal: f64,
    /// Pig iron production [t/h].
    pub pig_iron_production: f64,
    /// Furnace CO2 emissions [t/h].
    pub co2_emissions_bf: f64,
    /// Furnace slag [t/h].
    pub slag_bf: f64,
    /// Furnace own electricity production [kW].
    pub electricity_own_bf: f64,

    // ── Converter ──
    /// Steel temperature [°C].
    pub t_steel: f64,
    /// Liquid steel production [t/h].
    pub liquid_steel: f64,
    /// Converter CO2 emissions [t/h].
    pub co2_emissions_bof: f64,

    // ── Coke oven ──
    /// Coke-oven flue temperature [°C].
    pub t_furnace: f64,
    /// Coke production [t/h].
    pub coke_production: f64,
    /// Tar production [t/h].
    pub tar_production: f64,
    /// Coke-oven CO2 emissions [t/h].
    pub co2_emissions_co: f64,

    // ── Gas holders ──
    /// BFG holder state of charge.
    pub soc_bfg: f64,
    /// BFG holder pressure [kPa].
    pub p_bfg: f64,
    /// BFG production [m3/h].
    pub bfg_supply: f64,
    /// BOFG holder state of charge.
    pub soc_bofg: f64,
    /// BOFG holder pressure [kPa].
    pub p_bofg: f64,
    /// BOFG production [m3/h].
    pub bofg_supply: f64,
    /// COG holder state of charge.
    pub soc_cog: f64,
    /// COG holder pressure [kPa].
    pub p_cog: f64,
    /// COG production [m3/h].
    pub cog_supply: f64,
    /// Refined holder levels from the holder models, when attached.
    pub level_bfg: f64,
    /// See `level_bfg`.
    pub level_bofg: f64,
    /// See `level_bfg`.
    pub level_cog: f64,

    // ── Shared resources ──
    /// COG available to the furnace [m3/h].
    pub cog_available: f64,
    /// Oxygen available to the furnace [m3/h].
    pub o2_available: f64,
    /// True during a high electricity price period.
    pub peak_electricity: bool,

    // ── Not produced by the plant loop ──
    /// COG the furnace needs [m3/h]. Set by an external scheduler if any.
    pub cog_required: Option<f64>,
    /// Converter off-gas pressure [kPa].
    pub bof_gas_pressure: Option<f64>,
    /// COG demand seen by the coke oven [m3/h].
    pub cog_demand: Option<f64>,
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            si: 0.45,
            t_hot_metal: 1500.0,
            pig_iron_production: 200.0,
            co2_emissions_bf: 0.0,
            slag_bf: 0.0,
            electricity_own_bf: 0.0,
            t_steel: 1650.0,
            liquid_steel: 95.0,
            co2_emissions_bof: 0.0,
            t_furnace: 1200.0,
            coke_production: 72.0,
            tar_production: 0.0,
            co2_emissions_co: 0.0,
            soc_bfg: 0.5,
            p_bfg: 12.0,
            bfg_supply: 100000.0,
            soc_bofg: 0.5,
            p_bofg: 12.0,
            bofg_supply: 30000.0,
            soc_cog: 0.5,
            p_cog: 12.0,
            cog_supply: 15000.0,
            level_bfg: 0.5,
            level_bofg: 0.5,
            level_cog: 0.5,
            cog_available: 15000.0,
            o2_available: 50000.0,
            peak_electricity: false,
            cog_required: None,
            bof_gas_pressure: None,
            cog_demand: None,
        }
    }
}

/// What the furnace agent reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FurnaceInputs {
    /// Hot-metal silicon [%].
    pub si: f64,
    /// Hot-metal temperature [°C].
    pub t_hot_metal: f64,
    /// BFG holder state of charge.
    pub soc_bfg: f64,
    /// BFG holder pressure [kPa].
    pub p_bfg: f64,
    /// COG on offer [m3/h].
    pub cog_available: f64,
    /// COG needed [m3/h].
    pub cog_required: f64,
    /// Oxygen on offer [m3/h].
    pub o2_available: f64,
    /// High-price period flag.
    pub peak_electricity: bool,
}

impl Default for FurnaceInputs {
    fn default() -> Self {
        Self {
            si: 0.45,
            t_hot_metal: 1500.0,
            soc_bfg: 0.5,
            p_bfg: 12.0,
            cog_available: 10000.0,
            cog_required: 8000.0,
            o2_available: 50000.0,
            peak_electricity: false,
        }
    }
}

impl From<&Observation> for FurnaceInputs {
    fn from(obs: &Observation) -> Self {
        let defaults = Self::default();
        Self {
            si: obs.si,
            t_hot_metal: obs.t_hot_metal,
            soc_bfg: obs.soc_bfg,
            p_bfg: obs.p_bfg,
            cog_available: obs.cog_available,
            cog_required: obs.cog_required.unwrap_or(defaults.cog_required),
            o2_available: obs.o2_available,
            peak_electricity: obs.peak_electricity,
        }
    }
}

/// What the converter agent reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConverterInputs {
    /// Steel temperature [°C].
    pub t_steel: f64,
    /// Converter off-gas pressure [kPa].
    pub gas_pressure: f64,
    /// Current BOFG production [m3/h].
    pub bof_gas_current: f64,
    /// BOFG holder state of charge.
    pub soc_bofg: f64,
    /// BOFG holder pressure [kPa].
    pub p_bofg: f64,
}

impl Default for ConverterInputs {
    fn default() -> Self {
        Self {
            t_steel: 1650.0,
            gas_pressure: 12.0,
            bof_gas_current: 30000.0,
            soc_bofg: 0.5,
            p_bofg: 12.0,
        }
    }
}

impl From<&Observation> for ConverterInputs {
    fn from(obs: &Observation) -> Self {
        let defaults = Self::default();
        Self {
            t_steel: obs.t_steel,
            gas_pressure: obs.bof_gas_pressure.unwrap_or(defaults.gas_pressure),
            bof_gas_current: obs.bofg_supply,
            soc_bofg: obs.soc_bofg,
            p_bofg: obs.p_bofg,
        }
    }
}

/// What the coke-oven agent reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CokeOvenInputs {
    /// Flue temperature [°C].
    pub t_furnace: f64,
    /// COG holder state of charge.
    pub soc_cog: f64,
    /// COG demand [m3/h]. Informational only.
    pub cog_demand: f64,
}

impl Default for CokeOvenInputs {
    fn default() -> Self {
        Self {
            t_furnace: 1200.0,
            soc_cog: 0.5,
            cog_demand: 10000.0,
        }
    }
}

impl From<&Observation> for CokeOvenInputs {
    fn from(obs: &Observation) -> Self {
        let defaults = Self::default();
        Self {
            t_furnace: obs.t_furnace,
            soc_cog: obs.soc_cog,
            cog_demand: obs.cog_demand.unwrap_or(defaults.cog_demand),
        }
    }
}

/// Holder state of charge and pressure, one pair per gas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HolderInputs {
    /// BFG state of charge.
    pub soc_bfg: f64,
    /// BFG pressure [kPa].
    pub p_bfg: f64,
    /// BOFG state of charge.
    pub soc_bofg: f64,
    /// BOFG pressure [kPa].
    pub p_bofg: f64,
    /// COG state of charge.
    pub soc_cog: f64,
    /// COG pressure [kPa].
    pub p_cog: f64,
}

impl Default for HolderInputs {
    fn default() -> Self {
        Self {
            soc_bfg: 0.5,
            p_bfg: 12.0,
            soc_bofg: 0.5,
            p_bofg: 12.0,
            soc_cog: 0.5,
            p_cog: 12.0,
        }
    }
}

impl From<&Observation> for HolderInputs {
    fn from(obs: &Observation) -> Self {
        Self {
            soc_bfg: obs.soc_bfg,
            p_bfg: obs.p_bfg,
            soc_bofg: obs.soc_bofg,
            p_bofg: obs.p_bofg,
            soc_cog: obs.soc_cog,
            p_cog: obs.p_cog,
        }
    }
}
