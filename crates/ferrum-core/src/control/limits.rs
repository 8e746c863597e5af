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

//! The plant-wide safety table.
//!
//! Every bound an agent clamps against lives here. Agents never invent
//! their own literals for hard limits.

use super::rules::Limit;

/// Blast-furnace bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FurnaceLimits {
    /// Hot-blast volume [m3/min].
    pub wind_volume: Limit,
    /// Oxygen enrichment [%].
    pub o2_enrichment: Limit,
    /// Pulverised coal injection [kg/t].
    pub pci: Limit,
    /// Share of coke-oven gas injected into the furnace.
    pub cog_ratio: Limit,
    /// Hot-metal temperature above which the furnace backs off [°C].
    pub hot_metal_temp_max: f64,
    /// Silicon content above which PCI is reduced [%].
    pub si_max: f64,
}

/// Converter bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConverterLimits {
    /// Blown oxygen [m3/h].
    pub oxygen_flow: Limit,
    /// Scrap charged per batch [t/batch].
    pub scrap_steel: Limit,
    /// Steel temperature ceiling [°C].
    pub steel_temp_max: f64,
    /// Off-gas pressure above which blowing is reduced [kPa].
    pub gas_pressure_max: f64,
}

/// Coke-oven bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CokeOvenLimits {
    /// Admissible flue temperature band [°C].
    pub temperature: Limit,
    /// Heating gas input [m3/h].
    pub heating_gas_input: Limit,
    /// Relative pushing rate.
    pub pushing_rate: Limit,
}

/// Gas-holder network bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HolderLimits {
    /// Pressure above which a holder dumps gas at full rate [kPa].
    pub emergency_pressure: f64,
    /// Lowest admissible holder pressure [kPa].
    pub min_pressure: f64,
    /// Physical state-of-charge band.
    pub soc: Limit,
    /// BFG routed to the power plant [m3/h].
    pub bfg_to_power_plant: Limit,
    /// BFG routed to heating [m3/h].
    pub bfg_to_heating: Limit,
    /// BOFG routed to the power plant [m3/h].
    pub bofg_to_power_plant: Limit,
    /// BOFG routed to heating [m3/h].
    pub bofg_to_heating: Limit,
    /// COG routed to heating [m3/h].
    pub cog_to_heating: Limit,
    /// COG routed back to the blast furnace [m3/h].
    pub cog_to_furnace: Limit,
}

/// Hard limits for every unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyLimits {
    /// Blast furnace.
    pub furnace: FurnaceLimits,
    /// Converter.
    pub converter: ConverterLimits,
    /// Coke oven.
    pub coke_oven: CokeOvenLimits,
    /// Gas holders.
    pub gas_holder: HolderLimits,
}

/// The plant's safety table.
pub const SAFETY_LIMITS: SafetyLimits = SafetyLimits {
    furnace: FurnaceLimits {
        wind_volume: Limit::new(1000.0, 8000.0),
        o2_enrichment: Limit::up_to(6.0),
        pci: Limit::up_to(200.0),
        cog_ratio: Limit::up_to(1.0),
        hot_metal_temp_max: 1600.0,
        si_max: 0.8,
    },
    converter: ConverterLimits {
        oxygen_flow: Limit::up_to(60000.0),
        scrap_steel: Limit::up_to(30.0),
        steel_temp_max: 1750.0,
        gas_pressure_max: 15.0,
    },
    coke_oven: CokeOvenLimits {
        temperature: Limit::new(1000.0, 1400.0),
        heating_gas_input: Limit::new(5000.0, 25000.0),
        pushing_rate: Limit::new(0.7, 1.2),
    },
    gas_holder: HolderLimits {
        emergency_pressure: 16.0,
        min_pressure: 8.0,
        soc: Limit::new(0.05, 0.95),
        bfg_to_power_plant: Limit::new(10000.0, 80000.0),
        bfg_to_heating: Limit::new(5000.0, 50000.0),
        bofg_to_power_plant: Limit::new(5000.0, 40000.0),
        bofg_to_heating: Limit::at_least(3000.0),
        cog_to_heating: Limit::new(2000.0, 15000.0),
        cog_to_furnace: Limit::new(1000.0, 10000.0),
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_limit_is_well_formed() {
        let l = SAFETY_LIMITS;
        let all = [
            l.furnace.wind_volume,
            l.furnace.o2_enrichment,
            l.furnace.pci,
            l.furnace.cog_ratio,
            l.converter.oxygen_flow,
            l.converter.scrap_steel,
            l.coke_oven.temperature,
            l.coke_oven.heating_gas_input,
            l.coke_oven.pushing_rate,
            l.gas_holder.soc,
            l.gas_holder.bfg_to_power_plant,
            l.gas_holder.bfg_to_heating,
            l.gas_holder.bofg_to_power_plant,
            l.gas_holder.bofg_to_heating,
            l.gas_holder.cog_to_heating,
            l.gas_holder.cog_to_furnace,
        ];
        for limit in all {
            assert!(limit.min <= limit.max, "{:?}", limit);
        }
        assert!(l.gas_holder.min_pressure < l.gas_holder.emergency_pressure);
    }
}
