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

//! Maps agent setpoints onto twin inputs, and twin outputs back onto the
//! observation.
//!
//! Inputs the agents do not control take the twin's nominal charge.

use ferrum_core::agent::{CokeOvenControl, ConverterControl, FurnaceControl};
use ferrum_core::twin::{
    CokeOvenTwinInput, CokeOvenTwinOutput, ConverterTwinInput, ConverterTwinOutput,
    FurnaceTwinInput, FurnaceTwinOutput,
};
use ferrum_core::Observation;

/// Largest hot-metal charge the converter takes per step [t/h].
pub const MAX_CONVERTER_CHARGE: f64 = 80.0;

/// Oxygen share of air.
const AIR_O2_FRACTION: f64 = 0.21;

/// Ratio between injected coal and the coke it replaces.
const PCI_COKE_EQUIVALENT: f64 = 1.5;

// ── Setpoints to twin inputs ──

/// Furnace twin input from the furnace setpoints.
///
/// Coke follows the coal injection, oxygen is the air share of the hot
/// blast per hour, and the COG injected is whatever the network offers.
pub fn furnace_input(control: &FurnaceControl, obs: &Observation) -> FurnaceTwinInput {
    FurnaceTwinInput {
        coke_mass_flow: control.pci / PCI_COKE_EQUIVALENT,
        oxygen: AIR_O2_FRACTION * control.wind_volume * 60.0,
        wind_volume: control.wind_volume,
        coke_gas_flow: obs.cog_available,
        ..Default::default()
    }
}

/// Converter twin input from the converter setpoints.
///
/// The converter taps one batch per hour, so the scrap setpoint in t/batch
/// is charged as t/h.
pub fn converter_input(control: &ConverterControl, obs: &Observation) -> ConverterTwinInput {
    ConverterTwinInput {
        pig_iron: obs.pig_iron_production.min(MAX_CONVERTER_CHARGE),
        scrap_steel: control.scrap_steel,
        oxygen: control.oxygen_flow,
        lime: 5.0,
        power: 5000.0,
    }
}

/// Coke-oven twin input from the coke-oven setpoints.
pub fn coke_oven_input(control: &CokeOvenControl) -> CokeOvenTwinInput {
    CokeOvenTwinInput {
        heating_gas: control.heating_gas_input,
        ..Default::default()
    }
}

// ── Twin outputs to observation ──

/// Folds a furnace twin output into the observation.
pub fn apply_furnace_output(obs: &mut Observation, out: &FurnaceTwinOutput) {
    obs.pig_iron_production = out.pig_iron_steelworks;
    obs.bfg_supply = out.bf_gas_total_flow;
    obs.co2_emissions_bf = out.total_co2_mass_flow;
    obs.slag_bf = out.slag_mass_flow;
    obs.electricity_own_bf = out.electricity_own;
    obs.t_hot_metal = out.t_hot_metal;
    obs.si = out.si_content;
}

/// Folds a converter twin output into the observation.
///
/// The steel temperature is not modelled by the twin and is held at tap
/// temperature.
pub fn apply_converter_output(obs: &mut Observation, out: &ConverterTwinOutput) {
    obs.liquid_steel = out.liquid_steel;
    obs.bofg_supply = out.bof_gas;
    obs.co2_emissions_bof = out.co2_emissions;
    obs.t_steel = 1650.0;
}

/// Folds a coke-oven twin output into the observation.
///
/// All COG produced is offered to the furnace.
pub fn apply_coke_oven_output(obs: &mut Observation, out: &CokeOvenTwinOutput) {
    obs.coke_production = out.coke_production;
    obs.cog_supply = out.cog_production;
    obs.cog_available = out.cog_production;
    obs.tar_production = out.tar;
    obs.co2_emissions_co = out.co2_emissions;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_furnace_input() {
        let control = FurnaceControl {
            wind_volume: 4000.0,
            pci: 150.0,
            ..Default::default()
        };
        let obs = Observation {
            cog_available: 12000.0,
            ..Default::default()
        };
        let input = furnace_input(&control, &obs);
        assert_relative_eq!(input.coke_mass_flow, 100.0, epsilon = 1e-9);
        assert_relative_eq!(input.oxygen, 50400.0, epsilon = 1e-9);
        assert_eq!(input.coke_gas_flow, 12000.0);
        assert_eq!(input.ore, FurnaceTwinInput::default().ore);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_converter_charge_is_capped() {
        let obs = Observation {
            pig_iron_production: 200.0,
            ..Default::default()
        };
        let input = converter_input(&ConverterControl::default(), &obs);
        assert_eq!(input.pig_iron, 80.0);
        assert_eq!(input.scrap_steel, 20.0);
        assert_eq!(input.oxygen, 45000.0);

        let obs = Observation {
            pig_iron_production: 60.0,
            ..Default::default()
        };
        assert_eq!(converter_input(&ConverterControl::default(), &obs).pig_iron, 60.0);
    }

    #[test]
    fn test_coke_oven_input() {
        let control = CokeOvenControl {
            heating_gas_input: 18000.0,
            ..Default::default()
        };
        let input = coke_oven_input(&control);
        assert_eq!(input.heating_gas, 18000.0);
        assert_eq!(input.coal_input, 100.0);
        assert_eq!(input.heating_gas_calorific_value, 4.5);
    }

    #[test]
    fn test_outputs_fold_into_observation() {
        let mut obs = Observation::default();
        apply_converter_output(
            &mut obs,
            &ConverterTwinOutput {
                liquid_steel: 90.0,
                bof_gas: 5400.0,
                co2_emissions: 13.5,
                slag: 0.0,
            },
        );
        apply_coke_oven_output(
            &mut obs,
            &CokeOvenTwinOutput {
                coke_production: 32.4,
                cog_production: 14850.0,
                tar: 1.35,
                ammonia_liquor: 0.14,
                co2_emissions: 3.6,
            },
        );
        assert_eq!(obs.bofg_supply, 5400.0);
        assert_eq!(obs.t_steel, 1650.0);
        assert_eq!(obs.cog_supply, 14850.0);
        assert_eq!(obs.cog_available, 14850.0);
        assert_eq!(obs.tar_production, 1.35);
    }
}
