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

use super::{input, output, round2, supply_ratio};
use ferrum_core::twin::labels::*;
use ferrum_core::twin::{ConverterTwin, RecordModel, RecordTwin, TwinError, TwinRecord};

/// Per-tonne factors of the converter balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConverterBalance {
    /// Steel yield from hot metal and scrap.
    pub metal_yield: f64,
    /// Oxygen per tonne of steel [Nm3/t].
    pub oxygen_per_t: f64,
    /// Lime per tonne of steel [kg/t].
    pub lime_per_t: f64,
    /// Power per tonne of steel [kWh/t].
    pub power_per_t: f64,
    /// Slag per tonne of steel [t/t].
    pub slag_per_t: f64,
    /// BOFG per tonne of steel [Nm3/t].
    pub gas_per_t: f64,
    /// CO2 per tonne of steel [t/t].
    pub co2_per_t: f64,
}

impl Default for ConverterBalance {
    fn default() -> Self {
        Self {
            metal_yield: 0.95,
            oxygen_per_t: 50.0,
            lime_per_t: 50.0,
            power_per_t: 50.0,
            slag_per_t: 0.15,
            gas_per_t: 60.0,
            co2_per_t: 0.15,
        }
    }
}

impl RecordModel for ConverterBalance {
    fn evaluate(&mut self, inputs: &TwinRecord) -> Result<TwinRecord, TwinError> {
        let pig_iron = input(inputs, PIG_IRON, 80.0);
        let scrap = input(inputs, SCRAP_STEEL, 20.0);
        let oxygen = input(inputs, BOF_OXYGEN, 5000.0);
        let lime = input(inputs, LIME, 5.0);
        let power = input(inputs, POWER, 5000.0);

        let mut steel = round2((pig_iron + scrap) * self.metal_yield);

        let oxygen_required = round2(self.oxygen_per_t * steel);
        steel = round2(steel * supply_ratio(oxygen, oxygen_required));

        let lime_required = round2(self.lime_per_t * steel / 1000.0);
        steel = round2(steel * supply_ratio(lime, lime_required));

        let power_required = round2(self.power_per_t * steel);
        steel = round2(steel * supply_ratio(power, power_required));

        Ok(output([
            (LIQUID_STEEL, steel),
            (BOF_SLAG, round2(self.slag_per_t * steel)),
            (BOF_GAS, round2(self.gas_per_t * steel)),
            (BOF_GAS_CALORIFIC_VALUE, round2(8.0 + 0.01 * steel)),
            (CO2_EMISSIONS, round2(self.co2_per_t * steel)),
            (OXYGEN_REQUIRED, round2(self.oxygen_per_t * steel)),
            (POWER_REQUIRED, round2(self.power_per_t * steel)),
            (LIME_REQUIRED, round2(self.lime_per_t * steel / 1000.0)),
        ]))
    }
}

/// The reference converter twin with the standard balance.
pub fn converter_twin() -> ConverterTwin {
    Box::new(RecordTwin::new(ConverterBalance::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ferrum_core::twin::{ConverterTwinInput, IntoRecord, Simulatable};

    fn run(input: ConverterTwinInput) -> TwinRecord {
        ConverterBalance::default()
            .evaluate(&input.to_record())
            .unwrap()
    }

    #[test]
    fn test_fully_supplied_heat() {
        let out = run(ConverterTwinInput::default());
        assert_relative_eq!(out[LIQUID_STEEL], 95.0, epsilon = 1e-9);
        assert_relative_eq!(out[BOF_GAS], 5700.0, epsilon = 1e-9);
        assert_relative_eq!(out[BOF_SLAG], 14.25, epsilon = 1e-9);
        assert_relative_eq!(out[OXYGEN_REQUIRED], 4750.0, epsilon = 1e-9);
        assert_relative_eq!(out[LIME_REQUIRED], 4.75, epsilon = 1e-9);
    }

    #[test]
    fn test_oxygen_shortage_scales_output() {
        let out = run(ConverterTwinInput {
            oxygen: 2375.0,
            ..Default::default()
        });
        assert_relative_eq!(out[LIQUID_STEEL], 47.5, epsilon = 1e-9);
        assert_relative_eq!(out[BOF_GAS], 2850.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_charge_produces_nothing() {
        let out = run(ConverterTwinInput {
            pig_iron: 0.0,
            scrap_steel: 0.0,
            ..Default::default()
        });
        assert_eq!(out[LIQUID_STEEL], 0.0);
        assert_eq!(out[BOF_GAS_CALORIFIC_VALUE], 8.0);
    }

    #[test]
    fn test_typed_twin_leaves_slag_unset() {
        let mut twin = converter_twin();
        let out = twin.step(&ConverterTwinInput::default()).unwrap();
        assert_relative_eq!(out.liquid_steel, 95.0, epsilon = 1e-9);
        assert_relative_eq!(out.co2_emissions, 14.25, epsilon = 1e-9);
        assert_eq!(out.slag, 0.0);
    }
}
