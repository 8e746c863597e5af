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
use ferrum_core::twin::{CokeOvenTwin, RecordModel, RecordTwin, TwinError, TwinRecord};

/// Per-tonne-of-coal factors of the coke-oven balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CokeOvenBalance {
    /// Coke yield [t/t].
    pub coke_yield: f64,
    /// COG per tonne of coal [Nm3/t].
    pub cog_per_t: f64,
    /// Tar per tonne of coal [t/t].
    pub tar_per_t: f64,
    /// Ammonia per tonne of coal [t/t].
    pub ammonia_per_t: f64,
    /// CO2 per tonne of coal [t/t].
    pub co2_per_t: f64,
    /// Heat needed per tonne of coal [MJ/t].
    pub heat_per_t: f64,
    /// Power per tonne of coal [kWh/t].
    pub power_per_t: f64,
    /// Steam per tonne of coal [t/t].
    pub steam_per_t: f64,
}

impl Default for CokeOvenBalance {
    fn default() -> Self {
        Self {
            coke_yield: 0.72,
            cog_per_t: 330.0,
            tar_per_t: 0.03,
            ammonia_per_t: 0.003,
            co2_per_t: 0.08,
            heat_per_t: 1500.0,
            power_per_t: 30.0,
            steam_per_t: 0.02,
        }
    }
}

impl RecordModel for CokeOvenBalance {
    fn evaluate(&mut self, inputs: &TwinRecord) -> Result<TwinRecord, TwinError> {
        let coal = input(inputs, COAL_INPUT, 100.0);
        let heating_gas = input(inputs, HEATING_GAS, 15000.0);
        let heating_cv = input(inputs, HEATING_GAS_CALORIFIC_VALUE, 4.5);
        let steam = input(inputs, STEAM, 2.0);
        let power = input(inputs, POWER, 3000.0);

        let heat_required = round2(self.heat_per_t * coal);
        let heat_ratio = if heat_required > 0.0 {
            (heating_gas * heating_cv / heat_required).min(1.0)
        } else {
            0.0
        };
        let mut processed = round2(coal * heat_ratio);

        let steam_required = round2(self.steam_per_t * processed);
        processed = round2(processed * supply_ratio(steam, steam_required));

        let power_required = round2(self.power_per_t * processed);
        processed = round2(processed * supply_ratio(power, power_required));

        let heating_gas_required = if heating_cv > 0.0 {
            round2(self.heat_per_t * processed / heating_cv)
        } else {
            0.0
        };

        Ok(output([
            (COKE_PRODUCTION, round2(processed * self.coke_yield)),
            (COG_PRODUCTION, round2(processed * self.cog_per_t)),
            (COG_CALORIFIC_VALUE, round2(17.5 + 0.005 * processed)),
            (TAR, round2(processed * self.tar_per_t)),
            (AMMONIA_LIQUOR, round2(processed * self.ammonia_per_t)),
            (CO2_EMISSIONS, round2(processed * self.co2_per_t)),
            (HEATING_GAS_REQUIRED, heating_gas_required),
            (STEAM_REQUIRED, round2(self.steam_per_t * processed)),
            (POWER_REQUIRED, round2(self.power_per_t * processed)),
            (COAL_PROCESSED, processed),
        ]))
    }
}

/// The reference coke-oven twin with the standard balance.
pub fn coke_oven_twin() -> CokeOvenTwin {
    Box::new(RecordTwin::new(CokeOvenBalance::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ferrum_core::twin::{CokeOvenTwinInput, IntoRecord, Simulatable};

    fn run(input: CokeOvenTwinInput) -> TwinRecord {
        CokeOvenBalance::default()
            .evaluate(&input.to_record())
            .unwrap()
    }

    #[test]
    fn test_heating_gas_limits_throughput() {
        // 15000 Nm3/h at 4.5 MJ/Nm3 covers 45 % of the 150 000 MJ needed.
        let out = run(CokeOvenTwinInput::default());
        assert_relative_eq!(out[COAL_PROCESSED], 45.0, epsilon = 1e-9);
        assert_relative_eq!(out[COKE_PRODUCTION], 32.4, epsilon = 1e-9);
        assert_relative_eq!(out[COG_PRODUCTION], 14850.0, epsilon = 1e-9);
        assert_relative_eq!(out[HEATING_GAS_REQUIRED], 15000.0, epsilon = 1e-9);
        assert_relative_eq!(out[POWER_REQUIRED], 1350.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rich_gas_runs_full_charge() {
        let out = run(CokeOvenTwinInput {
            heating_gas_calorific_value: 17.5,
            heating_gas: 10000.0,
            ..Default::default()
        });
        assert_relative_eq!(out[COAL_PROCESSED], 100.0, epsilon = 1e-9);
        assert_relative_eq!(out[COG_PRODUCTION], 33000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_steam_shortage_scales_output() {
        let out = run(CokeOvenTwinInput {
            heating_gas_calorific_value: 17.5,
            heating_gas: 10000.0,
            steam: 1.0,
            ..Default::default()
        });
        assert_relative_eq!(out[COAL_PROCESSED], 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_no_coal_no_output() {
        let out = run(CokeOvenTwinInput {
            coal_input: 0.0,
            ..Default::default()
        });
        assert_eq!(out[COAL_PROCESSED], 0.0);
        assert_eq!(out[COG_PRODUCTION], 0.0);
    }

    #[test]
    fn test_typed_twin() {
        let mut twin = coke_oven_twin();
        let out = twin.step(&CokeOvenTwinInput::default()).unwrap();
        assert_relative_eq!(out.cog_production, 14850.0, epsilon = 1e-9);
        assert_relative_eq!(out.co2_emissions, 3.6, epsilon = 1e-9);
    }
}
