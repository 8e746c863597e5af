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
use ferrum_core::twin::{FurnaceTwin, RecordModel, RecordTwin, TwinError, TwinRecord};

/// Per-tonne-of-pig-iron factors and thermal coefficients of the furnace balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FurnaceBalance {
    /// Coke per tonne of pig iron [kg/t].
    pub coke_per_t: f64,
    /// COG energy per tonne of pig iron [MJ/t].
    pub cog_energy_per_t: f64,
    /// Power per tonne of pig iron [kWh/t].
    pub power_per_t: f64,
    /// Oxygen per tonne of pig iron [Nm3/t].
    pub oxygen_per_t: f64,
    /// Most COG the blast can burn per Nm3 of wind.
    pub cog_per_wind: f64,
    /// BFG per Nm3 of wind.
    pub bfg_per_wind: f64,
    /// BFG produced independently of the blast [m3/h].
    pub bfg_base: f64,
    /// Heat index at the nominal operating point.
    pub baseline_heat: f64,
}

impl Default for FurnaceBalance {
    fn default() -> Self {
        Self {
            coke_per_t: 500.0,
            cog_energy_per_t: 1000.0,
            power_per_t: 100.0,
            oxygen_per_t: 100.0,
            cog_per_wind: 5.0,
            bfg_per_wind: 0.4,
            bfg_base: 20000.0,
            baseline_heat: 5000.0,
        }
    }
}

/// Oxygen share of air.
const AIR_O2_FRACTION: f64 = 0.21;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// `min(available, required) / required`, or 1 when nothing more is required.
fn demand_ratio(available: f64, required: f64) -> f64 {
    if required > 0.0 {
        available.min(required) / required
    } else {
        1.0
    }
}

impl RecordModel for FurnaceBalance {
    fn evaluate(&mut self, inputs: &TwinRecord) -> Result<TwinRecord, TwinError> {
        let ore = input(inputs, ORE, 50.0);
        let pellets = input(inputs, PELLETS, 100.0);
        let sinter = input(inputs, SINTER, 100.0);
        let coke = input(inputs, COKE_MASS_FLOW, 100.0);
        let cog_flow = input(inputs, COKE_GAS_FLOW, 20000.0);
        let cog_cv = input(inputs, COKE_GAS_CALORIFIC_VALUE, 20.0);
        let power = input(inputs, BF_POWER, 50000.0);
        let wind = input(inputs, WIND_VOLUME, 4000.0);
        let enrichment = input(inputs, OXYGEN_ENRICHMENT, 0.0);
        let shares = [
            input(inputs, INTERN_BFG_SHARE, 50.0),
            input(inputs, POWER_PLANT_BFG_SHARE, 20.0),
            input(inputs, SLAB_HEAT_BFG_SHARE, 20.0),
            input(inputs, COKE_PLANT_BFG_SHARE, 10.0),
        ];

        // Oxygen comes from the blast itself plus any enrichment.
        let wind_hourly = wind * 60.0;
        let oxygen = AIR_O2_FRACTION * wind_hourly + enrichment;

        let burden = ore + pellets + sinter;

        let coke_required = round2(self.coke_per_t * round2(burden) / 1000.0);
        let coke_used = coke.min(coke_required);
        let coke_ratio = supply_ratio(coke, coke_required);
        let pig_coke = round2(burden * coke_ratio);

        let electricity_own = round2(10.0 * pig_coke + 5000.0);
        let power_required = round2(self.power_per_t * pig_coke - electricity_own);
        let power_ratio = demand_ratio(power, power_required);
        let pig_power = round2(burden * coke_ratio * power_ratio);

        let oxygen_required = round2(self.oxygen_per_t * pig_power);
        let oxygen_ratio = supply_ratio(oxygen, oxygen_required);

        let cog_energy_required = round2(pig_power * self.cog_energy_per_t);
        let cog_used = (cog_flow * cog_cv)
            .min(cog_energy_required)
            .min(wind_hourly * self.cog_per_wind);
        let cog_ratio = demand_ratio(cog_used, cog_energy_required);

        let mut pig_iron =
            round2(burden * coke_ratio * power_ratio * oxygen_ratio * cog_ratio);

        let heat = wind * 0.3 + cog_used * 0.001 + coke_used * 15.0;
        let mut t_hot_metal =
            round1(1450.0 + (heat - self.baseline_heat) * 0.05).clamp(1400.0, 1550.0);
        let mut si = round3(0.5 - (t_hot_metal - 1500.0) * 0.002).clamp(0.2, 0.8);

        let mut bfg_total = round2(self.bfg_per_wind * wind_hourly + self.bfg_base);
        let mut split = shares.map(|share| round2(share / 100.0 * bfg_total));
        let mut co2 = round2(bfg_total / 1000.0 + cog_flow);
        let mut electricity_own = electricity_own;
        let mut power_required = power_required;
        let mut oxygen_required = oxygen_required;

        // A split that does not close zeroes the whole furnace.
        if (shares.iter().sum::<f64>() - 100.0).abs() > 0.01 {
            pig_iron = 0.0;
            bfg_total = 0.0;
            split = [0.0; 4];
            co2 = 0.0;
            electricity_own = 0.0;
            power_required = 0.0;
            oxygen_required = 0.0;
            t_hot_metal = 0.0;
            si = 0.0;
        }

        let [intern, power_plant, slab_heat, coke_plant] = split;
        Ok(output([
            (PIG_IRON_STEELWORKS, pig_iron),
            (BFG_POWER_PLANT, power_plant),
            (BFG_INTERN, intern),
            (BFG_SLAB_HEAT, slab_heat),
            (BFG_COKE_PLANT, coke_plant),
            (BF_CO2, co2),
            (BF_SLAG, pig_iron),
            (BF_ELECTRICITY_OWN, electricity_own),
            (POWER_REQUIRED, power_required),
            (OXYGEN_REQUIRED, oxygen_required),
            (BFG_CALORIFIC_VALUE, round2(0.01 * pig_iron)),
            (BFG_TOTAL_FLOW, bfg_total),
            (T_HOT_METAL, t_hot_metal),
            (SI, si),
        ]))
    }
}

/// The reference blast-furnace twin with the standard balance.
pub fn furnace_twin() -> FurnaceTwin {
    Box::new(RecordTwin::new(FurnaceBalance::default()))
}
