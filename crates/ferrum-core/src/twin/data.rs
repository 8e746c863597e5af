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

//! Typed twin inputs and outputs.

use super::{FromRecord, IntoRecord, TwinRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Record labels used by the plant's twins.
pub mod labels {
    #![allow(missing_docs)]

    // Blast furnace, in.
    pub const ORE: &str = "ore [t/h]";
    pub const PELLETS: &str = "pellets [t/h]";
    pub const SINTER: &str = "sinter [t/h]";
    pub const COKE_MASS_FLOW: &str = "coke_mass_flow_bf4 [t/h]";
    pub const COKE_GAS_FLOW: &str = "coke_gas_coke_plant_bf4 [m³/h]";
    pub const COKE_GAS_CALORIFIC_VALUE: &str = "calorific_value_coke_gas_bf4 [MJ/m³]";
    pub const BF_POWER: &str = "power [kWh/h]";
    pub const BF_OXYGEN: &str = "oxygen [m³/h]";
    pub const WIND_VOLUME: &str = "wind_volume [Nm³/min]";
    pub const OXYGEN_ENRICHMENT: &str = "oxygen_enrichment [Nm³/h]";
    pub const INTERN_BFG_SHARE: &str = "intern BF_GAS_PERCENTAGE [%]";
    pub const POWER_PLANT_BFG_SHARE: &str = "power plant BF_GAS_PERCENTAGE [%]";
    pub const SLAB_HEAT_BFG_SHARE: &str = "slab heat furnace BF_GAS_PERCENTAGE [%]";
    pub const COKE_PLANT_BFG_SHARE: &str = "coke plant BF_GAS_PERCENTAGE [%]";

    // Blast furnace, out.
    pub const PIG_IRON_STEELWORKS: &str = "pig_iron_bf4_steelworks [t/h]";
    pub const BFG_POWER_PLANT: &str = "bf_gas_bf4_power_plant [m³/h]";
    pub const BFG_INTERN: &str = "bf_gas_bf4_intern [m³/h]";
    pub const BFG_SLAB_HEAT: &str = "bf_gas_bf4_slab_heat [m³/h]";
    pub const BFG_COKE_PLANT: &str = "bf_gas_bf4_coke_plant [m³/h]";
    pub const BF_CO2: &str = "bf4_total_co2_mass_flow [t/h]";
    pub const BF_SLAG: &str = "bf4_slag_mass_flow [t/h]";
    pub const BF_ELECTRICITY_OWN: &str = "bf4_electricity_own [kW]";
    pub const POWER_REQUIRED: &str = "power_required [kWh/h]";
    pub const OXYGEN_REQUIRED: &str = "oxygen_required [Nm³/h]";
    pub const BFG_CALORIFIC_VALUE: &str = "bf_gas_bf4_calorific_value [MJ/m³]";
    pub const BFG_TOTAL_FLOW: &str = "bf_gas_total_flow [m³/h]";
    pub const T_HOT_METAL: &str = "T_hot_metal [°C]";
    pub const SI: &str = "Si [%]";

    // Converter.
    pub const PIG_IRON: &str = "pig_iron [t/h]";
    pub const SCRAP_STEEL: &str = "scrap_steel [t/h]";
    pub const BOF_OXYGEN: &str = "oxygen [Nm³/h]";
    pub const LIME: &str = "lime [t/h]";
    pub const POWER: &str = "power [kWh/h]";
    pub const LIQUID_STEEL: &str = "liquid_steel [t/h]";
    pub const BOF_GAS: &str = "bof_gas [Nm³/h]";
    pub const BOF_GAS_CALORIFIC_VALUE: &str = "bof_gas_calorific_value [MJ/Nm³]";
    pub const CO2_EMISSIONS: &str = "co2_emissions [t/h]";
    /// Read by [`ConverterTwinOutput`](super::ConverterTwinOutput).
    pub const SLAG: &str = "slag [t/h]";
    /// Written by the reference converter twin.
    pub const BOF_SLAG: &str = "bof_slag [t/h]";
    pub const LIME_REQUIRED: &str = "lime_required [t/h]";

    // Coke oven.
    pub const COAL_INPUT: &str = "coal_input [t/h]";
    pub const HEATING_GAS: &str = "heating_gas [Nm³/h]";
    pub const HEATING_GAS_CALORIFIC_VALUE: &str = "heating_gas_calorific_value [MJ/Nm³]";
    pub const STEAM: &str = "steam [t/h]";
    pub const COKE_PRODUCTION: &str = "coke_production [t/h]";
    pub const COG_PRODUCTION: &str = "cog_production [Nm³/h]";
    pub const COG_CALORIFIC_VALUE: &str = "cog_calorific_value [MJ/Nm³]";
    pub const TAR: &str = "tar [t/h]";
    pub const AMMONIA_LIQUOR: &str = "ammonia_liquor [t/h]";
    pub const HEATING_GAS_REQUIRED: &str = "heating_gas_required [Nm³/h]";
    pub const STEAM_REQUIRED: &str = "steam_required [t/h]";
    pub const COAL_PROCESSED: &str = "coal_processed [t/h]";

    // Holder models.
    pub const GAS_NET_FLOW: &str = "gas_net_flow";
    pub const LEVEL: &str = "level";
}

use labels::*;

fn read(record: &TwinRecord, label: &str, default: f64) -> f64 {
    record.get(label).copied().unwrap_or(default)
}

fn record<const N: usize>(entries: [(&str, f64); N]) -> TwinRecord {
    entries
        .into_iter()
        .map(|(label, value)| (label.to_string(), value))
        .collect()
}

/// Why a typed twin input was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputIssue {
    /// The furnace gas distribution does not add up to 100 %.
    #[error("gas distribution sums to {sum:.2}%, expected 100%")]
    DistributionSum {
        /// The actual sum.
        sum: f64,
    },
    /// A flow that must be non-negative is negative.
    #[error("'{field}' must be non-negative, got {value}")]
    Negative {
        /// The offending field.
        field: &'static str,
        /// Its value.
        value: f64,
    },
}

fn non_negative(fields: &[(&'static str, f64)]) -> Result<(), InputIssue> {
    match fields.iter().find(|(_, value)| *value < 0.0) {
        Some(&(field, value)) => Err(InputIssue::Negative { field, value }),
        None => Ok(()),
    }
}

// ── Blast furnace ──

/// Where the furnace's top gas goes, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasDistribution {
    /// Consumed by the furnace itself.
    pub intern: f64,
    /// To the power plant.
    pub power_plant: f64,
    /// To the slab reheating furnace.
    pub slab_heat_furnace: f64,
    /// To the coke plant.
    pub coke_plant: f64,
}

impl GasDistribution {
    /// Sum of all shares.
    pub fn total(&self) -> f64 {
        self.intern + self.power_plant + self.slab_heat_furnace + self.coke_plant
    }
}

impl Default for GasDistribution {
    fn default() -> Self {
        Self {
            intern: 50.0,
            power_plant: 20.0,
            slab_heat_furnace: 20.0,
            coke_plant: 10.0,
        }
    }
}

/// Blast-furnace twin input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FurnaceTwinInput {
    /// Lump ore [t/h].
    pub ore: f64,
    /// Pellets [t/h].
    pub pellets: f64,
    /// Sinter [t/h].
    pub sinter: f64,
    /// Coke [t/h].
    pub coke_mass_flow: f64,
    /// COG injected [m3/h].
    pub coke_gas_flow: f64,
    /// COG calorific value [MJ/m3].
    pub calorific_value_coke_gas: f64,
    /// Electrical power [kWh/h].
    pub power: f64,
    /// Oxygen [m3/h].
    pub oxygen: f64,
    /// Hot-blast volume [Nm3/min].
    pub wind_volume: f64,
    /// Top-gas split.
    pub gas_distribution: GasDistribution,
}

impl Default for FurnaceTwinInput {
    fn default() -> Self {
        Self {
            ore: 50.0,
            pellets: 100.0,
            sinter: 100.0,
            coke_mass_flow: 100.0,
            coke_gas_flow: 20000.0,
            calorific_value_coke_gas: 20.0,
            power: 50000.0,
            oxygen: 50400.0,
            wind_volume: 4000.0,
            gas_distribution: GasDistribution::default(),
        }
    }
}

impl FurnaceTwinInput {
    /// Checks the distribution sums to 100 % (within 0.01) and the feed flows are non-negative.
    pub fn validate(&self) -> Result<(), InputIssue> {
        let sum = self.gas_distribution.total();
        if (sum - 100.0).abs() > 0.01 {
            return Err(InputIssue::DistributionSum { sum });
        }
        non_negative(&[
            ("ore", self.ore),
            ("pellets", self.pellets),
            ("sinter", self.sinter),
            ("coke_mass_flow", self.coke_mass_flow),
            ("coke_gas_flow", self.coke_gas_flow),
            ("power", self.power),
            ("oxygen", self.oxygen),
        ])
    }
}

impl IntoRecord for FurnaceTwinInput {
    fn to_record(&self) -> TwinRecord {
        let d = &self.gas_distribution;
        record([
            (ORE, self.ore),
            (PELLETS, self.pellets),
            (SINTER, self.sinter),
            (COKE_MASS_FLOW, self.coke_mass_flow),
            (COKE_GAS_FLOW, self.coke_gas_flow),
            (COKE_GAS_CALORIFIC_VALUE, self.calorific_value_coke_gas),
            (BF_POWER, self.power),
            (BF_OXYGEN, self.oxygen),
            (WIND_VOLUME, self.wind_volume),
            (INTERN_BFG_SHARE, d.intern),
            (POWER_PLANT_BFG_SHARE, d.power_plant),
            (SLAB_HEAT_BFG_SHARE, d.slab_heat_furnace),
            (COKE_PLANT_BFG_SHARE, d.coke_plant),
        ])
    }
}

/// Blast-furnace twin output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FurnaceTwinOutput {
    /// Pig iron to the steelworks [t/h].
    pub pig_iron_steelworks: f64,
    /// BFG to the power plant [m3/h].
    pub bf_gas_power_plant: f64,
    /// BFG used internally [m3/h].
    pub bf_gas_intern: f64,
    /// BFG to slab heating [m3/h].
    pub bf_gas_slab_heat: f64,
    /// BFG to the coke plant [m3/h].
    pub bf_gas_coke_plant: f64,
    /// CO2 [t/h].
    pub total_co2_mass_flow: f64,
    /// Slag [t/h].
    pub slag_mass_flow: f64,
    /// Own electricity generation [kW].
    pub electricity_own: f64,
    /// Power drawn [kWh/h].
    pub power_required: f64,
    /// Oxygen drawn [Nm3/h].
    pub oxygen_required: f64,
    /// BFG calorific value [MJ/m3].
    pub bf_gas_calorific_value: f64,
    /// Total BFG produced [m3/h].
    pub bf_gas_total_flow: f64,
    /// Hot-metal temperature [°C].
    pub t_hot_metal: f64,
    /// Hot-metal silicon [%].
    pub si_content: f64,
}

impl FromRecord for FurnaceTwinOutput {
    fn from_record(r: &TwinRecord) -> Self {
        Self {
            pig_iron_steelworks: read(r, PIG_IRON_STEELWORKS, 0.0),
            bf_gas_power_plant: read(r, BFG_POWER_PLANT, 0.0),
            bf_gas_intern: read(r, BFG_INTERN, 0.0),
            bf_gas_slab_heat: read(r, BFG_SLAB_HEAT, 0.0),
            bf_gas_coke_plant: read(r, BFG_COKE_PLANT, 0.0),
            total_co2_mass_flow: read(r, BF_CO2, 0.0),
            slag_mass_flow: read(r, BF_SLAG, 0.0),
            electricity_own: read(r, BF_ELECTRICITY_OWN, 0.0),
            power_required: read(r, POWER_REQUIRED, 0.0),
            oxygen_required: read(r, OXYGEN_REQUIRED, 0.0),
            bf_gas_calorific_value: read(r, BFG_CALORIFIC_VALUE, 0.0),
            bf_gas_total_flow: read(r, BFG_TOTAL_FLOW, 0.0),
            t_hot_metal: read(r, T_HOT_METAL, 1500.0),
            si_content: read(r, SI, 0.5),
        }
    }
}

// ── Converter ──

/// Converter twin input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConverterTwinInput {
    /// Hot metal charged [t/h].
    pub pig_iron: f64,
    /// Scrap charged [t/h].
    pub scrap_steel: f64,
    /// Oxygen blown [Nm3/h].
    pub oxygen: f64,
    /// Lime flux [t/h].
    pub lime: f64,
    /// Electrical power [kWh/h].
    pub power: f64,
}

impl Default for ConverterTwinInput {
    fn default() -> Self {
        Self {
            pig_iron: 80.0,
            scrap_steel: 20.0,
            oxygen: 45000.0,
            lime: 5.0,
            power: 5000.0,
        }
    }
}

impl ConverterTwinInput {
    /// Every field must be non-negative.
    pub fn validate(&self) -> Result<(), InputIssue> {
        non_negative(&[
            ("pig_iron", self.pig_iron),
            ("scrap_steel", self.scrap_steel),
            ("oxygen", self.oxygen),
            ("lime", self.lime),
            ("power", self.power),
        ])
    }
}

impl IntoRecord for ConverterTwinInput {
    fn to_record(&self) -> TwinRecord {
        record([
            (PIG_IRON, self.pig_iron),
            (SCRAP_STEEL, self.scrap_steel),
            (BOF_OXYGEN, self.oxygen),
            (LIME, self.lime),
            (POWER, self.power),
        ])
    }
}

/// Converter twin output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConverterTwinOutput {
    /// Liquid steel [t/h].
    pub liquid_steel: f64,
    /// BOFG produced [Nm3/h].
    pub bof_gas: f64,
    /// CO2 [t/h].
    pub co2_emissions: f64,
    /// Slag [t/h]. Read from [`labels::SLAG`], which the reference
    /// converter twin does not write, so it stays 0 with that twin.
    pub slag: f64,
}

impl FromRecord for ConverterTwinOutput {
    fn from_record(r: &TwinRecord) -> Self {
        Self {
            liquid_steel: read(r, LIQUID_STEEL, 0.0),
            bof_gas: read(r, BOF_GAS, 0.0),
            co2_emissions: read(r, CO2_EMISSIONS, 0.0),
            slag: read(r, SLAG, 0.0),
        }
    }
}

// ── Coke oven ──

/// Coke-oven twin input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CokeOvenTwinInput {
    /// Coal charged [t/h].
    pub coal_input: f64,
    /// Heating gas [Nm3/h].
    pub heating_gas: f64,
    /// Heating gas calorific value [MJ/Nm3].
    pub heating_gas_calorific_value: f64,
    /// Steam [t/h].
    pub steam: f64,
    /// Electrical power [kWh/h].
    pub power: f64,
}

impl Default for CokeOvenTwinInput {
    fn default() -> Self {
        Self {
            coal_input: 100.0,
            heating_gas: 15000.0,
            heating_gas_calorific_value: 4.5,
            steam: 2.0,
            power: 3000.0,
        }
    }
}

impl CokeOvenTwinInput {
    /// Every field must be non-negative.
    pub fn validate(&self) -> Result<(), InputIssue> {
        non_negative(&[
            ("coal_input", self.coal_input),
            ("heating_gas", self.heating_gas),
            (
                "heating_gas_calorific_value",
                self.heating_gas_calorific_value,
            ),
            ("steam", self.steam),
            ("power", self.power),
        ])
    }
}

impl IntoRecord for CokeOvenTwinInput {
    fn to_record(&self) -> TwinRecord {
        record([
            (COAL_INPUT, self.coal_input),
            (HEATING_GAS, self.heating_gas),
            (HEATING_GAS_CALORIFIC_VALUE, self.heating_gas_calorific_value),
            (STEAM, self.steam),
            (POWER, self.power),
        ])
    }
}

/// Coke-oven twin output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CokeOvenTwinOutput {
    /// Coke [t/h].
    pub coke_production: f64,
    /// COG [Nm3/h].
    pub cog_production: f64,
    /// Tar [t/h].
    pub tar: f64,
    /// Ammonia liquor [t/h].
    pub ammonia_liquor: f64,
    /// CO2 [t/h].
    pub co2_emissions: f64,
}

impl FromRecord for CokeOvenTwinOutput {
    fn from_record(r: &TwinRecord) -> Self {
        Self {
            coke_production: read(r, COKE_PRODUCTION, 0.0),
            cog_production: read(r, COG_PRODUCTION, 0.0),
            tar: read(r, TAR, 0.0),
            ammonia_liquor: read(r, AMMONIA_LIQUOR, 0.0),
            co2_emissions: read(r, CO2_EMISSIONS, 0.0),
        }
    }
}

// ── Gas holders ──

/// Holder model input.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HolderInput {
    /// Production minus consumption [Nm3/h].
    pub gas_net_flow: f64,
}

impl IntoRecord for HolderInput {
    fn to_record(&self) -> TwinRecord {
        record([(GAS_NET_FLOW, self.gas_net_flow)])
    }
}

/// Holder model output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HolderOutput {
    /// Refined holder level.
    pub level: f64,
}

impl FromRecord for HolderOutput {
    fn from_record(r: &TwinRecord) -> Self {
        Self {
            level: read(r, LEVEL, 0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_furnace_defaults_validate() {
        assert_eq!(FurnaceTwinInput::default().validate(), Ok(()));
    }

    #[test]
    fn test_furnace_distribution_must_sum_to_100() {
        let mut input = FurnaceTwinInput::default();
        input.gas_distribution.coke_plant = 15.0;
        assert_eq!(
            input.validate(),
            Err(InputIssue::DistributionSum { sum: 105.0 })
        );

        input.gas_distribution.coke_plant = 10.005;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_negative_flow_is_named() {
        let input = ConverterTwinInput {
            lime: -1.0,
            ..Default::default()
        };
        assert_eq!(
            input.validate(),
            Err(InputIssue::Negative {
                field: "lime",
                value: -1.0
            })
        );
        let oven = CokeOvenTwinInput {
            steam: -0.5,
            ..Default::default()
        };
        assert!(oven.validate().is_err());
    }

    #[test]
    fn test_furnace_output_defaults_for_missing_labels() {
        let output = FurnaceTwinOutput::from_record(&TwinRecord::new());
        assert_eq!(output.t_hot_metal, 1500.0);
        assert_eq!(output.si_content, 0.5);
        assert_eq!(output.bf_gas_total_flow, 0.0);
    }

    #[test]
    fn test_converter_slag_reads_its_own_label_only() {
        let r = record([(BOF_SLAG, 12.0), (LIQUID_STEEL, 80.0)]);
        let output = ConverterTwinOutput::from_record(&r);
        assert_eq!(output.liquid_steel, 80.0);
        assert_eq!(output.slag, 0.0);
    }

    #[test]
    fn test_furnace_record_carries_every_input() {
        assert_eq!(FurnaceTwinInput::default().to_record().len(), 13);
    }
}
