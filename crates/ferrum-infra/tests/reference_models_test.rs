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

use ferrum_core::twin::{
    CokeOvenTwinInput, ConverterTwinInput, FurnaceTwinInput, HolderInput, HolderModel, Simulatable,
};
use ferrum_core::GasKind;
use ferrum_infra::{coke_oven_twin, converter_twin, furnace_twin, StateSpaceHolder};

#[test]
fn test_boxed_holder_models_rise_with_surplus_gas() {
    for gas in GasKind::ALL {
        let mut model: HolderModel = Box::new(StateSpaceHolder::for_gas(gas));
        let first = model.step(&HolderInput { gas_net_flow: 20000.0 }).unwrap();
        let second = model.step(&HolderInput { gas_net_flow: 20000.0 }).unwrap();
        assert!(
            second.level > first.level,
            "{gas} level should rise: {} -> {}",
            first.level,
            second.level
        );
    }
}

#[test]
fn test_reference_twins_are_deterministic() {
    let mut converter = converter_twin();
    let mut coke_oven = coke_oven_twin();
    let input = ConverterTwinInput {
        pig_iron: 60.0,
        oxygen: 20000.0,
        ..Default::default()
    };

    let a = converter.step(&input).unwrap();
    let b = converter.step(&input).unwrap();
    assert_eq!(a, b);

    let c = coke_oven.step(&CokeOvenTwinInput::default()).unwrap();
    let d = coke_oven.step(&CokeOvenTwinInput::default()).unwrap();
    assert_eq!(c, d);
}

#[test]
fn test_furnace_twin_is_deterministic() {
    let mut twin = furnace_twin();
    let input = FurnaceTwinInput {
        wind_volume: 4300.0,
        coke_mass_flow: 110.0,
        ..Default::default()
    };
    let a = twin.step(&input).unwrap();
    let b = twin.step(&input).unwrap();
    assert_eq!(a, b);
    assert_eq!(furnace_twin().step(&input).unwrap(), a);
}

#[test]
fn test_furnace_twin_follows_wind_and_coal_injection() {
    let mut twin = furnace_twin();
    // Coal injection reaches the furnace as the coke it displaces.
    let at = |wind: f64, pci: f64| FurnaceTwinInput {
        wind_volume: wind,
        coke_mass_flow: pci / 1.5,
        ..Default::default()
    };

    let nominal = twin.step(&at(4000.0, 150.0)).unwrap();
    let more_wind = twin.step(&at(4500.0, 150.0)).unwrap();
    let more_coal = twin.step(&at(4000.0, 180.0)).unwrap();

    assert!(more_wind.bf_gas_total_flow > nominal.bf_gas_total_flow);
    assert!(more_wind.bf_gas_power_plant > nominal.bf_gas_power_plant);
    assert!(more_coal.pig_iron_steelworks > nominal.pig_iron_steelworks);
    assert!(more_coal.slag_mass_flow > nominal.slag_mass_flow);
    assert_eq!(more_coal.bf_gas_total_flow, nominal.bf_gas_total_flow);
}

#[test]
fn test_furnace_twin_heat_drives_silicon_down() {
    let mut twin = furnace_twin();
    let rich = |wind: f64, coke: f64| FurnaceTwinInput {
        ore: 300.0,
        pellets: 300.0,
        sinter: 300.0,
        wind_volume: wind,
        coke_mass_flow: coke,
        ..Default::default()
    };

    let base = twin.step(&rich(4000.0, 300.0)).unwrap();
    let windier = twin.step(&rich(5000.0, 300.0)).unwrap();
    let more_coke = twin.step(&rich(4000.0, 350.0)).unwrap();

    for hotter in [windier, more_coke] {
        assert!(hotter.t_hot_metal > base.t_hot_metal);
        assert!(hotter.si_content < base.si_content);
    }
}
