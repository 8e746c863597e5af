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

//! Defines the FurnaceAgent.

use ferrum_core::agent::{AgentStatus, FurnaceControl};
use ferrum_core::control::{incremental_adjust, Direction, HysteresisFlag, SAFETY_LIMITS};
use ferrum_core::observation::FurnaceInputs;
use ferrum_core::{Agent, AgentAction, AgentId, MessageBus, Observation};

/// Thresholds for the furnace rule tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FurnaceParams {
    /// Half-width of the silicon band around the target [%].
    pub si_band: f64,
    /// BFG holder fill level considered full.
    pub soc_high: f64,
    /// BFG holder fill level considered empty.
    pub soc_low: f64,
    /// BFG pressure considered high [kPa].
    pub p_high: f64,
    /// BFG pressure considered low [kPa].
    pub p_low: f64,
}

impl Default for FurnaceParams {
    fn default() -> Self {
        Self {
            si_band: 0.03,
            soc_high: 0.85,
            soc_low: 0.25,
            p_high: 14.0,
            p_low: 9.0,
        }
    }
}


/// The blast-furnace controller.
pub struct FurnaceAgent {
    control: FurnaceControl,
    params: FurnaceParams,
    gh_full: HysteresisFlag,
    gh_empty: HysteresisFlag,
    si_high: HysteresisFlag,
    si_low: HysteresisFlag,
}

impl FurnaceAgent {
    /// Creates an agent at the nominal operating point.
    pub fn new() -> Self {
        Self::with_params(FurnaceParams::default())
    }

    /// Creates an agent with custom thresholds.
    pub fn with_params(params: FurnaceParams) -> Self {
        Self {
            control: FurnaceControl::default(),
            params,
            gh_full: HysteresisFlag::new("gh_full"),
            gh_empty: HysteresisFlag::new("gh_empty"),
            si_high: HysteresisFlag::new("si_high"),
            si_low: HysteresisFlag::new("si_low"),
        }
    }

    /// Current setpoints.
    pub fn control(&self) -> &FurnaceControl {
        &self.control
    }

    /// Runs the four tiers against explicit inputs.
    pub fn step_inputs(&mut self, inputs: &FurnaceInputs) -> FurnaceControl {
        self.apply_safety_rules(inputs);
        self.apply_process_rules(inputs.si);
        self.apply_energy_rules(inputs);
        self.apply_economic_rules(inputs.peak_electricity);
        self.control
    }

    /// Names of the latched flags.
    pub fn active_flags(&self) -> Vec<&'static str> {
        [&self.gh_full, &self.gh_empty, &self.si_high, &self.si_low]
            .into_iter()
            .filter(|f| f.is_active())
            .map(|f| f.name())
            .collect()
    }

    // ── Tier 1: safety ──

    fn apply_safety_rules(&mut self, inputs: &FurnaceInputs) {
        let limits = &SAFETY_LIMITS.furnace;
        let c = &mut self.control;

        c.wind_volume = limits.wind_volume.clamp(c.wind_volume);
        c.o2_enrichment = limits.o2_enrichment.clamp(c.o2_enrichment);

        if inputs.t_hot_metal > limits.hot_metal_temp_max {
            log::warn!(
                "FurnaceAgent: hot metal at {:.0}°C, cutting PCI and O2",
                inputs.t_hot_metal
            );
            c.pci = incremental_adjust(c.pci, Direction::Decrease, 0.20, limits.pci);
            c.o2_enrichment =
                incremental_adjust(c.o2_enrichment, Direction::Decrease, 0.20, limits.o2_enrichment);
        }

        if inputs.si > limits.si_max {
            log::warn!("FurnaceAgent: Si at {:.3}%, reducing PCI", inputs.si);
            c.pci = incremental_adjust(c.pci, Direction::Decrease, 0.05, limits.pci);
        }
    }

    // ── Tier 2: silicon control ──

    fn apply_process_rules(&mut self, si: f64) {
        let limits = &SAFETY_LIMITS.furnace;
        let target = self.control.si_target;
        let band = self.params.si_band;
        let c = &mut self.control;

        if si > target + band {
            self.si_high.set();
            c.pci = incremental_adjust(c.pci, Direction::Decrease, 0.10, limits.pci);
            c.o2_enrichment =
                incremental_adjust(c.o2_enrichment, Direction::Decrease, 0.10, limits.o2_enrichment);
        } else if si < target + band / 2.0 {
            self.si_high.clear();
        }

        if si < target - band {
            self.si_low.set();
            c.pci = incremental_adjust(c.pci, Direction::Increase, 0.10, limits.pci);
            c.wind_volume =
                incremental_adjust(c.wind_volume, Direction::Increase, 0.10, limits.wind_volume);
        } else if si > target - band / 2.0 {
            self.si_low.clear();
        }
    }

    // ── Tier 3: energy coordination ──

    fn apply_energy_rules(&mut self, inputs: &FurnaceInputs) {
        let limits = &SAFETY_LIMITS.furnace;
        let p = self.params;
        let c = &mut self.control;
        let (soc, pressure) = (inputs.soc_bfg, inputs.p_bfg);

        if soc > p.soc_high || pressure > p.p_high {
            self.gh_full.set();
            c.wind_volume =
                incremental_adjust(c.wind_volume, Direction::Decrease, 0.15, limits.wind_volume);
            c.pci = incremental_adjust(c.pci, Direction::Decrease, 0.12, limits.pci);
            c.o2_enrichment =
                incremental_adjust(c.o2_enrichment, Direction::Decrease, 0.15, limits.o2_enrichment);
        } else if soc < 0.75 && pressure < 13.0 {
            self.gh_full.clear();
        }

        if soc < p.soc_low || pressure < p.p_low {
            self.gh_empty.set();
            c.wind_volume =
                incremental_adjust(c.wind_volume, Direction::Increase, 0.15, limits.wind_volume);
            c.pci = incremental_adjust(c.pci, Direction::Increase, 0.12, limits.pci);
        } else if soc > 0.30 && pressure > 10.0 {
            self.gh_empty.clear();
        }

        if inputs.cog_available < inputs.cog_required {
            c.cog_ratio = incremental_adjust(c.cog_ratio, Direction::Decrease, 0.10, limits.cog_ratio);
            c.pci = incremental_adjust(c.pci, Direction::Increase, 0.05, limits.pci);
        }

        let o2_required = c.o2_enrichment * c.wind_volume / 100.0;
        if inputs.o2_available < o2_required {
            c.o2_enrichment =
                incremental_adjust(c.o2_enrichment, Direction::Decrease, 0.10, limits.o2_enrichment);
            c.pci = incremental_adjust(c.pci, Direction::Increase, 0.04, limits.pci);
        }
    }

    // ── Tier 4: economics ──

    fn apply_economic_rules(&mut self, peak_electricity: bool) {
        if peak_electricity {
            let c = &mut self.control;
            c.wind_volume = incremental_adjust(
                c.wind_volume,
                Direction::Decrease,
                0.05,
                SAFETY_LIMITS.furnace.wind_volume,
            );
        }
    }
}

impl Default for FurnaceAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for FurnaceAgent {
    fn id(&self) -> AgentId {
        AgentId::Furnace
    }

    fn step(&mut self, observation: &Observation, _bus: &mut MessageBus) -> AgentAction {
        let inputs = FurnaceInputs::from(observation);
        AgentAction::Furnace(self.step_inputs(&inputs))
    }

    fn action(&self) -> AgentAction {
        AgentAction::Furnace(self.control)
    }

    fn report_status(&self) -> AgentStatus {
        let c = &self.control;
        AgentStatus {
            agent_id: AgentId::Furnace,
            active_flags: self.active_flags().into_iter().map(String::from).collect(),
            message: format!(
                "wind={:.0} O2={:.2}% PCI={:.1} COG_ratio={:.3}",
                c.wind_volume, c.o2_enrichment, c.pci, c.cog_ratio
            ),
        }
    }
}
