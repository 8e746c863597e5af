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

use ferrum_core::agent::{AgentStatus, ConverterControl};
use ferrum_core::control::{incremental_adjust, Direction, SAFETY_LIMITS};
use ferrum_core::message::protocol::SurgeWarning;
use ferrum_core::observation::ConverterInputs;
use ferrum_core::{Agent, AgentAction, AgentId, MessageBus, Observation};

/// Steel temperature deadband around the target [°C].
const TEMP_DEADBAND: f64 = 20.0;
/// Countdown at or below which a surge warning goes out [min].
const WARNING_LEAD_TIME: f64 = 2.0;
/// Typical BOFG peak during a blow [Nm3/h].
const EXPECTED_PEAK: f64 = 60000.0;
/// Design BOFG production rate [Nm3/h].
const DESIGN_GAS_RATE: f64 = 50000.0;
/// Holder pressure above which an over-design gas rate is throttled [kPa].
const HOLDER_PRESSURE_HIGH: f64 = 14.0;
/// Minutes until the first blow.
const INITIAL_TIME_TO_BLOW: f64 = 30.0;

/// The converter controller.
pub struct ConverterAgent {
    control: ConverterControl,
    time_to_next_blow: f64,
}

impl ConverterAgent {
    /// Creates an agent at the nominal operating point, 30 minutes before a blow.
    pub fn new() -> Self {
        Self {
            control: ConverterControl::default(),
            time_to_next_blow: INITIAL_TIME_TO_BLOW,
        }
    }

    /// Overrides the blow countdown [min].
    pub fn with_time_to_next_blow(mut self, minutes: f64) -> Self {
        self.time_to_next_blow = minutes.max(0.0);
        self
    }

    /// Minutes until the next blow.
    ///
    /// Counts down by one per step and stops at zero. Nothing re-arms it,
    /// so once it reaches the lead time a warning goes out every step.
    pub fn time_to_next_blow(&self) -> f64 {
        self.time_to_next_blow
    }

    /// Current setpoints.
    pub fn control(&self) -> &ConverterControl {
        &self.control
    }

    /// Runs the tiers against explicit inputs, then advances the countdown.
    pub fn step_inputs(
        &mut self,
        inputs: &ConverterInputs,
        bus: &mut MessageBus,
    ) -> ConverterControl {
        let limits = &SAFETY_LIMITS.converter;
        let c = &mut self.control;

        // Safety
        c.oxygen_flow = limits.oxygen_flow.clamp(c.oxygen_flow);
        if inputs.gas_pressure > limits.gas_pressure_max {
            log::warn!(
                "ConverterAgent: off-gas pressure {:.1} kPa, reducing oxygen",
                inputs.gas_pressure
            );
            c.oxygen_flow =
                incremental_adjust(c.oxygen_flow, Direction::Decrease, 0.10, limits.oxygen_flow);
        }

        // Temperature deadband
        if inputs.t_steel > c.t_target + TEMP_DEADBAND {
            c.oxygen_flow =
                incremental_adjust(c.oxygen_flow, Direction::Decrease, 0.03, limits.oxygen_flow);
            c.scrap_steel =
                incremental_adjust(c.scrap_steel, Direction::Increase, 0.02, limits.scrap_steel);
        } else if inputs.t_steel < c.t_target - TEMP_DEADBAND {
            c.oxygen_flow =
                incremental_adjust(c.oxygen_flow, Direction::Increase, 0.03, limits.oxygen_flow);
        }

        // Coordination
        if self.time_to_next_blow <= WARNING_LEAD_TIME {
            let warning = SurgeWarning {
                time_to_blow: self.time_to_next_blow,
                expected_peak: EXPECTED_PEAK,
                duration: c.blow_duration,
                gh_soc: inputs.soc_bofg,
            };
            log::info!(
                "ConverterAgent: blow in {:.0} min, warning gas holder (BOFG SOC {:.2})",
                warning.time_to_blow,
                warning.gh_soc
            );
            bus.send(warning.to_message(bus.time()));
        }

        if inputs.bof_gas_current > DESIGN_GAS_RATE * 1.3 && inputs.p_bofg > HOLDER_PRESSURE_HIGH {
            c.oxygen_flow =
                incremental_adjust(c.oxygen_flow, Direction::Decrease, 0.10, limits.oxygen_flow);
        }

        self.time_to_next_blow = (self.time_to_next_blow - 1.0).max(0.0);
        self.control
    }
}

impl Default for ConverterAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for ConverterAgent {
    fn id(&self) -> AgentId {
        AgentId::Converter
    }

    fn step(&mut self, observation: &Observation, bus: &mut MessageBus) -> AgentAction {
        let inputs = ConverterInputs::from(observation);
        AgentAction::Converter(self.step_inputs(&inputs, bus))
    }

    fn action(&self) -> AgentAction {
        AgentAction::Converter(self.control)
    }

    fn report_status(&self) -> AgentStatus {
        AgentStatus {
            agent_id: AgentId::Converter,
            active_flags: Vec::new(),
            message: format!(
                "O2={:.0} scrap={:.1} next blow in {:.0} min",
                self.control.oxygen_flow, self.control.scrap_steel, self.time_to_next_blow
            ),
        }
    }
}
