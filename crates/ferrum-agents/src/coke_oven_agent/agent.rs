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

//! Defines the CokeOvenAgent.

use ferrum_core::agent::{AgentStatus, CokeOvenControl};
use ferrum_core::control::{incremental_adjust, Direction, SAFETY_LIMITS};
use ferrum_core::observation::CokeOvenInputs;
use ferrum_core::{Agent, AgentAction, AgentId, MessageBus, Observation};

/// The coke-oven controller.
///
/// Holds flue temperature near its target with heating gas and slows or
/// speeds coke pushing, which sets COG production, from the COG holder's
/// fill level.
pub struct CokeOvenAgent {
    control: CokeOvenControl,
    t_band: f64,
}

impl CokeOvenAgent {
    /// Creates an agent at the nominal operating point.
    pub fn new() -> Self {
        Self {
            control: CokeOvenControl::default(),
            t_band: 20.0,
        }
    }

    /// Current setpoints.
    pub fn control(&self) -> &CokeOvenControl {
        &self.control
    }

    /// Runs the tiers against explicit inputs.
    ///
    /// COG demand is read but does not drive any rule yet.
    pub fn step_inputs(&mut self, inputs: &CokeOvenInputs) -> CokeOvenControl {
        let limits = &SAFETY_LIMITS.coke_oven;
        let c = &mut self.control;
        let t = inputs.t_furnace;

        // Emergency temperature protection
        if t > limits.temperature.max {
            log::warn!("CokeOvenAgent: flue at {:.0}°C, cutting heating gas", t);
            c.heating_gas_input = incremental_adjust(
                c.heating_gas_input,
                Direction::Decrease,
                0.10,
                limits.heating_gas_input,
            );
        }
        if t < limits.temperature.min {
            log::warn!("CokeOvenAgent: flue at {:.0}°C, boosting heating gas", t);
            c.heating_gas_input = incremental_adjust(
                c.heating_gas_input,
                Direction::Increase,
                0.10,
                limits.heating_gas_input,
            );
        }

        // Temperature band
        if t < c.t_target - self.t_band {
            c.heating_gas_input = incremental_adjust(
                c.heating_gas_input,
                Direction::Increase,
                0.03,
                limits.heating_gas_input,
            );
        } else if t > c.t_target + self.t_band {
            c.heating_gas_input = incremental_adjust(
                c.heating_gas_input,
                Direction::Decrease,
                0.03,
                limits.heating_gas_input,
            );
        }

        // COG holder coordination
        let soc = inputs.soc_cog;
        if soc > 0.85 {
            c.pushing_rate =
                incremental_adjust(c.pushing_rate, Direction::Decrease, 0.05, limits.pushing_rate);
        } else if soc < 0.75 {
            c.pushing_rate = (c.pushing_rate * 1.02).min(1.0);
        }

        if soc < 0.25 {
            c.pushing_rate =
                incremental_adjust(c.pushing_rate, Direction::Increase, 0.03, limits.pushing_rate);
        } else if soc > 0.35 && c.pushing_rate > 1.0 {
            c.pushing_rate = (c.pushing_rate * 0.98).max(1.0);
        }

        self.control
    }
}

impl Default for CokeOvenAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for CokeOvenAgent {
    fn id(&self) -> AgentId {
        AgentId::CokeOven
    }

    fn step(&mut self, observation: &Observation, _bus: &mut MessageBus) -> AgentAction {
        AgentAction::CokeOven(self.step_inputs(&CokeOvenInputs::from(observation)))
    }

    fn action(&self) -> AgentAction {
        AgentAction::CokeOven(self.control)
    }

    fn report_status(&self) -> AgentStatus {
        AgentStatus {
            agent_id: AgentId::CokeOven,
            active_flags: Vec::new(),
            message: format!(
                "heating={:.0} pushing={:.3}",
                self.control.heating_gas_input, self.control.pushing_rate
            ),
        }
    }
}
