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

//! Defines the GasHolderAgent.

use super::arbitration::allocate_requests;
use ferrum_core::agent::{AgentStatus, HolderControl};
use ferrum_core::control::{incremental_adjust, Direction, Limit, SAFETY_LIMITS};
use ferrum_core::message::protocol::GasRequest;
use ferrum_core::observation::HolderInputs;
use ferrum_core::{Agent, AgentAction, AgentId, MessageBus, MessageKind, Observation};

/// Fill level above which a holder counts as full.
const SOC_HIGH: f64 = 0.85;
/// Fill level below which a holder counts as low.
const SOC_LOW: f64 = 0.25;
/// Pressure above which a holder counts as full [kPa].
const P_HIGH: f64 = 14.0;
/// Pressure below which a holder counts as low [kPa].
const P_LOW: f64 = 9.0;

/// Nominal BFG outflows the mid-band drift returns to [Nm3/h].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BfgNominal {
    /// To the power plant.
    pub to_power_plant: f64,
    /// To heating.
    pub to_heating: f64,
}

impl Default for BfgNominal {
    fn default() -> Self {
        Self {
            to_power_plant: 50000.0,
            to_heating: 30000.0,
        }
    }
}

/// The gas-holder network controller.
pub struct GasHolderAgent {
    control: HolderControl,
    nominal: BfgNominal,
    surge_warning_active: bool,
}

/// Moves `value` 2 % toward `nominal`, then clamps.
fn drift_toward(value: f64, nominal: f64, limit: Limit) -> f64 {
    let next = if value > nominal {
        value * 0.98
    } else if value < nominal {
        value * 1.02
    } else {
        value
    };
    limit.clamp(next)
}

impl GasHolderAgent {
    /// Creates an agent with the nominal outflows.
    pub fn new() -> Self {
        Self {
            control: HolderControl::default(),
            nominal: BfgNominal::default(),
            surge_warning_active: false,
        }
    }

    /// Starts from explicit outflows.
    pub fn with_control(mut self, control: HolderControl) -> Self {
        self.control = control;
        self
    }

    /// Current outflows.
    pub fn control(&self) -> &HolderControl {
        &self.control
    }

    /// Runs the three holder cascades, then answers gas requests.
    ///
    /// The surge flag covers exactly one step: it is raised by warnings on
    /// the bus and lowered once the cascades have run.
    pub fn step_inputs(&mut self, inputs: &HolderInputs, bus: &mut MessageBus) -> HolderControl {
        let warnings = bus
            .messages_for(AgentId::GasHolder, Some(MessageKind::SurgeWarning))
            .len();
        if warnings > 0 {
            log::info!(
                "GasHolderAgent: {} surge warning(s), making room in the BOFG holder",
                warnings
            );
            self.surge_warning_active = true;
        }

        self.control_bfg(inputs.soc_bfg, inputs.p_bfg);
        self.control_bofg(inputs.soc_bofg, inputs.p_bofg, self.surge_warning_active);
        self.control_cog(inputs.soc_cog, inputs.p_cog);
        self.surge_warning_active = false;

        self.answer_requests(bus);
        self.control
    }

    fn control_bfg(&mut self, soc: f64, p: f64) {
        let limits = &SAFETY_LIMITS.gas_holder;
        let (pp_limit, heat_limit) = (limits.bfg_to_power_plant, limits.bfg_to_heating);
        let c = &mut self.control;

        if p > limits.emergency_pressure {
            log::warn!("GasHolderAgent: BFG pressure {:.1} kPa, dumping gas", p);
            c.bfg_to_pp = incremental_adjust(c.bfg_to_pp, Direction::Increase, 0.20, pp_limit);
            c.bfg_to_heating =
                incremental_adjust(c.bfg_to_heating, Direction::Increase, 0.10, heat_limit);
            return;
        }

        if soc < limits.soc.min {
            log::warn!("GasHolderAgent: BFG holder nearly empty (SOC {:.3})", soc);
            c.bfg_to_pp = incremental_adjust(c.bfg_to_pp, Direction::Decrease, 0.20, pp_limit);
            c.bfg_to_heating =
                incremental_adjust(c.bfg_to_heating, Direction::Decrease, 0.20, heat_limit);
            return;
        }

        if soc > SOC_HIGH || p > P_HIGH {
            c.bfg_to_pp = incremental_adjust(c.bfg_to_pp, Direction::Increase, 0.10, pp_limit);
            c.bfg_to_heating =
                incremental_adjust(c.bfg_to_heating, Direction::Increase, 0.05, heat_limit);
        } else if soc < SOC_LOW || p < P_LOW {
            c.bfg_to_pp = incremental_adjust(c.bfg_to_pp, Direction::Decrease, 0.10, pp_limit);
            c.bfg_to_heating =
                incremental_adjust(c.bfg_to_heating, Direction::Decrease, 0.08, heat_limit);
        } else if soc > 0.35 && soc < 0.75 && p > 10.0 && p < 13.0 {
            c.bfg_to_pp = drift_toward(c.bfg_to_pp, self.nominal.to_power_plant, pp_limit);
            c.bfg_to_heating = drift_toward(c.bfg_to_heating, self.nominal.to_heating, heat_limit);
        }
    }

    fn control_bofg(&mut self, soc: f64, p: f64, surge_warning: bool) {
        let limits = &SAFETY_LIMITS.gas_holder;
        let (pp_limit, heat_limit) = (limits.bofg_to_power_plant, limits.bofg_to_heating);
        let c = &mut self.control;

        if surge_warning {
            c.bofg_to_pp = incremental_adjust(c.bofg_to_pp, Direction::Decrease, 0.20, pp_limit);
            c.bofg_to_heating =
                incremental_adjust(c.bofg_to_heating, Direction::Decrease, 0.15, heat_limit);
            return;
        }

        if p > limits.emergency_pressure {
            log::warn!("GasHolderAgent: BOFG pressure {:.1} kPa, dumping gas", p);
            c.bofg_to_pp = incremental_adjust(c.bofg_to_pp, Direction::Increase, 0.20, pp_limit);
            return;
        }

        if soc < limits.soc.min {
            log::warn!("GasHolderAgent: BOFG holder nearly empty (SOC {:.3})", soc);
            c.bofg_to_pp = incremental_adjust(c.bofg_to_pp, Direction::Decrease, 0.20, pp_limit);
            return;
        }

        if soc > SOC_HIGH || p > P_HIGH {
            c.bofg_to_pp = incremental_adjust(c.bofg_to_pp, Direction::Increase, 0.10, pp_limit);
        } else if soc < SOC_LOW || p < P_LOW {
            c.bofg_to_pp = incremental_adjust(c.bofg_to_pp, Direction::Decrease, 0.10, pp_limit);
        }
    }

    fn control_cog(&mut self, soc: f64, p: f64) {
        let limits = &SAFETY_LIMITS.gas_holder;
        let (heat_limit, bf_limit) = (limits.cog_to_heating, limits.cog_to_furnace);
        let c = &mut self.control;

        if p > limits.emergency_pressure {
            log::warn!("GasHolderAgent: COG pressure {:.1} kPa, dumping gas", p);
            c.cog_to_heating =
                incremental_adjust(c.cog_to_heating, Direction::Increase, 0.20, heat_limit);
            return;
        }

        if soc < limits.soc.min {
            log::warn!("GasHolderAgent: COG holder nearly empty (SOC {:.3})", soc);
            c.cog_to_heating =
                incremental_adjust(c.cog_to_heating, Direction::Decrease, 0.20, heat_limit);
            c.cog_to_bf = incremental_adjust(c.cog_to_bf, Direction::Decrease, 0.20, bf_limit);
            return;
        }

        if soc > SOC_HIGH || p > P_HIGH {
            c.cog_to_heating =
                incremental_adjust(c.cog_to_heating, Direction::Increase, 0.10, heat_limit);
            c.cog_to_bf = incremental_adjust(c.cog_to_bf, Direction::Increase, 0.05, bf_limit);
        } else if soc < SOC_LOW || p < P_LOW {
            c.cog_to_heating =
                incremental_adjust(c.cog_to_heating, Direction::Decrease, 0.10, heat_limit);
            c.cog_to_bf = incremental_adjust(c.cog_to_bf, Direction::Decrease, 0.08, bf_limit);
        }
    }

    fn answer_requests(&self, bus: &mut MessageBus) {
        let requests: Vec<GasRequest> = bus
            .messages_for(AgentId::GasHolder, Some(MessageKind::Request))
            .into_iter()
            .filter_map(GasRequest::from_message)
            .collect();
        if requests.is_empty() {
            return;
        }

        let responses = allocate_requests(&requests, &self.control);
        let time = bus.time();
        for (request, response) in requests.iter().zip(responses) {
            log::debug!(
                "GasHolderAgent: granted {:.0}/{:.0} {} to {}",
                response.allocated,
                request.amount,
                request.gas,
                request.requester
            );
            bus.send(response.to_message(AgentId::GasHolder, request.requester, time));
        }
    }
}

impl Default for GasHolderAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for GasHolderAgent {
    fn id(&self) -> AgentId {
        AgentId::GasHolder
    }

    fn step(&mut self, observation: &Observation, bus: &mut MessageBus) -> AgentAction {
        let inputs = HolderInputs::from(observation);
        AgentAction::GasHolder(self.step_inputs(&inputs, bus))
    }

    fn action(&self) -> AgentAction {
        AgentAction::GasHolder(self.control)
    }

    fn report_status(&self) -> AgentStatus {
        let c = &self.control;
        AgentStatus {
            agent_id: AgentId::GasHolder,
            active_flags: Vec::new(),
            message: format!(
                "BFG {:.0}/{:.0} BOFG {:.0}/{:.0} COG {:.0}/{:.0}",
                c.bfg_to_pp,
                c.bfg_to_heating,
                c.bofg_to_pp,
                c.bofg_to_heating,
                c.cog_to_heating,
                c.cog_to_bf
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn step(agent: &mut GasHolderAgent, inputs: HolderInputs) -> HolderControl {
        let mut bus = MessageBus::new();
        agent.step_inputs(&inputs, &mut bus)
    }

    #[test]
    fn test_bfg_emergency_skips_remaining_levels() {
        let mut agent = GasHolderAgent::new();
        let control = step(
            &mut agent,
            HolderInputs {
                soc_bfg: 0.95,
                p_bfg: 16.5,
                ..Default::default()
            },
        );
        assert_relative_eq!(control.bfg_to_pp, 60000.0, epsilon = 1e-9);
        assert_relative_eq!(control.bfg_to_heating, 33000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bfg_near_empty_closes_down() {
        let mut agent = GasHolderAgent::new();
        let control = step(
            &mut agent,
            HolderInputs {
                soc_bfg: 0.04,
                p_bfg: 8.3,
                ..Default::default()
            },
        );
        assert_relative_eq!(control.bfg_to_pp, 40000.0, epsilon = 1e-9);
        assert_relative_eq!(control.bfg_to_heating, 24000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bfg_drifts_to_nominal_mid_band() {
        let mut agent = GasHolderAgent::new().with_control(HolderControl {
            bfg_to_pp: 60000.0,
            bfg_to_heating: 20000.0,
            ..Default::default()
        });
        let control = step(&mut agent, HolderInputs::default());
        assert_relative_eq!(control.bfg_to_pp, 58800.0, epsilon = 1e-9);
        assert_relative_eq!(control.bfg_to_heating, 20400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bofg_and_cog_have_no_drift() {
        let start = HolderControl {
            bofg_to_pp: 30000.0,
            cog_to_heating: 12000.0,
            ..Default::default()
        };
        let mut agent = GasHolderAgent::new().with_control(start);
        let control = step(&mut agent, HolderInputs::default());
        assert_eq!(control.bofg_to_pp, 30000.0);
        assert_eq!(control.cog_to_heating, 12000.0);
    }

    #[test]
    fn test_cog_low_pressure_reduces_both_outflows() {
        let mut agent = GasHolderAgent::new();
        let control = step(
            &mut agent,
            HolderInputs {
                p_cog: 8.5,
                ..Default::default()
            },
        );
        assert_relative_eq!(control.cog_to_heating, 7200.0, epsilon = 1e-9);
        assert_relative_eq!(control.cog_to_bf, 4600.0, epsilon = 1e-9);
    }

    #[test]
    fn test_posts_nothing_without_requests() {
        let mut agent = GasHolderAgent::new();
        let mut bus = MessageBus::new();
        agent.step_inputs(&HolderInputs::default(), &mut bus);
        assert!(bus.is_empty());
    }
}
