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

//! Traits for the autonomous unit controllers (Agents).

mod action;

pub use action::*;

use crate::message::MessageBus;
use crate::observation::Observation;
use serde::{Deserialize, Serialize};

/// Unique identifier for each agent in the plant.
///
/// Variant order is the evaluation order inside a tick: an agent stepped
/// earlier can put messages on the bus that a later agent reads in the
/// same tick.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
pub enum AgentId {
    /// The blast-furnace controller.
    Furnace,
    /// The converter controller.
    Converter,
    /// The coke-oven controller.
    CokeOven,
    /// The gas-holder network controller.
    GasHolder,
}

impl AgentId {
    /// All agents, in evaluation order.
    pub const ALL: [AgentId; 4] = [
        AgentId::Furnace,
        AgentId::Converter,
        AgentId::CokeOven,
        AgentId::GasHolder,
    ];
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A snapshot of an agent's internal condition, for logs and dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    /// The reporting agent.
    pub agent_id: AgentId,
    /// Names of the hysteresis flags currently latched.
    pub active_flags: Vec<String>,
    /// One-line human-readable summary of the current setpoints.
    pub message: String,
}

/// The foundational interface for a unit controller.
///
/// Each production unit implements this trait. Once per tick the
/// orchestrator hands every agent the shared observation and the message
/// bus; the agent applies its rule tiers and returns its new setpoints.
pub trait Agent: Send {
    /// Returns the unique identifier for this agent.
    fn id(&self) -> AgentId;

    /// Runs one control step.
    ///
    /// Never fails: missing inputs fall back to the agent's documented
    /// defaults and every setpoint is clamped into its safety band.
    fn step(&mut self, observation: &Observation, bus: &mut MessageBus) -> AgentAction;

    /// Returns the current setpoints without stepping.
    fn action(&self) -> AgentAction;

    /// Reports the current status of the agent.
    fn report_status(&self) -> AgentStatus;
}
