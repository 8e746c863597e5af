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

//! Agent registry with fixed evaluation order.

use ferrum_core::agent::AgentStatus;
use ferrum_core::{ActionSet, Agent, AgentId, MessageBus, Observation};

/// Registry that owns the plant agents and steps them in [`AgentId`] order.
///
/// The order is furnace, converter, coke oven, gas holder, regardless of
/// registration order, so messages posted by the production units reach
/// the gas holder within the same tick.
pub struct AgentRegistry {
    entries: Vec<Box<dyn Agent>>,
}

impl AgentRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers an agent. An agent with the same id is replaced.
    pub fn register(&mut self, agent: Box<dyn Agent>) {
        let id = agent.id();
        if let Some(pos) = self.entries.iter().position(|a| a.id() == id) {
            log::warn!("AgentRegistry: Replacing {:?}", id);
            self.entries.remove(pos);
        } else {
            log::info!("AgentRegistry: Registered {:?}", id);
        }

        self.entries.push(agent);
        self.entries.sort_by_key(|a| a.id());
    }

    /// Returns the number of registered agents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no agents are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered ids in evaluation order.
    pub fn ids(&self) -> Vec<AgentId> {
        self.entries.iter().map(|a| a.id()).collect()
    }

    /// Returns the agent with the given id, if registered.
    pub fn get(&self, id: AgentId) -> Option<&dyn Agent> {
        self.entries
            .iter()
            .find(|a| a.id() == id)
            .map(|a| a.as_ref())
    }

    /// Steps every agent in evaluation order.
    ///
    /// Slots of agents that are not registered keep their default setpoints.
    pub fn step_all(&mut self, observation: &Observation, bus: &mut MessageBus) -> ActionSet {
        self.entries
            .iter_mut()
            .map(|agent| agent.step(observation, bus))
            .collect()
    }

    /// Current setpoints of every agent, without stepping.
    pub fn actions(&self) -> ActionSet {
        self.entries.iter().map(|agent| agent.action()).collect()
    }

    /// Status reports in evaluation order.
    pub fn statuses(&self) -> Vec<AgentStatus> {
        self.entries.iter().map(|a| a.report_status()).collect()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_agents::{CokeOvenAgent, FurnaceAgent, GasHolderAgent};

    #[test]
    fn test_registration_order_does_not_matter() {
        let mut registry = AgentRegistry::new();
        registry.register(Box::new(GasHolderAgent::new()));
        registry.register(Box::new(CokeOvenAgent::new()));
        registry.register(Box::new(FurnaceAgent::new()));

        assert_eq!(
            registry.ids(),
            vec![AgentId::Furnace, AgentId::CokeOven, AgentId::GasHolder]
        );
        assert!(registry.get(AgentId::Converter).is_none());
    }

    #[test]
    fn test_duplicate_id_replaces() {
        let mut registry = AgentRegistry::new();
        registry.register(Box::new(FurnaceAgent::new()));
        registry.register(Box::new(FurnaceAgent::new()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_step_all_fills_every_slot() {
        let mut registry = AgentRegistry::new();
        for agent in ferrum_agents::default_agents() {
            registry.register(agent);
        }
        let mut bus = MessageBus::new();
        let actions = registry.step_all(&Observation::default(), &mut bus);
        assert_eq!(actions, registry.actions());
        assert_eq!(registry.statuses().len(), 4);
    }
}
