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

//! The plant loop.

use crate::config::{ConfigError, OrchestratorConfig, SimulationConfig};
use crate::fallback::SimplifiedFurnace;
use crate::gas_network::GasNetwork;
use crate::metrics::{MetricId, MetricStore};
use crate::registry::AgentRegistry;
use crate::translator;
use ferrum_core::twin::{
    CokeOvenTwin, CokeOvenTwinInput, ConverterTwin, ConverterTwinInput, FurnaceTwin,
    FurnaceTwinInput, InputIssue, Simulatable,
};
use ferrum_core::{ActionSet, Agent, GasKind, MessageBus, Observation};
use std::collections::BTreeMap;

/// Sequences one plant tick at a time.
///
/// A tick advances the clock, clears the bus, steps the agents in
/// [`AgentId`](ferrum_core::AgentId) order against the previous
/// observation, runs each unit's twin on the translated setpoints, then
/// integrates the gas holders and returns the new observation.
///
/// Nothing in a tick fails. Invalid twin inputs are replaced by the twin's
/// nominal input, a failing converter or coke-oven twin leaves its part of
/// the observation unchanged, and the furnace falls back to
/// [`SimplifiedFurnace`] when its twin is missing or fails.
pub struct Orchestrator {
    config: OrchestratorConfig,
    registry: AgentRegistry,
    bus: MessageBus,
    gas_network: GasNetwork,
    furnace_twin: Option<FurnaceTwin>,
    converter_twin: Option<ConverterTwin>,
    coke_oven_twin: Option<CokeOvenTwin>,
    fallback: SimplifiedFurnace,
    observation: Observation,
    actions: ActionSet,
    metrics: MetricStore,
    time: f64,
}

impl Orchestrator {
    /// Builds the loop with the four plant agents registered.
    ///
    /// The reference twins and the state-space holder models are attached
    /// when the configuration asks for them.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let o = &config.orchestrator;

        let mut gas_network = GasNetwork::new(config.gas_network.clone());
        if o.use_holder_models {
            gas_network = gas_network.with_state_space_models(&config.holder_models)?;
        }

        let mut registry = AgentRegistry::new();
        for agent in ferrum_agents::default_agents() {
            registry.register(agent);
        }

        let mut orchestrator = Self {
            config: o.clone(),
            actions: registry.actions(),
            registry,
            bus: MessageBus::new(),
            gas_network,
            furnace_twin: None,
            converter_twin: None,
            coke_oven_twin: None,
            fallback: SimplifiedFurnace::new(o.seed),
            observation: Observation::default(),
            metrics: MetricStore::new(o.metric_window),
            time: 0.0,
        };

        if o.use_reference_twins {
            orchestrator.attach_furnace_twin(ferrum_infra::furnace_twin());
            orchestrator.attach_converter_twin(ferrum_infra::converter_twin());
            orchestrator.attach_coke_oven_twin(ferrum_infra::coke_oven_twin());
        }

        log::info!(
            "Orchestrator: {} agents, twins {}, holder models {}",
            orchestrator.registry.len(),
            if o.use_reference_twins { "on" } else { "off" },
            if o.use_holder_models { "on" } else { "off" },
        );
        Ok(orchestrator)
    }

    // ── Wiring ──

    /// Registers an agent, replacing the one with the same id.
    pub fn register_agent(&mut self, agent: Box<dyn Agent>) {
        self.registry.register(agent);
        self.actions = self.registry.actions();
    }

    /// Attaches a blast-furnace twin. Without one the simplified dynamics run.
    pub fn attach_furnace_twin(&mut self, twin: FurnaceTwin) {
        self.furnace_twin = Some(twin);
    }

    /// Attaches a converter twin.
    pub fn attach_converter_twin(&mut self, twin: ConverterTwin) {
        self.converter_twin = Some(twin);
    }

    /// Attaches a coke-oven twin.
    pub fn attach_coke_oven_twin(&mut self, twin: CokeOvenTwin) {
        self.coke_oven_twin = Some(twin);
    }

    // ── Loop ──

    /// Runs one tick and returns the new observation.
    pub fn step(&mut self) -> Observation {
        self.time += self.config.timestep;
        self.bus.clear();
        self.bus.set_time(self.time);

        self.actions = self.registry.step_all(&self.observation, &mut self.bus);

        let mut obs = self.observation.clone();
        self.step_furnace(&mut obs);
        self.step_converter(&mut obs);
        self.step_coke_oven(&mut obs);

        let production = BTreeMap::from([
            (GasKind::Bfg, obs.bfg_supply),
            (GasKind::Bofg, obs.bofg_supply),
            (GasKind::Cog, obs.cog_supply),
        ]);
        let demands = self.actions.gas_holder.demands();
        let network = self
            .gas_network
            .update(&production, &demands, self.config.timestep);
        network.merge_into(&mut obs);

        for gas in GasKind::ALL {
            let holder = network.holder(gas);
            self.metrics
                .push(MetricId::new("gas_holder", format!("soc_{}", gas.tag())), holder.soc);
            self.metrics.push(
                MetricId::new("gas_holder", format!("p_{}", gas.tag())),
                holder.pressure,
            );
        }

        log::debug!(
            "Orchestrator: t={:.1} msgs={} SOC bfg={:.3} bofg={:.3} cog={:.3} Si={:.3}",
            self.time,
            self.bus.len(),
            obs.soc_bfg,
            obs.soc_bofg,
            obs.soc_cog,
            obs.si,
        );

        self.observation = obs.clone();
        obs
    }

    fn step_furnace(&mut self, obs: &mut Observation) {
        let control = &self.actions.furnace;
        if let Some(twin) = self.furnace_twin.as_mut() {
            let input = validated(
                "furnace",
                translator::furnace_input(control, obs),
                FurnaceTwinInput::validate,
            );
            match run_twin("furnace", twin.as_mut(), &input) {
                Some(out) => {
                    translator::apply_furnace_output(obs, &out);
                    return;
                }
                None => log::warn!("Orchestrator: falling back to simplified furnace dynamics"),
            }
        }
        self.fallback.step(control, obs);
    }

    fn step_converter(&mut self, obs: &mut Observation) {
        let Some(twin) = self.converter_twin.as_mut() else {
            return;
        };
        let input = validated(
            "converter",
            translator::converter_input(&self.actions.converter, obs),
            ConverterTwinInput::validate,
        );
        if let Some(out) = run_twin("converter", twin.as_mut(), &input) {
            translator::apply_converter_output(obs, &out);
        }
    }

    fn step_coke_oven(&mut self, obs: &mut Observation) {
        let Some(twin) = self.coke_oven_twin.as_mut() else {
            return;
        };
        let input = validated(
            "coke oven",
            translator::coke_oven_input(&self.actions.coke_oven),
            CokeOvenTwinInput::validate,
        );
        if let Some(out) = run_twin("coke oven", twin.as_mut(), &input) {
            translator::apply_coke_oven_output(obs, &out);
        }
    }

    /// Returns to time zero with the nominal observation.
    ///
    /// Clears the bus and the rolling metrics, resets the gas network,
    /// every twin and the simplified furnace. Agents keep their setpoints.
    pub fn reset(&mut self) -> Observation {
        self.time = 0.0;
        self.bus.clear();
        self.bus.set_time(0.0);
        self.gas_network.reset();
        self.fallback.reset();
        if let Some(twin) = self.furnace_twin.as_mut() {
            twin.reset();
        }
        if let Some(twin) = self.converter_twin.as_mut() {
            twin.reset();
        }
        if let Some(twin) = self.coke_oven_twin.as_mut() {
            twin.reset();
        }
        self.metrics.clear();
        self.observation = Observation::default();
        log::debug!("Orchestrator: reset");
        self.observation.clone()
    }

    // ── Accessors ──

    /// Simulated minutes since the last reset.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The observation the agents see next tick.
    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    /// Setpoints decided in the last tick.
    pub fn last_actions(&self) -> &ActionSet {
        &self.actions
    }

    /// Messages posted during the last tick.
    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// The gas network.
    pub fn gas_network(&self) -> &GasNetwork {
        &self.gas_network
    }

    /// The registered agents.
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Rolling holder metrics.
    pub fn metrics(&self) -> &MetricStore {
        &self.metrics
    }

    /// The loop settings.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }
}

/// Returns `input` if it passes `check`, the nominal input otherwise.
fn validated<I: Default>(
    unit: &str,
    input: I,
    check: impl Fn(&I) -> Result<(), InputIssue>,
) -> I {
    match check(&input) {
        Ok(()) => input,
        Err(issue) => {
            log::warn!("Orchestrator: invalid {} twin input ({}), using defaults", unit, issue);
            I::default()
        }
    }
}

fn run_twin<I, O>(
    unit: &str,
    twin: &mut dyn Simulatable<Input = I, Output = O>,
    input: &I,
) -> Option<O> {
    match twin.step(input) {
        Ok(out) => Some(out),
        Err(e) => {
            log::warn!("Orchestrator: {} twin step failed: {}", unit, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ferrum_core::twin::{FurnaceTwinOutput, TwinError};

    fn config(twins: bool) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.orchestrator.use_reference_twins = twins;
        config
    }

    struct FixedFurnace;

    impl Simulatable for FixedFurnace {
        type Input = FurnaceTwinInput;
        type Output = FurnaceTwinOutput;

        fn step(&mut self, input: &FurnaceTwinInput) -> Result<FurnaceTwinOutput, TwinError> {
            Ok(FurnaceTwinOutput {
                pig_iron_steelworks: 210.0,
                bf_gas_power_plant: 0.0,
                bf_gas_intern: 0.0,
                bf_gas_slab_heat: 0.0,
                bf_gas_coke_plant: 0.0,
                total_co2_mass_flow: 300.0,
                slag_mass_flow: 60.0,
                electricity_own: 1000.0,
                power_required: 0.0,
                oxygen_required: input.oxygen,
                bf_gas_calorific_value: 3.2,
                bf_gas_total_flow: 90000.0,
                t_hot_metal: 1490.0,
                si_content: 0.5,
            })
        }
    }

    struct BrokenFurnace;

    impl Simulatable for BrokenFurnace {
        type Input = FurnaceTwinInput;
        type Output = FurnaceTwinOutput;

        fn step(&mut self, _: &FurnaceTwinInput) -> Result<FurnaceTwinOutput, TwinError> {
            Err(TwinError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_simple_mode_uses_wind_dynamics() {
        let mut orchestrator = Orchestrator::new(&config(false)).unwrap();
        let obs = orchestrator.step();
        let wind = orchestrator.last_actions().furnace.wind_volume;
        assert_eq!(obs.bfg_supply, wind * 25.0);
        assert_eq!(obs.pig_iron_production, wind / 20.0);
        assert_eq!(obs.bofg_supply, Observation::default().bofg_supply);
        assert_eq!(orchestrator.time(), 1.0);
    }

    #[test]
    fn test_reference_twins_fold_outputs() {
        let mut orchestrator = Orchestrator::new(&config(true)).unwrap();
        let obs = orchestrator.step();
        let wind = orchestrator.last_actions().furnace.wind_volume;
        assert_relative_eq!(obs.bfg_supply, 0.4 * wind * 60.0 + 20000.0, epsilon = 0.01);
        assert!(obs.pig_iron_production > 0.0);
        assert!((0.2..=0.8).contains(&obs.si));
        assert!((1400.0..=1550.0).contains(&obs.t_hot_metal));
        assert!(obs.liquid_steel > 0.0);
        assert_relative_eq!(obs.bofg_supply, obs.liquid_steel * 60.0, epsilon = 1e-6);
        assert_eq!(obs.cog_available, obs.cog_supply);
    }

    #[test]
    fn test_attached_furnace_twin_is_used() {
        let mut orchestrator = Orchestrator::new(&config(false)).unwrap();
        orchestrator.attach_furnace_twin(Box::new(FixedFurnace));
        let obs = orchestrator.step();
        assert_eq!(obs.bfg_supply, 90000.0);
        assert_eq!(obs.si, 0.5);
        assert_eq!(obs.slag_bf, 60.0);
    }

    #[test]
    fn test_failing_furnace_twin_falls_back() {
        let mut orchestrator = Orchestrator::new(&config(false)).unwrap();
        orchestrator.attach_furnace_twin(Box::new(BrokenFurnace));
        let obs = orchestrator.step();
        let wind = orchestrator.last_actions().furnace.wind_volume;
        assert_eq!(obs.bfg_supply, wind * 25.0);
    }

    #[test]
    fn test_holder_state_is_merged_and_recorded() {
        let mut orchestrator = Orchestrator::new(&config(false)).unwrap();
        for _ in 0..3 {
            orchestrator.step();
        }
        let obs = orchestrator.observation();
        let network = orchestrator.gas_network().state();
        assert_eq!(obs.soc_bfg, network.bfg.soc);
        assert_eq!(obs.p_cog, network.cog.pressure);

        let id = MetricId::new("gas_holder", "soc_bfg");
        assert_eq!(orchestrator.metrics().get_sample_count(&id), 3);
        let latest = orchestrator.metrics().get(&id).and_then(|b| b.latest());
        assert_eq!(latest, Some(obs.soc_bfg));
    }

    #[test]
    fn test_reset_restores_nominal_observation() {
        let mut orchestrator = Orchestrator::new(&config(true)).unwrap();
        for _ in 0..5 {
            orchestrator.step();
        }
        let obs = orchestrator.reset();
        assert_eq!(obs, Observation::default());
        assert_eq!(orchestrator.time(), 0.0);
        assert!(orchestrator.bus().is_empty());
        assert_eq!(orchestrator.gas_network().state().bfg.soc, 0.5);
    }

    #[test]
    fn test_runs_are_reproducible() {
        let run = || {
            let mut orchestrator = Orchestrator::new(&config(false)).unwrap();
            (0..30).map(|_| orchestrator.step().si).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
