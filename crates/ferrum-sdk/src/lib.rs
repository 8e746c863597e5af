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

//! The public-facing API for running the plant control loop.
//!
//! [`run_simulation`] builds an [`Orchestrator`] from a configuration, runs
//! it for a number of ticks and hands back the per-tick history together
//! with every recorded transition.

mod history;

pub use history::SimulationHistory;

use anyhow::{Context, Result};
use ferrum_control::{Orchestrator, SimulationConfig, TransitionRecorder};
use ferrum_core::model::{StandardAction, StandardState};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub mod prelude {
    pub use crate::{run_simulation, SimulationHistory, SimulationOutput};
    pub use ferrum_agents::{CokeOvenAgent, ConverterAgent, FurnaceAgent, GasHolderAgent};
    pub use ferrum_control::{
        calculate_reward, EpisodeMetrics, GasNetworkConfig, Orchestrator, OrchestratorConfig,
        SimulationConfig, TransitionRecorder,
    };
    pub use ferrum_core::model::{Reward, StandardAction, StandardState, Transition};
    pub use ferrum_core::{ActionSet, Agent, AgentId, GasKind, Observation};
    pub use ferrum_infra::{coke_oven_twin, converter_twin, StateSpaceHolder, StateSpaceParams};
}

/// Ticks between two status lines.
const STATUS_INTERVAL: usize = 20;

/// Everything a run produced.
#[derive(Debug)]
pub struct SimulationOutput {
    /// Per-tick time series.
    pub history: SimulationHistory,
    /// One transition per tick, the last one closing the episode.
    pub transitions: TransitionRecorder,
}

/// Runs the plant loop for `num_steps` ticks from the nominal state.
pub fn run_simulation(config: &SimulationConfig, num_steps: usize) -> Result<SimulationOutput> {
    let mut orchestrator =
        Orchestrator::new(config).context("failed to build the plant orchestrator")?;
    let mut history = SimulationHistory::default();
    let mut transitions = TransitionRecorder::new();

    let mut obs = orchestrator.reset();
    log::info!("Running simulation for {} steps", num_steps);

    for step in 1..=num_steps {
        let state = StandardState::from_observation(&obs, step as u64 - 1);
        obs = orchestrator.step();
        let actions = orchestrator.last_actions();

        history.push(orchestrator.time(), &obs, actions);
        transitions.record(
            state,
            StandardAction::from_actions(actions),
            StandardState::from_observation(&obs, step as u64),
            None,
            step == num_steps,
        );

        if step == 1 || step % STATUS_INTERVAL == 0 {
            log::info!(
                "Step {:3}: SOC_BFG={:.3}, P_BFG={:.1} kPa, Si={:.3}%, Wind={:.0}",
                step,
                obs.soc_bfg,
                obs.p_bfg,
                obs.si,
                actions.furnace.wind_volume,
            );
        }
    }

    log::info!("Simulation completed");
    Ok(SimulationOutput {
        history,
        transitions,
    })
}

/// Loads a TOML configuration, or the defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(SimulationConfig::default()),
    }
}

/// Writes the recorded transitions as JSON.
pub fn export_transitions(transitions: &TransitionRecorder, path: &Path) -> Result<()> {
    transitions
        .export(path)
        .with_context(|| format!("failed to export transitions to {}", path.display()))
}

/// Writes the history as pretty-printed JSON.
pub fn export_history(history: &SimulationHistory, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), history)
        .with_context(|| format!("failed to write history to {}", path.display()))
}
