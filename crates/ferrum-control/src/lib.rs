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

//! The coordination layer of the plant control loop.
//!
//! The [`Orchestrator`] owns the agents, the message bus, the twins and the
//! [`GasNetwork`], and advances them one tick at a time. Around it sit the
//! scoring ([`reward`]) and logging ([`recorder`]) used to evaluate runs.

#![warn(missing_docs)]

pub mod config;
pub mod fallback;
pub mod gas_network;
pub mod metrics;
pub mod orchestrator;
pub mod recorder;
pub mod registry;
pub mod reward;
pub mod translator;

pub use config::{
    ConfigError, GasNetworkConfig, HolderModelsConfig, OrchestratorConfig, SimulationConfig,
};
pub use fallback::SimplifiedFurnace;
pub use gas_network::{GasNetwork, GasNetworkState, HolderState};
pub use metrics::{MetricId, MetricStore, RingBuffer};
pub use orchestrator::Orchestrator;
pub use recorder::{ExportError, TransitionRecorder};
pub use registry::AgentRegistry;
pub use reward::{calculate_reward, EpisodeMetrics};
