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

//! Foundational crate for the Ferrum plant control loop.
//!
//! `ferrum-core` holds everything the other crates agree on:
//!
//! - [`control`]: stateless control primitives and the plant safety table.
//! - [`message`]: the per-tick message bus and its typed payloads.
//! - [`agent`]: the [`Agent`](agent::Agent) contract and the control records agents emit.
//! - [`observation`]: the flat plant observation and the per-agent views of it.
//! - [`twin`]: the process-twin contract and the typed twin data structures.
//! - [`model`]: the standard state/action/reward records used for logging and learning.

#![warn(missing_docs)]

pub mod agent;
pub mod control;
pub mod gas;
pub mod message;
pub mod model;
pub mod observation;
pub mod twin;

pub use agent::{ActionSet, Agent, AgentAction, AgentId};
pub use gas::GasKind;
pub use message::{Message, MessageBus, MessageKind, Recipient};
pub use observation::Observation;
