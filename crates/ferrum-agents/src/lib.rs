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

//! The unit controllers.
//!
//! Every agent evaluates the same four tiers each tick, in order:
//! safety, process stability, energy coordination, economics. A later tier
//! may adjust a setpoint an earlier tier already touched.

#![warn(missing_docs)]

pub mod coke_oven_agent;
pub mod converter_agent;
pub mod furnace_agent;
pub mod gas_holder_agent;

pub use coke_oven_agent::CokeOvenAgent;
pub use converter_agent::ConverterAgent;
pub use furnace_agent::FurnaceAgent;
pub use gas_holder_agent::GasHolderAgent;

use ferrum_core::Agent;

/// The four plant agents in evaluation order, ready to register.
pub fn default_agents() -> Vec<Box<dyn Agent>> {
    vec![
        Box::new(FurnaceAgent::new()),
        Box::new(ConverterAgent::new()),
        Box::new(CokeOvenAgent::new()),
        Box::new(GasHolderAgent::new()),
    ]
}
