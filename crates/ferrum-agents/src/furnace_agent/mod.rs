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

//! Acts as the **[A]gent** for the blast furnace.
//!
//! The furnace is the primary unit: its hot-blast volume sets the BFG
//! production the whole gas network has to absorb. Each tick the agent:
//! - Clamps blast volume and enrichment and backs off heat input on
//!   over-temperature or excessive silicon (safety).
//! - Steers hot-metal silicon back into its band with opposing moves on
//!   injection, enrichment and blast (process).
//! - Throttles or boosts BFG production from the BFG holder's fill level
//!   and pressure, and compensates COG or oxygen shortfalls with coal
//!   injection (coordination).
//! - Trims blast volume during peak electricity prices (economics).

mod agent;

pub use agent::*;
