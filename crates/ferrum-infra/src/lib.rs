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

//! Concrete implementations of the collaborators the control loop plugs in.
//!
//! - [`holders`]: discrete linear state-space models refining holder levels.
//! - [`twins`]: reference blast-furnace, converter and coke-oven twins built
//!   from the plant's mass balances.

#![warn(missing_docs)]

pub mod holders;
pub mod twins;

pub use holders::{StateSpaceHolder, StateSpaceParams};
pub use twins::{
    coke_oven_twin, converter_twin, furnace_twin, CokeOvenBalance, ConverterBalance, FurnaceBalance,
};
