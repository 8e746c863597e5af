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

//! Control primitives and safety limits shared by every agent.
//!
//! Everything in [`rules`] is a pure function of its arguments. Agents own
//! their hysteresis flags and setpoints; the primitives only compute.

pub mod limits;
pub mod rules;

pub use limits::{
    CokeOvenLimits, ConverterLimits, FurnaceLimits, HolderLimits, SafetyLimits, SAFETY_LIMITS,
};
pub use rules::{
    clamp, hysteresis_check, incremental_adjust, priority_allocate, Direction, HysteresisFlag,
    HysteresisOutcome, HysteresisReason, Limit,
};
