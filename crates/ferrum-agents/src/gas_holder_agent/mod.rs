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

//! Acts as the **[A]gent** for the gas-holder network.
//!
//! One agent steers the outflows of all three holders (BFG, BOFG, COG).
//! Each holder runs its own cascade every tick:
//! 1. Emergency over-pressure: open the outflows wide and skip the rest.
//! 2. Near-empty: close the outflows down and skip the rest.
//! 3. Out-of-band fill level or pressure: step the outflows.
//! 4. Mid-band (BFG only): drift the outflows back to nominal.
//!
//! A surge warning from the converter pre-empts the BOFG cascade. After the
//! cascades the agent answers any gas requests addressed to it, see
//! [`allocate_requests`].

mod agent;
mod arbitration;

pub use agent::*;
pub use arbitration::allocate_requests;
