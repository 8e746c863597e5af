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

//! Gas-holder level models.
//!
//! Each holder is a discrete linear system driven by its net gas flow:
//!
//! ```text
//! y_k     = C x_k + D u_k
//! x_{k+1} = A x_k + B u_k
//! ```
//!
//! Parameters are plain data ([`StateSpaceParams`]) built once at startup
//! and moved into the model, one preset per gas.

mod state_space;

pub use state_space::*;
