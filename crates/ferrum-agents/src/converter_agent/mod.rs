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

//! Acts as the **[A]gent** for the basic-oxygen converter.
//!
//! The converter produces BOFG in bursts while it blows. Its agent keeps
//! oxygen inside the safety band, holds steel temperature in a ±20 °C
//! deadband, and warns the gas holder shortly before a blow so the BOFG
//! holder can make room.

mod agent;

pub use agent::*;
