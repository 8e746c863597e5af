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

//! By-product gas types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three by-product gases buffered in a holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasKind {
    /// Blast-furnace gas.
    Bfg,
    /// Converter (basic-oxygen-furnace) gas.
    Bofg,
    /// Coke-oven gas.
    Cog,
}

impl GasKind {
    /// All gas types, in network order.
    pub const ALL: [GasKind; 3] = [GasKind::Bfg, GasKind::Bofg, GasKind::Cog];

    /// Lowercase tag used to match demand labels and record keys.
    pub fn tag(self) -> &'static str {
        match self {
            GasKind::Bfg => "bfg",
            GasKind::Bofg => "bofg",
            GasKind::Cog => "cog",
        }
    }

    /// Parses a tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "bfg" => Some(GasKind::Bfg),
            "bofg" => Some(GasKind::Bofg),
            "cog" => Some(GasKind::Cog),
            _ => None,
        }
    }

    /// Returns true if a demand label belongs to this gas.
    ///
    /// Matching is a case-insensitive substring test. `"bofg"` contains
    /// `"bfg"` neither as a prefix nor as a substring, so the tags never
    /// collide.
    pub fn matches_label(self, label: &str) -> bool {
        label.to_ascii_lowercase().contains(self.tag())
    }
}

impl fmt::Display for GasKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GasKind::Bfg => "BFG",
            GasKind::Bofg => "BOFG",
            GasKind::Cog => "COG",
        };
        write!(f, "{}", name)
    }
}
