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

use ferrum_core::agent::HolderControl;
use ferrum_core::control::priority_allocate;
use ferrum_core::message::protocol::{GasRequest, GasResponse};
use ferrum_core::GasKind;
use std::collections::BTreeMap;

/// Shares each gas's current outflow among the requests for it.
///
/// Requests are grouped per gas and served by descending priority, ties in
/// arrival order. The returned responses line up with `requests`.
pub fn allocate_requests(requests: &[GasRequest], control: &HolderControl) -> Vec<GasResponse> {
    let mut responses = vec![
        GasResponse {
            allocated: 0.0,
            available: 0.0,
            ratio: 1.0,
        };
        requests.len()
    ];

    for gas in GasKind::ALL {
        let mut demands = BTreeMap::new();
        let mut priorities = BTreeMap::new();
        for (index, request) in requests.iter().enumerate() {
            if request.gas == gas {
                demands.insert(index, request.amount);
                priorities.insert(index, request.priority);
            }
        }
        if demands.is_empty() {
            continue;
        }

        let available = control.total_outflow(gas);
        for (index, allocated) in priority_allocate(available, &demands, &priorities) {
            let requested = requests[index].amount;
            responses[index] = GasResponse {
                allocated,
                available,
                ratio: if requested > 0.0 {
                    allocated / requested
                } else {
                    1.0
                },
            };
        }
    }

    responses
}
