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

//! Typed payloads carried on the [`MessageBus`](super::MessageBus).
//!
//! Each payload converts to a [`Message`] with the plant's wire keys and can
//! be read back with `from_message`, which returns `None` on a kind mismatch
//! or a missing field.

use super::{Message, MessageKind, Recipient};
use crate::agent::AgentId;
use crate::gas::GasKind;
use std::collections::BTreeMap;

/// Advance notice that the converter is about to start blowing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurgeWarning {
    /// Minutes until the blow starts.
    pub time_to_blow: f64,
    /// Expected peak BOFG production [m3/h].
    pub expected_peak: f64,
    /// Expected blow duration [min].
    pub duration: f64,
    /// BOFG holder state of charge when the warning was issued.
    pub gh_soc: f64,
}

impl SurgeWarning {
    /// Addresses the warning from the converter to the gas holder.
    pub fn to_message(&self, timestamp: f64) -> Message {
        Message::new(
            MessageKind::SurgeWarning,
            AgentId::Converter,
            AgentId::GasHolder,
            timestamp,
        )
        .with("time_to_blow", self.time_to_blow)
        .with("expected_peak", self.expected_peak)
        .with("duration", self.duration)
        .with("gh_soc", self.gh_soc)
    }

    /// Reads a warning back from a message.
    pub fn from_message(message: &Message) -> Option<Self> {
        if message.kind() != MessageKind::SurgeWarning {
            return None;
        }
        Some(Self {
            time_to_blow: message.number("time_to_blow")?,
            expected_peak: message.number("expected_peak")?,
            duration: message.number("duration")?,
            gh_soc: message.number("gh_soc")?,
        })
    }
}

/// A request for an allocation of gas from the holder network.
#[derive(Debug, Clone, PartialEq)]
pub struct GasRequest {
    /// The requesting agent.
    pub requester: AgentId,
    /// Which gas.
    pub gas: GasKind,
    /// Requested flow [m3/h].
    pub amount: f64,
    /// Higher is served first.
    pub priority: i32,
    /// Free-form use, e.g. `"injection"`.
    pub purpose: String,
}

impl GasRequest {
    /// Addresses the request to the gas holder.
    pub fn to_message(&self, timestamp: f64) -> Message {
        Message::new(
            MessageKind::Request,
            self.requester,
            AgentId::GasHolder,
            timestamp,
        )
        .with("gas_type", self.gas.tag())
        .with("amount", self.amount)
        .with("priority", self.priority)
        .with("purpose", self.purpose.as_str())
    }

    /// Reads a request back from a message. The requester is the sender.
    pub fn from_message(message: &Message) -> Option<Self> {
        if message.kind() != MessageKind::Request {
            return None;
        }
        let priority = message.payload().get("priority")?.as_i64()?;
        Some(Self {
            requester: message.sender(),
            gas: GasKind::from_tag(message.text("gas_type")?)?,
            amount: message.number("amount")?,
            priority: i32::try_from(priority).ok()?,
            purpose: message.text("purpose").unwrap_or_default().to_string(),
        })
    }
}

/// The holder's answer to a [`GasRequest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasResponse {
    /// Granted flow [m3/h].
    pub allocated: f64,
    /// Total flow that was shared out [m3/h].
    pub available: f64,
    /// `allocated / requested`, or 1.0 when nothing was requested.
    pub ratio: f64,
}

impl GasResponse {
    /// Addresses the response.
    pub fn to_message(&self, sender: AgentId, receiver: AgentId, timestamp: f64) -> Message {
        Message::new(MessageKind::Response, sender, receiver, timestamp)
            .with("allocated", self.allocated)
            .with("available", self.available)
            .with("ratio", self.ratio)
    }

    /// Reads a response back from a message.
    pub fn from_message(message: &Message) -> Option<Self> {
        if message.kind() != MessageKind::Response {
            return None;
        }
        Some(Self {
            allocated: message.number("allocated")?,
            available: message.number("available")?,
            ratio: message.number("ratio")?,
        })
    }
}

/// An agent publishing named values to everyone.
#[derive(Debug, Clone, PartialEq)]
pub struct StateBroadcast {
    /// Who is publishing.
    pub agent: AgentId,
    /// Published values.
    pub state: BTreeMap<String, f64>,
}

impl StateBroadcast {
    /// Addresses the broadcast to every agent.
    pub fn to_message(&self, timestamp: f64) -> Message {
        self.state.iter().fold(
            Message::new(
                MessageKind::Broadcast,
                self.agent,
                Recipient::Broadcast,
                timestamp,
            ),
            |msg, (key, value)| msg.with(key, *value),
        )
    }

    /// Reads a broadcast back. Non-numeric payload entries are skipped.
    pub fn from_message(message: &Message) -> Option<Self> {
        if message.kind() != MessageKind::Broadcast {
            return None;
        }
        let state = message
            .payload()
            .iter()
            .filter_map(|(k, v)| v.as_f64().map(|v| (k.clone(), v)))
            .collect();
        Some(Self {
            agent: message.sender(),
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surge_warning_wire_keys() {
        let warning = SurgeWarning {
            time_to_blow: 2.0,
            expected_peak: 60000.0,
            duration: 18.0,
            gh_soc: 0.5,
        };
        let msg = warning.to_message(4.0);
        assert_eq!(msg.kind(), MessageKind::SurgeWarning);
        assert_eq!(msg.receiver(), Recipient::Agent(AgentId::GasHolder));
        for key in ["time_to_blow", "expected_peak", "duration", "gh_soc"] {
            assert!(msg.payload().contains_key(key), "missing {}", key);
        }
        assert_eq!(SurgeWarning::from_message(&msg), Some(warning));
    }

    #[test]
    fn test_gas_request_reads_requester_from_sender() {
        let request = GasRequest {
            requester: AgentId::Furnace,
            gas: GasKind::Cog,
            amount: 8000.0,
            priority: 2,
            purpose: "injection".to_string(),
        };
        let msg = request.to_message(0.0);
        assert_eq!(msg.text("gas_type"), Some("cog"));
        assert_eq!(GasRequest::from_message(&msg), Some(request));
    }

    #[test]
    fn test_from_message_rejects_other_kinds() {
        let msg = GasResponse {
            allocated: 1.0,
            available: 2.0,
            ratio: 0.5,
        }
        .to_message(AgentId::GasHolder, AgentId::Furnace, 0.0);
        assert!(SurgeWarning::from_message(&msg).is_none());
        assert!(GasRequest::from_message(&msg).is_none());
        assert!(GasResponse::from_message(&msg).is_some());
    }

    #[test]
    fn test_broadcast_goes_to_everyone() {
        let broadcast = StateBroadcast {
            agent: AgentId::GasHolder,
            state: BTreeMap::from([("bfg_to_pp".to_string(), 50000.0)]),
        };
        let msg = broadcast.to_message(1.0);
        assert_eq!(msg.receiver(), Recipient::Broadcast);
        assert_eq!(StateBroadcast::from_message(&msg), Some(broadcast));
    }
}
