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

//! Inter-agent messaging.
//!
//! Messages live for one tick. The orchestrator clears the [`MessageBus`]
//! before any agent runs, so a message is visible to every agent stepped
//! after its sender in the same tick and is gone by the next one.

mod bus;
pub mod protocol;

pub use bus::*;

use crate::agent::AgentId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The type of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    /// Ask a holder for gas.
    Request,
    /// Answer to a request.
    Response,
    /// Advance notice of a gas production spike.
    SurgeWarning,
    /// Unsolicited state publication.
    Broadcast,
    /// Emergency notification.
    Alert,
}

/// Who a message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recipient {
    /// A single agent.
    Agent(AgentId),
    /// Every agent.
    Broadcast,
}

impl Recipient {
    /// Returns true if `agent` should see a message sent to this recipient.
    pub fn includes(&self, agent: AgentId) -> bool {
        match self {
            Recipient::Agent(id) => *id == agent,
            Recipient::Broadcast => true,
        }
    }
}

impl From<AgentId> for Recipient {
    fn from(id: AgentId) -> Self {
        Recipient::Agent(id)
    }
}

/// Named payload values.
pub type Payload = Map<String, Value>;

/// An immutable message between agents.
///
/// Build with [`Message::new`] and [`Message::with`], then hand it to
/// [`MessageBus::send`]. Fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    kind: MessageKind,
    sender: AgentId,
    receiver: Recipient,
    timestamp: f64,
    payload: Payload,
}

impl Message {
    /// Creates a message with an empty payload.
    pub fn new(
        kind: MessageKind,
        sender: AgentId,
        receiver: impl Into<Recipient>,
        timestamp: f64,
    ) -> Self {
        Self {
            kind,
            sender,
            receiver: receiver.into(),
            timestamp,
            payload: Payload::new(),
        }
    }

    /// Adds a payload entry.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    /// The message type.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// The sending agent.
    pub fn sender(&self) -> AgentId {
        self.sender
    }

    /// The addressee.
    pub fn receiver(&self) -> Recipient {
        self.receiver
    }

    /// Simulation time at which the message was created [min].
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// The full payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// A numeric payload entry, if present.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.payload.get(key).and_then(Value::as_f64)
    }

    /// A string payload entry, if present.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}
