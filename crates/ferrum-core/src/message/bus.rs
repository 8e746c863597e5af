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

use super::{Message, MessageKind};
use crate::agent::AgentId;

/// The per-tick message channel shared by all agents.
///
/// An ordered, append-only list plus the current simulation time. Single
/// writer: the orchestrator lends it mutably to one agent at a time.
#[derive(Debug, Default, Clone)]
pub struct MessageBus {
    messages: Vec<Message>,
    time: f64,
}

impl MessageBus {
    /// Creates an empty bus at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message.
    ///
    /// ## Arguments
    /// * `message` - The message to publish. Visible to every agent stepped after the sender.
    pub fn send(&mut self, message: Message) {
        log::trace!(
            "Bus: {:?} from {} to {:?} at t={:.1}",
            message.kind(),
            message.sender(),
            message.receiver(),
            message.timestamp()
        );
        self.messages.push(message);
    }

    /// Returns the messages addressed to `receiver` or broadcast, in send order.
    ///
    /// ## Arguments
    /// * `receiver` - The agent reading its inbox.
    /// * `kind` - Optional type filter.
    ///
    /// ## Returns
    /// Borrowed messages; the bus keeps ownership until it is cleared.
    pub fn messages_for(&self, receiver: AgentId, kind: Option<MessageKind>) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.receiver().includes(receiver))
            .filter(|m| kind.map_or(true, |k| m.kind() == k))
            .collect()
    }

    /// Drops every message. Called at the start of each tick.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Sets the current simulation time [min].
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// The current simulation time [min].
    pub fn time(&self) -> f64 {
        self.time
    }

    /// All messages in send order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Number of messages currently on the bus.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the bus holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
