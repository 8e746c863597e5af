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

//! Append-only log of `(s, a, s', r)` transitions with JSON export.

use crate::reward::{calculate_reward, EpisodeMetrics};
use ferrum_core::model::{Metadata, Reward, StandardAction, StandardState, Transition};
use serde_json::{json, Value};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors raised while exporting transitions.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The destination could not be created or written.
    #[error("failed to write transitions: {0}")]
    Io(#[from] std::io::Error),
    /// The transitions could not be serialized.
    #[error("failed to serialize transitions: {0}")]
    Json(#[from] serde_json::Error),
}

/// Records transitions in order. Recorded transitions are never modified.
#[derive(Debug, Default)]
pub struct TransitionRecorder {
    transitions: Vec<Transition>,
    episodes: usize,
    current_episode_steps: usize,
}

impl TransitionRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transition.
    ///
    /// ## Arguments
    ///
    /// * `reward` - Score of the transition; computed with
    ///   [`calculate_reward`] when `None`.
    /// * `done` - Closes the current episode.
    ///
    /// ## Returns
    ///
    /// The recorded transition. Its `step` is its index in the log.
    pub fn record(
        &mut self,
        state: StandardState,
        action: StandardAction,
        next_state: StandardState,
        reward: Option<Reward>,
        done: bool,
    ) -> &Transition {
        let reward = reward.unwrap_or_else(|| calculate_reward(&state, &action, &next_state));
        let step = self.transitions.len();
        self.transitions.push(Transition {
            step,
            state,
            action,
            next_state,
            reward,
            done,
            info: Metadata::new(),
        });

        self.current_episode_steps += 1;
        if done {
            self.episodes += 1;
            self.current_episode_steps = 0;
            log::debug!("TransitionRecorder: episode {} closed at step {}", self.episodes, step);
        }
        &self.transitions[step]
    }

    /// Number of transitions recorded.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Completed episodes.
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Steps recorded since the last completed episode.
    pub fn current_episode_steps(&self) -> usize {
        self.current_episode_steps
    }

    /// All transitions, oldest first.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The last `n` transitions, or all of them if fewer were recorded.
    pub fn last_n(&self, n: usize) -> &[Transition] {
        let start = self.transitions.len().saturating_sub(n);
        &self.transitions[start..]
    }

    /// Rewards in recording order.
    pub fn rewards(&self) -> impl Iterator<Item = &Reward> {
        self.transitions.iter().map(|t| &t.reward)
    }

    /// Aggregates over every recorded reward, or `None` before the first record.
    pub fn metrics(&self) -> Option<EpisodeMetrics> {
        if self.transitions.is_empty() {
            None
        } else {
            Some(EpisodeMetrics::from_rewards(self.rewards()))
        }
    }

    /// Multi-line human-readable summary.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// The export document: `{transitions, metrics, metadata}`.
    ///
    /// `metrics` is an empty object when nothing was recorded.
    pub fn to_json(&self) -> Result<Value, ExportError> {
        let metrics = match self.metrics() {
            Some(m) => serde_json::to_value(m)?,
            None => json!({}),
        };
        Ok(json!({
            "transitions": serde_json::to_value(&self.transitions)?,
            "metrics": metrics,
            "metadata": {
                "total_transitions": self.transitions.len(),
                "episodes": self.episodes,
            },
        }))
    }

    /// Writes the export document as pretty-printed JSON.
    pub fn export_to_writer<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(writer, &self.to_json()?)?;
        Ok(())
    }

    /// Writes the export document to `path`, replacing any existing file.
    pub fn export(&self, path: &Path) -> Result<(), ExportError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.export_to_writer(&mut writer)?;
        writer.flush()?;
        log::info!(
            "Exported {} transitions to {}",
            self.transitions.len(),
            path.display()
        );
        Ok(())
    }
}

impl fmt::Display for TransitionRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(m) = self.metrics() else {
            return f.write_str("No transitions recorded yet.");
        };

        writeln!(f, "Transition recorder summary:")?;
        writeln!(f, "  Total transitions: {}", self.transitions.len())?;
        writeln!(f, "  Episodes completed: {}", self.episodes)?;
        writeln!(f, "  Current episode steps: {}", self.current_episode_steps)?;
        writeln!(f, "Reward metrics:")?;
        writeln!(f, "  Mean total reward: {:.3}", m.mean_total)?;
        writeln!(f, "  Cumulative reward: {:.2}", m.cumulative_reward)?;
        writeln!(f, "  Mean production: {:.3}", m.mean_production)?;
        writeln!(f, "  Mean stability: {:.3}", m.mean_stability)?;
        writeln!(f, "  Mean efficiency: {:.3}", m.mean_efficiency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_n(recorder: &mut TransitionRecorder, n: usize, done_at: Option<usize>) {
        for i in 0..n {
            recorder.record(
                StandardState::new(i as u64),
                StandardAction::default(),
                StandardState::new(i as u64 + 1),
                None,
                done_at == Some(i),
            );
        }
    }

    #[test]
    fn test_steps_are_indices() {
        let mut recorder = TransitionRecorder::new();
        record_n(&mut recorder, 5, None);
        let steps: Vec<usize> = recorder.transitions().iter().map(|t| t.step).collect();
        assert_eq!(steps, vec![0, 1, 2, 3, 4]);
        assert_eq!(recorder.last_n(2)[0].step, 3);
        assert_eq!(recorder.last_n(10).len(), 5);
    }

    #[test]
    fn test_reward_computed_when_absent() {
        let mut recorder = TransitionRecorder::new();
        let t = recorder.record(
            StandardState::new(0),
            StandardAction::default(),
            StandardState::new(1),
            None,
            false,
        );
        let expected = calculate_reward(
            &StandardState::new(0),
            &StandardAction::default(),
            &StandardState::new(1),
        );
        assert_eq!(t.reward, expected);

        let given = Reward {
            total: 0.42,
            ..Default::default()
        };
        let t = recorder.record(
            StandardState::new(1),
            StandardAction::default(),
            StandardState::new(2),
            Some(given.clone()),
            false,
        );
        assert_eq!(t.reward, given);
    }

    #[test]
    fn test_episode_counting() {
        let mut recorder = TransitionRecorder::new();
        record_n(&mut recorder, 4, Some(2));
        assert_eq!(recorder.episodes(), 1);
        assert_eq!(recorder.current_episode_steps(), 1);
    }

    #[test]
    fn test_summary() {
        let mut recorder = TransitionRecorder::new();
        assert_eq!(recorder.summary(), "No transitions recorded yet.");
        record_n(&mut recorder, 3, None);
        assert!(recorder.summary().contains("Total transitions: 3"));
    }

    #[test]
    fn test_display_matches_summary() {
        let mut recorder = TransitionRecorder::new();
        record_n(&mut recorder, 2, None);
        let text = format!("{recorder}");
        assert_eq!(text, recorder.summary());
        assert!(text.starts_with("Transition recorder summary:\n"));
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 10);
    }

    #[test]
    fn test_export_document_shape() {
        let mut recorder = TransitionRecorder::new();
        assert_eq!(recorder.to_json().unwrap()["metrics"], json!({}));

        record_n(&mut recorder, 3, Some(2));
        let mut buffer = Vec::new();
        recorder.export_to_writer(&mut buffer).unwrap();
        let doc: Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(doc["transitions"].as_array().map(Vec::len), Some(3));
        assert_eq!(doc["metadata"]["total_transitions"], 3);
        assert_eq!(doc["metadata"]["episodes"], 1);
        assert!(doc["metrics"]["mean_total"].is_number());
        assert_eq!(doc["transitions"][2]["done"], true);
        assert!(doc["transitions"][0]["reward"]["breakdown"].is_object());
    }
}
