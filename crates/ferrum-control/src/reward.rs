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

//! Multi-objective scoring of transitions.
//!
//! Three scores in `[0, 1]` are weighted into a total:
//!
//! - **production**: BFG output against a 140 000 Nm3/h ceiling.
//! - **stability**: distance of every holder SOC outside `[0.25, 0.85]`.
//! - **efficiency**: allocated gas over produced gas, best in `[0.7, 0.9]`.

use ferrum_core::model::{Reward, StandardAction, StandardState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// BFG production at which the production score saturates [Nm3/h].
pub const BFG_PRODUCTION_CEILING: f64 = 140000.0;

/// Lower edge of the comfortable SOC band.
pub const SOC_BAND_LOW: f64 = 0.25;
/// Upper edge of the comfortable SOC band.
pub const SOC_BAND_HIGH: f64 = 0.85;

const STABILITY_PENALTY_SCALE: f64 = 2.0;

const UTILIZATION_LOW: f64 = 0.7;
const UTILIZATION_HIGH: f64 = 0.9;
const OVER_UTILIZATION_SLOPE: f64 = 5.0;

const W_PRODUCTION: f64 = 0.4;
const W_STABILITY: f64 = 0.4;
const W_EFFICIENCY: f64 = 0.2;

fn out_of_band(soc: f64) -> f64 {
    if soc < SOC_BAND_LOW {
        SOC_BAND_LOW - soc
    } else if soc > SOC_BAND_HIGH {
        soc - SOC_BAND_HIGH
    } else {
        0.0
    }
}

fn efficiency(utilization: f64) -> f64 {
    if utilization < UTILIZATION_LOW {
        utilization / UTILIZATION_LOW
    } else if utilization <= UTILIZATION_HIGH {
        1.0
    } else {
        (1.0 - (utilization - UTILIZATION_HIGH) * OVER_UTILIZATION_SLOPE).max(0.0)
    }
}

/// Scores one transition.
///
/// Only the resulting state and the action count; `_state` is accepted so
/// callers can pass the full `(s, a, s')` triple.
///
/// ## Returns
///
/// The reward with a breakdown of `bf_bfg_supply`, `soc_penalty_total`, the
/// three SOCs, `utilization`, `total_supply` and `total_consumption`.
pub fn calculate_reward(
    _state: &StandardState,
    action: &StandardAction,
    next_state: &StandardState,
) -> Reward {
    let production = &next_state.production;
    let holders = &next_state.gas_holder;

    let bf_bfg = production.bf_bfg_supply;
    let production_score = (bf_bfg / BFG_PRODUCTION_CEILING).min(1.0);

    let soc_penalty: f64 = [holders.soc_bfg, holders.soc_bofg, holders.soc_cog]
        .into_iter()
        .map(out_of_band)
        .sum();
    let stability_score = (1.0 - soc_penalty * STABILITY_PENALTY_SCALE).max(0.0);

    let total_supply =
        production.bf_bfg_supply + production.bof_bofg_supply + production.coke_cog_supply;
    let total_consumption = action.gas_allocation.total();
    let utilization = total_consumption / (total_supply + 1e-6);
    let efficiency_score = efficiency(utilization);

    let total = W_PRODUCTION * production_score
        + W_STABILITY * stability_score
        + W_EFFICIENCY * efficiency_score;

    let breakdown = BTreeMap::from([
        ("bf_bfg_supply".to_string(), bf_bfg),
        ("soc_penalty_total".to_string(), soc_penalty),
        ("soc_bfg".to_string(), holders.soc_bfg),
        ("soc_bofg".to_string(), holders.soc_bofg),
        ("soc_cog".to_string(), holders.soc_cog),
        ("utilization".to_string(), utilization),
        ("total_supply".to_string(), total_supply),
        ("total_consumption".to_string(), total_consumption),
    ]);

    Reward {
        production_score,
        stability_score,
        efficiency_score,
        total,
        breakdown,
    }
}

/// Aggregate scores over an episode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EpisodeMetrics {
    /// Mean production score.
    pub mean_production: f64,
    /// Mean stability score.
    pub mean_stability: f64,
    /// Mean efficiency score.
    pub mean_efficiency: f64,
    /// Mean total.
    pub mean_total: f64,
    /// Population standard deviation of the total.
    pub std_total: f64,
    /// Sum of totals.
    pub cumulative_reward: f64,
    /// Lowest total.
    pub min_total: f64,
    /// Highest total.
    pub max_total: f64,
}

impl EpisodeMetrics {
    /// Aggregates rewards. All fields are zero for an empty slice.
    pub fn from_rewards<'a, I>(rewards: I) -> Self
    where
        I: IntoIterator<Item = &'a Reward>,
    {
        let rewards: Vec<&Reward> = rewards.into_iter().collect();
        if rewards.is_empty() {
            return Self::default();
        }
        let n = rewards.len() as f64;
        let mean = |f: fn(&Reward) -> f64| rewards.iter().map(|r| f(r)).sum::<f64>() / n;

        let mean_total = mean(|r| r.total);
        let variance = rewards
            .iter()
            .map(|r| (r.total - mean_total).powi(2))
            .sum::<f64>()
            / n;

        Self {
            mean_production: mean(|r| r.production_score),
            mean_stability: mean(|r| r.stability_score),
            mean_efficiency: mean(|r| r.efficiency_score),
            mean_total,
            std_total: variance.sqrt(),
            cumulative_reward: rewards.iter().map(|r| r.total).sum(),
            min_total: rewards.iter().map(|r| r.total).fold(f64::INFINITY, f64::min),
            max_total: rewards
                .iter()
                .map(|r| r.total)
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ferrum_core::model::{GasAllocation, GasHolderState, ProductionState};

    fn state(socs: [f64; 3], bfg: f64, bofg: f64, cog: f64) -> StandardState {
        StandardState {
            gas_holder: GasHolderState {
                soc_bfg: socs[0],
                soc_bofg: socs[1],
                soc_cog: socs[2],
                ..Default::default()
            },
            production: ProductionState {
                bf_bfg_supply: bfg,
                bof_bofg_supply: bofg,
                coke_cog_supply: cog,
                ..Default::default()
            },
            ..StandardState::new(1)
        }
    }

    fn action(total: f64) -> StandardAction {
        StandardAction {
            gas_allocation: GasAllocation {
                bfg_to_power_plant: total,
                bfg_to_heating: 0.0,
                bofg_to_power_plant: 0.0,
                cog_to_bf: 0.0,
                cog_to_heating: 0.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_nominal_transition() {
        let next = state([0.5, 0.5, 0.5], 70000.0, 20000.0, 10000.0);
        let r = calculate_reward(&StandardState::new(0), &action(80000.0), &next);
        assert_relative_eq!(r.production_score, 0.5, epsilon = 1e-12);
        assert_eq!(r.stability_score, 1.0);
        assert_eq!(r.efficiency_score, 1.0);
        assert_relative_eq!(r.total, 0.2 + 0.4 + 0.2, epsilon = 1e-12);
        assert_relative_eq!(r.breakdown["utilization"], 0.8, epsilon = 1e-9);
        assert_eq!(r.breakdown["total_supply"], 100000.0);
        assert_eq!(r.breakdown.len(), 8);
    }

    #[test]
    fn test_production_saturates() {
        let next = state([0.5, 0.5, 0.5], 300000.0, 0.0, 0.0);
        let r = calculate_reward(&StandardState::new(0), &action(240000.0), &next);
        assert_eq!(r.production_score, 1.0);
    }

    #[test]
    fn test_stability_band_edges() {
        let s0 = StandardState::new(0);
        let a = action(0.0);
        let inside = calculate_reward(&s0, &a, &state([0.25, 0.85, 0.5], 0.0, 0.0, 0.0));
        assert_eq!(inside.stability_score, 1.0);

        let outside = calculate_reward(&s0, &a, &state([0.15, 0.95, 0.5], 0.0, 0.0, 0.0));
        assert_relative_eq!(outside.breakdown["soc_penalty_total"], 0.2, epsilon = 1e-12);
        assert_relative_eq!(outside.stability_score, 0.6, epsilon = 1e-12);

        let far = calculate_reward(&s0, &a, &state([0.0, 1.0, 1.0], 0.0, 0.0, 0.0));
        assert_eq!(far.stability_score, 0.0);
    }

    #[test]
    fn test_efficiency_curve() {
        assert_relative_eq!(efficiency(0.35), 0.5, epsilon = 1e-12);
        assert_eq!(efficiency(0.7), 1.0);
        assert_eq!(efficiency(0.9), 1.0);
        assert_relative_eq!(efficiency(1.0), 0.5, epsilon = 1e-12);
        assert_eq!(efficiency(1.5), 0.0);
    }

    #[test]
    fn test_zero_supply_does_not_divide_by_zero() {
        let next = state([0.5, 0.5, 0.5], 0.0, 0.0, 0.0);
        let r = calculate_reward(&StandardState::new(0), &action(0.0), &next);
        assert_eq!(r.breakdown["utilization"], 0.0);
        assert_eq!(r.efficiency_score, 0.0);
        assert!(r.total.is_finite());
    }

    #[test]
    fn test_episode_metrics() {
        let rewards: Vec<Reward> = [0.2, 0.4, 0.6]
            .into_iter()
            .map(|total| Reward {
                production_score: 1.0,
                stability_score: 0.5,
                efficiency_score: 0.0,
                total,
                breakdown: BTreeMap::new(),
            })
            .collect();
        let m = EpisodeMetrics::from_rewards(&rewards);
        assert_relative_eq!(m.mean_total, 0.4, epsilon = 1e-12);
        assert_relative_eq!(m.cumulative_reward, 1.2, epsilon = 1e-12);
        assert_relative_eq!(m.std_total, (0.08f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_eq!(m.min_total, 0.2);
        assert_eq!(m.max_total, 0.6);
        assert_eq!(m.mean_production, 1.0);
        assert_eq!(m.mean_stability, 0.5);

        assert_eq!(EpisodeMetrics::from_rewards(&[]), EpisodeMetrics::default());
    }
}
