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

//! Simplified furnace dynamics, used when no furnace twin is attached or
//! the attached one fails.

use ferrum_core::agent::FurnaceControl;
use ferrum_core::control::clamp;
use ferrum_core::Observation;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// Silicon random-walk bounds [%].
const SI_MIN: f64 = 0.3;
const SI_MAX: f64 = 0.6;

/// Standard deviation of the per-tick silicon step [%].
const SI_NOISE: f64 = 0.01;

/// Wind-driven furnace output with a seeded silicon random walk.
#[derive(Debug, Clone)]
pub struct SimplifiedFurnace {
    seed: u64,
    rng: StdRng,
}

impl SimplifiedFurnace {
    /// Creates the model with a fixed seed, so runs are reproducible.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advances the furnace by one tick.
    ///
    /// Pig iron is `wind / 20`, BFG is `wind * 25`, and silicon takes a
    /// normal step kept inside `[0.3, 0.6]`.
    pub fn step(&mut self, control: &FurnaceControl, obs: &mut Observation) {
        let wind = control.wind_volume;
        obs.pig_iron_production = wind / 20.0;
        obs.bfg_supply = wind * 25.0;
        obs.si = clamp(obs.si + SI_NOISE * self.standard_normal(), SI_MIN, SI_MAX);
    }

    /// Restarts the random walk from the configured seed.
    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    // Box-Muller transform.
    fn standard_normal(&mut self) -> f64 {
        let u1: f64 = 1.0 - self.rng.gen::<f64>();
        let u2: f64 = self.rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_sets_production() {
        let mut furnace = SimplifiedFurnace::new(42);
        let mut obs = Observation::default();
        let control = FurnaceControl {
            wind_volume: 4400.0,
            ..Default::default()
        };
        furnace.step(&control, &mut obs);
        assert_eq!(obs.pig_iron_production, 220.0);
        assert_eq!(obs.bfg_supply, 110000.0);
    }

    #[test]
    fn test_silicon_stays_in_band() {
        let mut furnace = SimplifiedFurnace::new(7);
        let mut obs = Observation::default();
        for _ in 0..2000 {
            furnace.step(&FurnaceControl::default(), &mut obs);
            assert!((SI_MIN..=SI_MAX).contains(&obs.si));
        }
    }

    #[test]
    fn test_same_seed_same_walk() {
        let walk = |furnace: &mut SimplifiedFurnace| {
            let mut obs = Observation::default();
            (0..50)
                .map(|_| {
                    furnace.step(&FurnaceControl::default(), &mut obs);
                    obs.si
                })
                .collect::<Vec<_>>()
        };
        let mut a = SimplifiedFurnace::new(3);
        let mut b = SimplifiedFurnace::new(3);
        let first = walk(&mut a);
        assert_eq!(first, walk(&mut b));

        a.reset();
        assert_eq!(first, walk(&mut a));
    }
}
