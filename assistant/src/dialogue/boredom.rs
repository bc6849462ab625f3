//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use crate::config::BoredomConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Countdown to the next inner thought while nothing is happening
pub struct BoredomTimer {
    min_secs: f32,
    max_secs: f32,
    remaining: f32,
    rng: StdRng,
}

impl BoredomTimer {
    pub fn new(config: &BoredomConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn with_seed(config: &BoredomConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &BoredomConfig, rng: StdRng) -> Self {
        let min_secs = config.min_secs.max(0.0);
        let max_secs = config.max_secs.max(min_secs);
        let mut timer = Self {
            min_secs,
            max_secs,
            remaining: 0.0,
            rng,
        };
        timer.reset();
        timer
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Re-arm to a random duration in `[min_secs, max_secs]`
    pub fn reset(&mut self) {
        self.remaining = if self.max_secs > self.min_secs {
            self.rng.random_range(self.min_secs..=self.max_secs)
        } else {
            self.min_secs
        };
    }

    /// Count down while `idle`; returns true when the countdown ran out
    pub fn tick(&mut self, delta_time: f32, idle: bool) -> bool {
        if !idle {
            return false;
        }
        self.remaining -= delta_time.max(0.0);
        if self.remaining <= 0.0 {
            self.reset();
            tracing::debug!("Bored, next inner thought in {:.1}s", self.remaining);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BoredomConfig {
        BoredomConfig {
            min_secs: 2.0,
            max_secs: 4.0,
        }
    }

    #[test]
    fn test_armed_within_range() {
        let mut timer = BoredomTimer::with_seed(&config(), 7);
        for _ in 0..50 {
            timer.reset();
            assert!((2.0..=4.0).contains(&timer.remaining()));
        }
    }

    #[test]
    fn test_fires_and_rearms() {
        let mut timer = BoredomTimer::with_seed(&config(), 1);
        assert!(!timer.tick(1.0, true));
        assert!(timer.tick(5.0, true));
        assert!(timer.remaining() >= 2.0);
    }

    #[test]
    fn test_paused_while_busy() {
        let mut timer = BoredomTimer::with_seed(&config(), 3);
        let before = timer.remaining();
        assert!(!timer.tick(100.0, false));
        assert_eq!(timer.remaining(), before);
    }

    #[test]
    fn test_degenerate_range() {
        let mut timer = BoredomTimer::with_seed(
            &BoredomConfig {
                min_secs: 5.0,
                max_secs: 1.0,
            },
            0,
        );
        assert_eq!(timer.remaining(), 5.0);
        timer.reset();
        assert_eq!(timer.remaining(), 5.0);
    }
}
