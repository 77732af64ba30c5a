//! Score keeping with a kill-streak multiplier

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Points for destroying an asteroid of the given size: smaller is worth more
pub fn score_for_size(size: f32, multiplier: u32) -> u64 {
    let base = if size >= 40.0 {
        100
    } else if size >= 20.0 {
        200
    } else {
        300
    };
    base * u64::from(multiplier)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTracker {
    pub value: u64,
    /// Applied to every award; may be set directly
    pub multiplier: u32,
    /// Kills in the current streak
    pub streak: u32,
    /// Seconds left before the streak lapses
    pub streak_timer: f32,
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self {
            value: 0,
            multiplier: 1,
            streak: 0,
            streak_timer: 0.0,
        }
    }
}

impl ScoreTracker {
    /// Add the points for one asteroid hit and return them
    pub fn award(&mut self, size: f32) -> u64 {
        let points = score_for_size(size, self.multiplier);
        self.value += points;
        points
    }

    /// Extend the kill streak, raising the multiplier every `streak_step` kills
    pub fn register_kill(&mut self, config: &GameConfig) {
        self.streak += 1;
        self.streak_timer = config.streak_window_secs;
        let step = config.streak_step.max(1);
        self.multiplier = (1 + self.streak / step).min(config.max_multiplier);
    }

    /// Count down the streak window; the streak ends when it runs out
    pub fn update(&mut self, dt: f32) {
        if self.streak_timer > 0.0 {
            self.streak_timer -= dt;
            if self.streak_timer <= 0.0 {
                self.streak_timer = 0.0;
                self.streak = 0;
                self.multiplier = 1;
            }
        }
    }
}
