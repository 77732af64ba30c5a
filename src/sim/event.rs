//! Discrete events emitted by the simulation for UI, audio and persistence

use serde::{Deserialize, Serialize};

use super::powerup::PowerUpKind;

/// Summary of a finished (or ongoing) run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u64,
    pub level: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub asteroids_destroyed: u32,
    /// Simulated seconds, pauses excluded
    pub elapsed_secs: f32,
}

impl GameStats {
    /// Percentage of fired bullets that hit something
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.shots_hit as f32 / self.shots_fired as f32 * 100.0
        }
    }
}

/// Game events for UI/audio feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    LifeLost { remaining: u8 },
    GameOver(GameStats),
    /// Carries the level that just started
    LevelCleared { level: u32 },
    PowerupCollected { kind: PowerUpKind },
}
