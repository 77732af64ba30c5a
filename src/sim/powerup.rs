//! Power-ups dropped by destroyed asteroids

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::{ticks, wrap_modulo};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Trishot,
    Quadshot,
    Shield,
    Ricochet,
    Invincibility,
    TemporalSlowdown,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Trishot,
        PowerUpKind::Quadshot,
        PowerUpKind::Shield,
        PowerUpKind::Ricochet,
        PowerUpKind::Invincibility,
        PowerUpKind::TemporalSlowdown,
    ];

    /// Glyph drawn inside the power-up
    pub fn symbol(self) -> char {
        match self {
            PowerUpKind::Trishot => 'T',
            PowerUpKind::Quadshot => 'Q',
            PowerUpKind::Shield => 'S',
            PowerUpKind::Ricochet => 'R',
            PowerUpKind::Invincibility => 'I',
            PowerUpKind::TemporalSlowdown => 'Δ',
        }
    }
}

/// A drifting power-up waiting to be collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    /// Drift per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Seconds left before it disappears
    pub ttl: f32,
}

impl PowerUp {
    pub fn new<R: Rng + ?Sized>(
        id: u32,
        kind: PowerUpKind,
        pos: Vec2,
        config: &GameConfig,
        rng: &mut R,
    ) -> Self {
        let drift = config.powerup_drift;
        let vel = if drift > 0.0 {
            Vec2::new(
                rng.random_range(-drift..=drift),
                rng.random_range(-drift..=drift),
            )
        } else {
            Vec2::ZERO
        };
        Self {
            id,
            kind,
            pos: wrap_modulo(pos, config.width, config.height),
            vel,
            radius: config.powerup_radius,
            ttl: config.powerup_ttl_secs,
        }
    }

    pub fn advance(&mut self, dt: f32, config: &GameConfig) {
        self.pos = wrap_modulo(self.pos + self.vel * ticks(dt), config.width, config.height);
        self.ttl -= dt;
    }

    pub fn expired(&self) -> bool {
        self.ttl <= 0.0
    }

    /// Blink state: solid until the last `powerup_blink_secs`, then
    /// toggles five times a second
    pub fn visible(&self, config: &GameConfig) -> bool {
        if self.expired() {
            return false;
        }
        if self.ttl > config.powerup_blink_secs {
            return true;
        }
        let elapsed = config.powerup_ttl_secs - self.ttl;
        (elapsed * 5.0).floor() as i64 % 2 != 0
    }
}
