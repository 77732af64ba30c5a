//! Game tuning and world configuration
//!
//! Built once at startup, validated, then shared read-only with the world.
//! Any subset of fields may be supplied as JSON; the rest keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::PowerUpKind;

/// Relative spawn chances for the special asteroid variants.
/// Plain asteroids take whatever probability mass is left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnWeights {
    pub exploding: f32,
    pub shielded: f32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            exploding: 0.05,
            shielded: 0.08,
        }
    }
}

impl SpawnWeights {
    /// Weight left over for plain asteroids
    pub fn plain(&self) -> f32 {
        (1.0 - self.exploding - self.shielded).max(0.0)
    }
}

/// Game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    // === Screen ===
    pub width: f32,
    pub height: f32,

    // === Player ===
    /// Collision radius of the ship
    pub player_size: f32,
    /// Degrees per tick while a rotate intent is held
    pub rotation_speed: f32,
    /// Velocity added per tick of thrust
    pub acceleration: f32,
    pub max_speed: f32,
    pub starting_lives: u8,
    /// Ticks between death and respawn
    pub respawn_delay: f32,
    /// Invincibility ticks granted on respawn and level clear
    pub respawn_invincibility: f32,
    /// Invincibility ticks granted when the shield absorbs a hit
    pub shield_hit_invincibility: f32,
    /// Seconds until a broken shield comes back
    pub shield_recharge_secs: f32,
    pub start_with_shield: bool,
    /// Ticks the player explosion animation plays
    pub player_explosion_duration: f32,
    pub max_exhaust_particles: usize,

    // === Bullets ===
    pub bullet_speed: f32,
    /// Lifetime in ticks
    pub bullet_lifetime: f32,
    pub bullet_radius: f32,
    pub ricochet_bullet_radius: f32,
    /// Angle between trishot bullets (degrees)
    pub trishot_spread: f32,

    // === Asteroids ===
    /// Size of a stage-3 asteroid; each split halves it
    pub large_asteroid_size: f32,
    pub asteroid_min_speed: f32,
    pub asteroid_max_speed: f32,
    pub asteroid_min_sides: u32,
    pub asteroid_max_sides: u32,
    /// Max offset of split children from the parent center, per axis
    pub split_jitter: i32,
    pub explosion_radius: f32,
    /// Ticks the explosion animation plays before removal
    pub explosion_duration: f32,
    pub asteroid_shield_hp: u8,
    /// Asteroid speed multiplier while temporal slowdown is active
    pub slowdown_factor: f32,
    pub spawn_weights: SpawnWeights,

    // === Power-ups ===
    pub powerup_cap: usize,
    /// Chance that a destroyed asteroid drops a power-up
    pub powerup_chance: f32,
    pub powerup_radius: f32,
    /// Max drift speed per axis (units per tick)
    pub powerup_drift: f32,
    /// Seconds before an uncollected power-up disappears
    pub powerup_ttl_secs: f32,
    /// Seconds before expiry when the power-up starts blinking
    pub powerup_blink_secs: f32,
    /// Weapon mode / invincibility power-up duration in ticks
    pub powerup_duration: f32,
    pub slowdown_secs: f32,
    pub powerup_kinds: Vec<PowerUpKind>,

    // === Waves ===
    pub initial_asteroids: u32,
    pub wave_base: u32,
    pub wave_step: u32,

    // === Score streak ===
    /// Seconds without a kill before the multiplier resets
    pub streak_window_secs: f32,
    /// Kills needed per multiplier step
    pub streak_step: u32,
    pub max_multiplier: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 1360.0,
            height: 768.0,

            player_size: 20.0,
            rotation_speed: 5.0,
            acceleration: 0.1,
            max_speed: 5.0,
            starting_lives: 3,
            respawn_delay: 30.0,
            respawn_invincibility: 120.0,
            shield_hit_invincibility: 60.0,
            shield_recharge_secs: 30.0,
            start_with_shield: true,
            player_explosion_duration: 30.0,
            max_exhaust_particles: 64,

            bullet_speed: 8.0,
            bullet_lifetime: 60.0,
            bullet_radius: 5.0,
            ricochet_bullet_radius: 14.0,
            trishot_spread: 15.0,

            large_asteroid_size: 80.0,
            asteroid_min_speed: 2.0,
            asteroid_max_speed: 4.0,
            asteroid_min_sides: 7,
            asteroid_max_sides: 12,
            split_jitter: 5,
            explosion_radius: 200.0,
            explosion_duration: 40.0,
            asteroid_shield_hp: 3,
            slowdown_factor: 0.3,
            spawn_weights: SpawnWeights::default(),

            powerup_cap: 3,
            powerup_chance: 0.1,
            powerup_radius: 15.0,
            powerup_drift: 1.5,
            powerup_ttl_secs: 15.0,
            powerup_blink_secs: 5.0,
            powerup_duration: 300.0,
            slowdown_secs: 5.0,
            powerup_kinds: PowerUpKind::ALL.to_vec(),

            initial_asteroids: 5,
            wave_base: 5,
            wave_step: 2,

            streak_window_secs: 3.0,
            streak_step: 5,
            max_multiplier: 5,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Asteroids spawned when `level` starts
    pub fn wave_size(&self, level: u32) -> u32 {
        self.wave_base + level * self.wave_step
    }

    /// Size of an asteroid at the given stage (3 = large)
    pub fn asteroid_size_for_stage(&self, stage: u8) -> f32 {
        let halvings = 3u8.saturating_sub(stage) as i32;
        (self.large_asteroid_size / 2f32.powi(halvings)).floor()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be positive, got {v}")))
            }
        }
        fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be >= 0, got {v}")))
            }
        }
        fn probability(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be within [0, 1], got {v}")))
            }
        }

        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("player_size", self.player_size)?;
        non_negative("rotation_speed", self.rotation_speed)?;
        non_negative("acceleration", self.acceleration)?;
        positive("max_speed", self.max_speed)?;
        if self.starting_lives == 0 {
            return Err(ConfigError::invalid("starting_lives", "must be at least 1"));
        }
        non_negative("respawn_delay", self.respawn_delay)?;
        non_negative("respawn_invincibility", self.respawn_invincibility)?;
        non_negative("shield_hit_invincibility", self.shield_hit_invincibility)?;
        non_negative("shield_recharge_secs", self.shield_recharge_secs)?;
        non_negative("player_explosion_duration", self.player_explosion_duration)?;

        positive("bullet_speed", self.bullet_speed)?;
        positive("bullet_lifetime", self.bullet_lifetime)?;
        non_negative("trishot_spread", self.trishot_spread)?;

        if !(self.large_asteroid_size.is_finite() && self.large_asteroid_size >= 4.0) {
            return Err(ConfigError::invalid(
                "large_asteroid_size",
                format!("must be at least 4, got {}", self.large_asteroid_size),
            ));
        }
        non_negative("asteroid_min_speed", self.asteroid_min_speed)?;
        if !(self.asteroid_max_speed.is_finite() && self.asteroid_max_speed > self.asteroid_min_speed) {
            return Err(ConfigError::invalid(
                "asteroid_max_speed",
                "must be finite and greater than asteroid_min_speed",
            ));
        }
        if self.asteroid_min_sides < 3 || self.asteroid_max_sides < self.asteroid_min_sides {
            return Err(ConfigError::invalid(
                "asteroid_min_sides",
                "need 3 <= asteroid_min_sides <= asteroid_max_sides",
            ));
        }
        if self.split_jitter < 0 {
            return Err(ConfigError::invalid("split_jitter", "must be >= 0"));
        }
        non_negative("explosion_radius", self.explosion_radius)?;
        non_negative("explosion_duration", self.explosion_duration)?;
        probability("slowdown_factor", self.slowdown_factor)?;

        let w = self.spawn_weights;
        probability("spawn_weights.exploding", w.exploding)?;
        probability("spawn_weights.shielded", w.shielded)?;
        if w.exploding + w.shielded > 1.0 {
            return Err(ConfigError::Weights(format!(
                "special variants sum to {} (> 1)",
                w.exploding + w.shielded
            )));
        }

        probability("powerup_chance", self.powerup_chance)?;
        positive("powerup_radius", self.powerup_radius)?;
        non_negative("powerup_drift", self.powerup_drift)?;
        positive("powerup_ttl_secs", self.powerup_ttl_secs)?;
        non_negative("powerup_blink_secs", self.powerup_blink_secs)?;
        non_negative("powerup_duration", self.powerup_duration)?;
        non_negative("slowdown_secs", self.slowdown_secs)?;

        non_negative("streak_window_secs", self.streak_window_secs)?;
        if self.max_multiplier == 0 {
            return Err(ConfigError::invalid("max_multiplier", "must be at least 1"));
        }

        Ok(())
    }
}
