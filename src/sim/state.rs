//! Game state and world-level bookkeeping
//!
//! The world owns every entity collection plus score, lives, level and the
//! global slowdown. Everything random draws from one seeded generator, so a
//! seed plus an input sequence reproduces a run exactly.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asteroid::{Asteroid, AsteroidKind};
use super::bullet::Bullet;
use super::event::{GameEvent, GameStats};
use super::player::{Player, WeaponMode};
use super::powerup::{PowerUp, PowerUpKind};
use super::score::ScoreTracker;
use super::spawner::{EntityIds, Spawner};
use crate::config::GameConfig;
use crate::error::ConfigError;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (including the respawn countdown)
    Playing,
    /// Game is paused
    Paused,
    /// Out of lives
    GameOver,
}

/// Temporal slowdown: asteroids crawl while it runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Slowdown {
    pub active: bool,
    /// Seconds left
    pub remaining: f32,
}

impl Slowdown {
    /// Start (or restart) the slowdown
    pub fn start(&mut self, secs: f32) {
        self.active = secs > 0.0;
        self.remaining = secs.max(0.0);
    }

    pub fn update(&mut self, dt: f32) {
        if self.active {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                self.remaining = 0.0;
                self.active = false;
            }
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Immutable tuning shared with every entity update
    pub config: Arc<GameConfig>,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) spawner: Spawner,
    pub(crate) ids: EntityIds,
    pub phase: GamePhase,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    /// Never more than `config.powerup_cap`
    pub powerups: Vec<PowerUp>,
    pub score: ScoreTracker,
    pub lives: u8,
    /// Starts at 1
    pub level: u32,
    /// Ticks until the player respawns; 0 while alive
    pub respawn_timer: f32,
    pub slowdown: Slowdown,
    /// Shot and kill counters (score/level are filled in by `stats()`)
    pub stats: GameStats,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the last `drain_events`
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the default configuration
    pub fn new(seed: u64) -> Self {
        match Self::with_config(GameConfig::default(), seed) {
            Ok(state) => state,
            Err(e) => unreachable!("default config rejected: {e}"),
        }
    }

    /// Create a new game with a custom configuration
    pub fn with_config(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = Spawner::new(&config)?;
        let player = Player::new(&config);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            spawner,
            ids: EntityIds::default(),
            phase: GamePhase::Playing,
            player,
            bullets: Vec::new(),
            asteroids: Vec::new(),
            powerups: Vec::new(),
            score: ScoreTracker::default(),
            lives: config.starting_lives,
            level: 1,
            respawn_timer: 0.0,
            slowdown: Slowdown::default(),
            stats: GameStats::default(),
            time_ticks: 0,
            events: Vec::new(),
            config: Arc::new(config),
        };
        state.spawn_wave(state.config.initial_asteroids);
        log::info!("New game started with seed {seed}");
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.allocate()
    }

    /// Spawn `count` large asteroids at random positions
    pub fn spawn_wave(&mut self, count: u32) {
        let wave = self
            .spawner
            .spawn_asteroids(count, &mut self.ids, &self.config, &mut self.rng);
        self.asteroids.extend(wave);
    }

    /// Place a single asteroid, e.g. for scripted scenarios. Returns its id.
    pub fn spawn_asteroid_at(&mut self, kind: AsteroidKind, pos: Vec2, stage: u8) -> u32 {
        let id = self.ids.allocate();
        let size = self.config.asteroid_size_for_stage(stage);
        let asteroid = Asteroid::new(id, kind, pos, size, stage, &self.config, &mut self.rng);
        self.asteroids.push(asteroid);
        id
    }

    /// Place a power-up, e.g. for scripted scenarios. Respects the cap.
    pub fn spawn_powerup_at(&mut self, kind: PowerUpKind, pos: Vec2) -> Option<u32> {
        if self.powerups.len() >= self.config.powerup_cap {
            return None;
        }
        let id = self.ids.allocate();
        let powerup = PowerUp::new(id, kind, pos, &self.config, &mut self.rng);
        self.powerups.push(powerup);
        Some(id)
    }

    /// The player is dead and waiting to come back
    pub fn is_respawning(&self) -> bool {
        self.respawn_timer > 0.0
    }

    pub fn respawn_player(&mut self) {
        self.respawn_timer = 0.0;
        self.player.reset_position(&self.config);
        log::info!("Respawning player, {} lives left", self.lives);
    }

    /// Apply a collected power-up to the player or the world
    pub fn apply_powerup(&mut self, kind: PowerUpKind) {
        let config = Arc::clone(&self.config);
        match kind {
            PowerUpKind::Trishot => self.player.enable_weapon(WeaponMode::Trishot, &config),
            PowerUpKind::Quadshot => self.player.enable_weapon(WeaponMode::Quadshot, &config),
            PowerUpKind::Ricochet => {
                self.player.enable_weapon(WeaponMode::RicochetPiercing, &config)
            }
            PowerUpKind::Shield => self.player.activate_shield(),
            PowerUpKind::Invincibility => self.player.enable_invincibility(&config),
            PowerUpKind::TemporalSlowdown => self.slowdown.start(config.slowdown_secs),
        }
        log::info!("Player collected {kind:?}");
        self.events.push(GameEvent::PowerupCollected { kind });
    }

    /// Run statistics so far
    pub fn stats(&self) -> GameStats {
        GameStats {
            score: self.score.value,
            level: self.level,
            ..self.stats.clone()
        }
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert_eq!(state.asteroids.len(), 5);
        assert!(state.asteroids.iter().all(|a| a.stage == 3));
        assert!(state.player.invincible);
        assert!(!state.is_respawning());
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(7);
        let b = GameState::new(7);
        for (x, y) in a.asteroids.iter().zip(&b.asteroids) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.shape_offsets(), y.shape_offsets());
            assert_eq!(x.kind(), y.kind());
        }
    }

    #[test]
    fn test_entity_ids_unique() {
        let mut state = GameState::new(1);
        let id = state.spawn_asteroid_at(AsteroidKind::Plain, Vec2::ZERO, 1);
        let next = state.next_entity_id();
        assert!(next > id);
        let mut ids: Vec<u32> = state.asteroids.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), state.asteroids.len());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            starting_lives: 0,
            ..Default::default()
        };
        assert!(GameState::with_config(config, 1).is_err());
    }

    #[test]
    fn test_apply_powerups() {
        let mut state = GameState::new(3);
        state.apply_powerup(PowerUpKind::Quadshot);
        assert_eq!(state.player.weapon_mode, WeaponMode::Quadshot);
        state.apply_powerup(PowerUpKind::Ricochet);
        assert!(state.player.ricochet_active());
        state.apply_powerup(PowerUpKind::TemporalSlowdown);
        assert!(state.slowdown.active);
        assert_eq!(state.slowdown.remaining, state.config.slowdown_secs);
        assert_eq!(
            state.drain_events().len(),
            3,
            "one PowerupCollected per application"
        );
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_slowdown_expires() {
        let mut slowdown = Slowdown::default();
        slowdown.start(5.0);
        slowdown.update(4.0);
        assert!(slowdown.active);
        slowdown.update(1.5);
        assert!(!slowdown.active);
    }

    #[test]
    fn test_powerup_placement_capped() {
        let mut state = GameState::new(9);
        for _ in 0..state.config.powerup_cap {
            assert!(state.spawn_powerup_at(PowerUpKind::Shield, Vec2::ZERO).is_some());
        }
        assert!(state.spawn_powerup_at(PowerUpKind::Shield, Vec2::ZERO).is_none());
    }
}
