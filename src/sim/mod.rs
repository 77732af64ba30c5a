//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Caller-supplied `dt` only, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (insertion order, mark-then-filter removal)
//! - No rendering, audio or platform dependencies

pub mod asteroid;
pub mod bullet;
pub mod collision;
pub mod event;
pub mod particle;
pub mod player;
pub mod powerup;
pub mod score;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use asteroid::{Asteroid, AsteroidKind, AsteroidVariant, Explosion};
pub use bullet::Bullet;
pub use collision::{bullet_hits_asteroid, resolve_bullet_hits, resolve_player_hit};
pub use event::{GameEvent, GameStats};
pub use particle::Particle;
pub use player::{Controls, Player, WeaponMode};
pub use powerup::{PowerUp, PowerUpKind};
pub use score::{ScoreTracker, score_for_size};
pub use snapshot::{AsteroidView, BulletView, PlayerView, PowerUpView, WorldSnapshot};
pub use spawner::{EntityIds, Spawner};
pub use state::{GamePhase, GameState, Slowdown};
pub use tick::{TickInput, tick};
