//! Asteroids and their variants
//!
//! An asteroid's outline is generated once at spawn as offsets from its
//! center and only ever translated afterwards.

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particle::{self, Particle};
use super::spawner::{EntityIds, Spawner};
use crate::config::GameConfig;
use crate::{heading_vector, ticks, wrap_with_margin};

/// Angle between the nose and the rear corners of a shard triangle (degrees)
const SHARD_CORNER_ANGLE: f32 = 143.24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidKind {
    Plain,
    Exploding,
    Shielded,
}

impl AsteroidKind {
    /// Order matches the spawner's weight table
    pub const ALL: [AsteroidKind; 3] = [
        AsteroidKind::Plain,
        AsteroidKind::Exploding,
        AsteroidKind::Shielded,
    ];
}

/// Explosion sub-state of an exploding asteroid: idle until first hit,
/// then animating until `timer` runs out
#[derive(Debug, Clone)]
pub struct Explosion {
    pub radius: f32,
    pub exploding: bool,
    /// Remaining animation ticks
    pub timer: f32,
    pub fragments: Vec<Particle>,
    pub particles: Vec<Particle>,
}

#[derive(Debug, Clone)]
pub enum AsteroidVariant {
    Plain,
    Exploding(Explosion),
    Shielded { current_shield: u8 },
}

impl AsteroidVariant {
    pub fn new(kind: AsteroidKind, config: &GameConfig) -> Self {
        match kind {
            AsteroidKind::Plain => AsteroidVariant::Plain,
            AsteroidKind::Exploding => AsteroidVariant::Exploding(Explosion {
                radius: config.explosion_radius,
                exploding: false,
                timer: config.explosion_duration,
                fragments: Vec::new(),
                particles: Vec::new(),
            }),
            AsteroidKind::Shielded => AsteroidVariant::Shielded {
                current_shield: config.asteroid_shield_hp,
            },
        }
    }

    pub fn kind(&self) -> AsteroidKind {
        match self {
            AsteroidVariant::Plain => AsteroidKind::Plain,
            AsteroidVariant::Exploding(_) => AsteroidKind::Exploding,
            AsteroidVariant::Shielded { .. } => AsteroidKind::Shielded,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    /// Movement direction in degrees
    pub angle: f32,
    /// Units per tick before slowdown
    pub base_speed: f32,
    /// Collision radius
    pub size: f32,
    /// 3 = large, 2 = medium, 1 = small
    pub stage: u8,
    pub variant: AsteroidVariant,
    shape_offsets: Arc<[Vec2]>,
    /// Outline in world space, refreshed every advance
    pub shape: Vec<Vec2>,
}

impl Asteroid {
    pub fn new<R: Rng + ?Sized>(
        id: u32,
        kind: AsteroidKind,
        pos: Vec2,
        size: f32,
        stage: u8,
        config: &GameConfig,
        rng: &mut R,
    ) -> Self {
        let shape_offsets = jagged_outline(size, config, rng);
        let mut asteroid = Self {
            id,
            pos: wrap_with_margin(pos, config.width, config.height, size),
            angle: rng.random_range(0.0..360.0),
            base_speed: rng.random_range(config.asteroid_min_speed..config.asteroid_max_speed),
            size,
            stage,
            variant: AsteroidVariant::new(kind, config),
            shape_offsets,
            shape: Vec::new(),
        };
        asteroid.refresh_shape();
        asteroid
    }

    pub fn kind(&self) -> AsteroidKind {
        self.variant.kind()
    }

    /// Outline offsets relative to the center, fixed for the asteroid's life
    pub fn shape_offsets(&self) -> &[Vec2] {
        &self.shape_offsets
    }

    fn refresh_shape(&mut self) {
        let pos = self.pos;
        self.shape.clear();
        self.shape.extend(self.shape_offsets.iter().map(|o| pos + *o));
    }

    pub fn advance(&mut self, dt: f32, slowdown_active: bool, config: &GameConfig) {
        let factor = if slowdown_active {
            config.slowdown_factor
        } else {
            1.0
        };
        self.pos += heading_vector(self.angle) * self.base_speed * factor * ticks(dt);
        self.pos = wrap_with_margin(self.pos, config.width, config.height, self.size);
        self.refresh_shape();
    }

    pub fn is_exploding(&self) -> bool {
        matches!(&self.variant, AsteroidVariant::Exploding(e) if e.exploding)
    }

    /// Remaining shield points, 0 for unshielded asteroids
    pub fn shield(&self) -> u8 {
        match self.variant {
            AsteroidVariant::Shielded { current_shield } => current_shield,
            _ => 0,
        }
    }

    /// Spend one shield point. Returns true if the hit was absorbed.
    pub fn absorb_hit(&mut self) -> bool {
        match &mut self.variant {
            AsteroidVariant::Shielded { current_shield } if *current_shield > 0 => {
                *current_shield -= 1;
                true
            }
            _ => false,
        }
    }

    /// Start the explosion animation. Returns true only on the call that
    /// actually started it; later calls and non-exploding variants are no-ops.
    pub fn trigger_explosion<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let (pos, angle, size) = (self.pos, self.angle, self.size);
        let AsteroidVariant::Exploding(explosion) = &mut self.variant else {
            return false;
        };
        if explosion.exploding {
            return false;
        }
        explosion.exploding = true;

        let life = explosion.timer;
        let corners = [
            pos + heading_vector(angle) * size,
            pos + heading_vector(angle + SHARD_CORNER_ANGLE) * size * 0.6,
            pos + heading_vector(angle - SHARD_CORNER_ANGLE) * size * 0.6,
        ];
        explosion.fragments = corners
            .iter()
            .map(|c| Particle::fragment(*c, 4.0, life, rng))
            .collect();
        explosion.particles = (0..40)
            .map(|_| Particle::burst(pos, 2.0, 5.0, rng))
            .collect();
        true
    }

    /// Step the explosion animation. Returns true once it has finished and
    /// the asteroid should be removed.
    pub fn advance_explosion(&mut self, dt: f32) -> bool {
        match &mut self.variant {
            AsteroidVariant::Exploding(e) if e.exploding => {
                particle::advance_all(&mut e.fragments, dt);
                particle::advance_all(&mut e.particles, dt);
                e.timer -= ticks(dt);
                e.timer <= 0.0
            }
            _ => false,
        }
    }

    /// Break into two smaller asteroids near this one. Small asteroids
    /// leave nothing behind.
    pub fn split<R: Rng + ?Sized>(
        &self,
        spawner: &Spawner,
        ids: &mut EntityIds,
        config: &GameConfig,
        rng: &mut R,
    ) -> Vec<Asteroid> {
        if self.stage <= 1 {
            return Vec::new();
        }
        let size = (self.size / 2.0).floor();
        let jitter = config.split_jitter;
        (0..2)
            .map(|_| {
                let kind = spawner.roll_asteroid_kind(rng);
                let offset = Vec2::new(
                    rng.random_range(-jitter..=jitter) as f32,
                    rng.random_range(-jitter..=jitter) as f32,
                );
                Asteroid::new(
                    ids.allocate(),
                    kind,
                    self.pos + offset,
                    size,
                    self.stage - 1,
                    config,
                    rng,
                )
            })
            .collect()
    }
}

/// Polygon with 7-12 corners, each pushed in or out by up to a third of `size`
fn jagged_outline<R: Rng + ?Sized>(size: f32, config: &GameConfig, rng: &mut R) -> Arc<[Vec2]> {
    let sides = rng.random_range(config.asteroid_min_sides..=config.asteroid_max_sides);
    let jitter = (size / 3.0).floor() as i32;
    (0..sides)
        .map(|i| {
            let theta = i as f32 / sides as f32 * std::f32::consts::TAU;
            let radius = size + rng.random_range(-jitter..=jitter) as f32;
            Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}
