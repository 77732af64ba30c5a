//! Cosmetic particles (exhaust, explosion debris)
//!
//! Never gameplay-affecting; carried so the renderer has something to draw.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{heading_vector, ticks};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks
    pub life: f32,
    pub size: f32,
}

impl Particle {
    pub fn new(pos: Vec2, angle_deg: f32, speed: f32, life: f32) -> Self {
        Self {
            pos,
            vel: heading_vector(angle_deg) * speed,
            life,
            size: 2.0,
        }
    }

    /// A particle flying off in a random direction
    pub fn burst<R: Rng + ?Sized>(pos: Vec2, min_speed: f32, max_speed: f32, rng: &mut R) -> Self {
        let angle = rng.random_range(0.0..360.0);
        let speed = rng.random_range(min_speed..max_speed);
        let life = rng.random_range(20.0..40.0);
        Self::new(pos, angle, speed, life)
    }

    /// A loose fragment with a random velocity of up to `spread` per axis
    pub fn fragment<R: Rng + ?Sized>(pos: Vec2, spread: f32, life: f32, rng: &mut R) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                rng.random_range(-spread..=spread),
                rng.random_range(-spread..=spread),
            ),
            life,
            size: 4.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        let t = ticks(dt);
        self.pos += self.vel * t;
        self.life -= t;
        self.size = (self.size - 0.05 * t).max(0.5);
    }

    pub fn alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Advance every particle and drop the dead ones
pub fn advance_all(particles: &mut Vec<Particle>, dt: f32) {
    for p in particles.iter_mut() {
        p.advance(dt);
    }
    particles.retain(Particle::alive);
}
