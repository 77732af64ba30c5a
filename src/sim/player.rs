//! The player's ship

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::particle::{self, Particle};
use super::spawner::EntityIds;
use crate::config::GameConfig;
use crate::{heading_vector, normalize_degrees, ticks, wrap_modulo};

/// Angle between the nose and the rear corners of the hull (degrees)
const HULL_CORNER_ANGLE: f32 = 143.24;

/// Active weapon. Power-ups swap it for `powerup_duration` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponMode {
    #[default]
    Normal,
    Trishot,
    Quadshot,
    RicochetPiercing,
}

/// Held movement intents for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing in degrees, 0 = right
    pub angle: f32,
    /// Collision radius
    pub size: f32,
    pub thrusting: bool,
    pub invincible: bool,
    pub shield_active: bool,
    pub invincibility_timer: f32,
    /// Ticks left on the current weapon power-up
    pub powerup_timer: f32,
    /// Ticks until a broken shield comes back
    pub shield_recharge_timer: f32,
    pub weapon_mode: WeaponMode,
    pub exhaust: Vec<Particle>,
    /// Ticks left on the death animation
    pub explosion_timer: f32,
    pub debris: Vec<Particle>,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.0,
            size: config.player_size,
            thrusting: false,
            invincible: false,
            shield_active: config.start_with_shield,
            invincibility_timer: 0.0,
            powerup_timer: 0.0,
            shield_recharge_timer: 0.0,
            weapon_mode: WeaponMode::Normal,
            exhaust: Vec::new(),
            explosion_timer: 0.0,
            debris: Vec::new(),
        };
        player.reset_position(config);
        player
    }

    /// Back to the center, at rest, facing right, briefly invincible
    pub fn reset_position(&mut self, config: &GameConfig) {
        self.pos = Vec2::new(config.width / 2.0, config.height / 2.0);
        self.vel = Vec2::ZERO;
        self.angle = 0.0;
        self.thrusting = false;
        self.set_invincibility(config.respawn_invincibility);
    }

    /// Grant invincibility for at least `duration` ticks
    pub fn set_invincibility(&mut self, duration: f32) {
        self.invincible = true;
        self.invincibility_timer = self.invincibility_timer.max(duration);
    }

    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        controls: &Controls,
        config: &GameConfig,
        rng: &mut R,
    ) {
        let t = ticks(dt);
        self.update_timers(t, config);

        if controls.rotate_left {
            self.angle += config.rotation_speed * t;
        }
        if controls.rotate_right {
            self.angle -= config.rotation_speed * t;
        }
        self.angle = normalize_degrees(self.angle);

        self.thrusting = controls.thrust;
        if self.thrusting {
            self.vel += heading_vector(self.angle) * config.acceleration * t;
            self.vel = self.vel.clamp_length_max(config.max_speed);
            self.emit_exhaust(config, rng);
        }

        self.pos = wrap_modulo(self.pos + self.vel * t, config.width, config.height);
        particle::advance_all(&mut self.exhaust, dt);
    }

    fn update_timers(&mut self, t: f32, config: &GameConfig) {
        if self.invincibility_timer > 0.0 {
            self.invincibility_timer -= t;
            if self.invincibility_timer <= 0.0 {
                self.invincibility_timer = 0.0;
                self.invincible = false;
            }
        }
        if self.powerup_timer > 0.0 {
            self.powerup_timer -= t;
            if self.powerup_timer <= 0.0 {
                self.powerup_timer = 0.0;
                self.weapon_mode = WeaponMode::Normal;
            }
        }
        if !self.shield_active && self.shield_recharge_timer > 0.0 {
            self.shield_recharge_timer -= t;
            if self.shield_recharge_timer <= 0.0 {
                self.shield_recharge_timer = 0.0;
                self.shield_active = true;
                log::debug!(
                    "Shield recharged after {}s",
                    config.shield_recharge_secs
                );
            }
        }
    }

    fn emit_exhaust<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        let nozzle = self.pos - heading_vector(self.angle) * self.size * 1.2;
        let angle = self.angle + 180.0 + rng.random_range(-15.0f32..=15.0);
        let speed = rng.random_range(1.0f32..3.0) * 0.5;
        let life = rng.random_range(15.0..=30.0);
        self.exhaust.push(Particle::new(nozzle, angle, speed, life));
        if self.exhaust.len() > config.max_exhaust_particles {
            let excess = self.exhaust.len() - config.max_exhaust_particles;
            self.exhaust.drain(..excess);
        }
    }

    /// Nose, left and right corners of the hull in world space
    pub fn hull(&self) -> [Vec2; 3] {
        [
            self.pos + heading_vector(self.angle) * self.size,
            self.pos + heading_vector(self.angle + HULL_CORNER_ANGLE) * self.size * 0.6,
            self.pos + heading_vector(self.angle - HULL_CORNER_ANGLE) * self.size * 0.6,
        ]
    }

    /// Bullet headings for the current weapon, in degrees
    pub fn volley_angles(&self, config: &GameConfig) -> Vec<f32> {
        let a = self.angle;
        match self.weapon_mode {
            WeaponMode::Normal | WeaponMode::RicochetPiercing => vec![a],
            WeaponMode::Trishot => vec![a - config.trishot_spread, a, a + config.trishot_spread],
            WeaponMode::Quadshot => vec![a, a + 90.0, a + 180.0, a + 270.0],
        }
    }

    /// Fire one volley from the nose
    pub fn fire(&self, ids: &mut EntityIds, config: &GameConfig) -> Vec<Bullet> {
        self.volley_angles(config)
            .into_iter()
            .map(|angle| {
                let muzzle = self.pos + heading_vector(angle) * self.size;
                Bullet::new(ids.allocate(), muzzle, angle, config)
            })
            .collect()
    }

    pub fn ricochet_active(&self) -> bool {
        self.weapon_mode == WeaponMode::RicochetPiercing
    }

    /// Switch weapon for the power-up duration; replaces any current mode
    pub fn enable_weapon(&mut self, mode: WeaponMode, config: &GameConfig) {
        self.weapon_mode = mode;
        self.powerup_timer = config.powerup_duration;
    }

    pub fn enable_invincibility(&mut self, config: &GameConfig) {
        self.set_invincibility(config.powerup_duration);
    }

    pub fn activate_shield(&mut self) {
        self.shield_active = true;
        self.shield_recharge_timer = 0.0;
    }

    /// The shield soaks a hit: it breaks, starts recharging, and leaves a
    /// short invincibility window behind
    pub fn take_damage(&mut self, config: &GameConfig) {
        self.shield_active = false;
        self.shield_recharge_timer = config.shield_recharge_secs * crate::consts::REFERENCE_FPS;
        self.set_invincibility(config.shield_hit_invincibility);
        log::debug!("Shield absorbed a hit");
    }

    /// Start the death animation: hull shards plus a spray of sparks
    pub fn explode<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        self.explosion_timer = config.player_explosion_duration;
        self.thrusting = false;
        self.exhaust.clear();
        let life = config.player_explosion_duration;
        self.debris = self
            .hull()
            .iter()
            .map(|corner| Particle::fragment(*corner, 2.0, life, rng))
            .collect();
        let pos = self.pos;
        self.debris
            .extend((0..15).map(|_| Particle::burst(pos, 1.0, 3.0, rng)));
    }

    pub fn advance_explosion(&mut self, dt: f32) {
        if self.explosion_timer > 0.0 {
            self.explosion_timer = (self.explosion_timer - ticks(dt)).max(0.0);
        }
        particle::advance_all(&mut self.debris, dt);
    }
}
