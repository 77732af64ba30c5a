//! Bullets fired by the player or spawned by ricochet hits

use glam::Vec2;
use rand::Rng;

use crate::config::GameConfig;
use crate::{heading_vector, normalize_degrees, ticks, wrap_modulo};

#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Travel direction in degrees
    pub angle: f32,
    /// Units per tick
    pub speed: f32,
    /// Remaining lifetime in ticks
    pub lifetime: f32,
    pub radius: f32,
    /// Turns around on asteroid impact instead of stopping
    pub ricochet: bool,
    /// Survives asteroid impacts
    pub piercing: bool,
}

impl Bullet {
    /// Spawn positions just past an edge are wrapped onto the screen
    pub fn new(id: u32, pos: Vec2, angle: f32, config: &GameConfig) -> Self {
        Self {
            id,
            pos: wrap_modulo(pos, config.width, config.height),
            angle: normalize_degrees(angle),
            speed: config.bullet_speed,
            lifetime: config.bullet_lifetime,
            radius: config.bullet_radius,
            ricochet: false,
            piercing: false,
        }
    }

    /// A ricochet bullet: pierces and bounces off whatever it hits
    pub fn ricochet(id: u32, pos: Vec2, angle: f32, config: &GameConfig) -> Self {
        Self {
            radius: config.ricochet_bullet_radius,
            ricochet: true,
            piercing: true,
            ..Self::new(id, pos, angle, config)
        }
    }

    pub fn advance(&mut self, dt: f32, config: &GameConfig) {
        let t = ticks(dt);
        self.pos += heading_vector(self.angle) * self.speed * t;
        self.pos = wrap_modulo(self.pos, config.width, config.height);
        self.lifetime -= t;
    }

    pub fn expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    /// Called once per asteroid this bullet hits
    pub fn on_hit_asteroid<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.ricochet {
            let turn: f32 = rng.random_range(135.0..=225.0);
            self.angle = normalize_degrees(self.angle + turn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_bullet_moves_and_expires() {
        let config = GameConfig::default();
        let mut b = Bullet::new(1, Vec2::new(100.0, 100.0), 0.0, &config);
        b.advance(DT, &config);
        assert!((b.pos.x - 108.0).abs() < 1e-3);
        assert!((b.lifetime - 59.0).abs() < 1e-3);

        for _ in 0..58 {
            b.advance(DT, &config);
        }
        assert!(!b.expired());
        b.advance(2.0 * DT, &config);
        assert!(b.expired());
    }

    #[test]
    fn test_bullet_wraps_strictly() {
        let config = GameConfig::default();
        let mut b = Bullet::new(1, Vec2::new(config.width - 2.0, 5.0), 0.0, &config);
        b.advance(DT, &config);
        assert!((b.pos.x - 6.0).abs() < 1e-3);
        assert!(b.pos.x >= 0.0 && b.pos.x < config.width);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let config = GameConfig::default();
        let mut b = Bullet::new(1, Vec2::new(50.0, 50.0), 45.0, &config);
        b.advance(0.0, &config);
        assert_eq!(b.pos, Vec2::new(50.0, 50.0));
        assert_eq!(b.lifetime, config.bullet_lifetime);
    }

    #[test]
    fn test_ricochet_turns_on_hit() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut b = Bullet::ricochet(1, Vec2::ZERO, 10.0, &config);
        assert!(b.piercing);
        b.on_hit_asteroid(&mut rng);
        let turned = normalize_degrees(b.angle - 10.0);
        assert!((135.0..=225.0).contains(&turned), "turned by {turned}");

        let mut plain = Bullet::new(2, Vec2::ZERO, 10.0, &config);
        plain.on_hit_asteroid(&mut rng);
        assert_eq!(plain.angle, 10.0);
    }
}
