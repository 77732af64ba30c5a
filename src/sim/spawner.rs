//! Entity creation: id allocation, weighted asteroid variants, power-up drops

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::asteroid::{Asteroid, AsteroidKind};
use super::powerup::{PowerUp, PowerUpKind};
use crate::config::GameConfig;
use crate::error::ConfigError;

/// Monotonic entity id source shared by every collection in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone)]
pub struct Spawner {
    asteroid_kinds: WeightedIndex<f32>,
}

impl Spawner {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let w = config.spawn_weights;
        let asteroid_kinds = WeightedIndex::new([w.plain(), w.exploding, w.shielded])
            .map_err(|e| ConfigError::Weights(e.to_string()))?;
        Ok(Self { asteroid_kinds })
    }

    pub fn roll_asteroid_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> AsteroidKind {
        AsteroidKind::ALL[self.asteroid_kinds.sample(rng)]
    }

    /// A fresh wave of large asteroids at random positions
    pub fn spawn_asteroids<R: Rng + ?Sized>(
        &self,
        count: u32,
        ids: &mut EntityIds,
        config: &GameConfig,
        rng: &mut R,
    ) -> Vec<Asteroid> {
        let size = config.asteroid_size_for_stage(3);
        let asteroids: Vec<Asteroid> = (0..count)
            .map(|_| {
                let kind = self.roll_asteroid_kind(rng);
                let pos = Vec2::new(
                    rng.random_range(0.0..=config.width),
                    rng.random_range(0.0..=config.height),
                );
                Asteroid::new(ids.allocate(), kind, pos, size, 3, config, rng)
            })
            .collect();
        log::info!("{count} asteroids spawned");
        asteroids
    }

    /// Roll for a power-up drop at `pos`.
    ///
    /// Nothing drops once `live_count` reaches the cap. Shield is never
    /// offered while the player's shield is still up.
    pub fn spawn_powerup<R: Rng + ?Sized>(
        &self,
        pos: Vec2,
        live_count: usize,
        shield_active: bool,
        ids: &mut EntityIds,
        config: &GameConfig,
        rng: &mut R,
    ) -> Option<PowerUp> {
        if live_count >= config.powerup_cap {
            return None;
        }
        if !rng.random_bool(f64::from(config.powerup_chance)) {
            return None;
        }
        let candidates: Vec<PowerUpKind> = config
            .powerup_kinds
            .iter()
            .copied()
            .filter(|k| !(shield_active && *k == PowerUpKind::Shield))
            .collect();
        let kind = *candidates.choose(rng)?;
        log::debug!("Spawned {kind:?} power-up at ({:.0}, {:.0})", pos.x, pos.y);
        Some(PowerUp::new(ids.allocate(), kind, pos, config, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnWeights;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashMap;

    #[test]
    fn test_ids_are_unique() {
        let mut ids = EntityIds::default();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn test_weighted_kinds_roughly_match() {
        let config = GameConfig::default();
        let spawner = Spawner::new(&config).unwrap();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut counts: HashMap<AsteroidKind, u32> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(spawner.roll_asteroid_kind(&mut rng)).or_default() += 1;
        }
        let plain = counts[&AsteroidKind::Plain];
        assert!((8_300..9_400).contains(&plain), "plain = {plain}");
        assert!(counts[&AsteroidKind::Exploding] > 250);
        assert!(counts[&AsteroidKind::Shielded] > 500);
    }

    #[test]
    fn test_only_special_kinds_when_plain_has_no_weight() {
        let config = GameConfig {
            spawn_weights: SpawnWeights {
                exploding: 1.0,
                shielded: 0.0,
            },
            ..Default::default()
        };
        let spawner = Spawner::new(&config).unwrap();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..100 {
            assert_eq!(spawner.roll_asteroid_kind(&mut rng), AsteroidKind::Exploding);
        }
    }

    #[test]
    fn test_spawn_asteroids_are_large_and_on_screen() {
        let config = GameConfig::default();
        let spawner = Spawner::new(&config).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ids = EntityIds::default();
        let wave = spawner.spawn_asteroids(7, &mut ids, &config, &mut rng);
        assert_eq!(wave.len(), 7);
        for a in &wave {
            assert_eq!(a.stage, 3);
            assert_eq!(a.size, config.large_asteroid_size);
            assert!((0.0..=config.width).contains(&a.pos.x));
            assert!((0.0..=config.height).contains(&a.pos.y));
        }
    }

    #[test]
    fn test_powerup_respects_cap_and_chance() {
        let mut config = GameConfig {
            powerup_chance: 1.0,
            ..Default::default()
        };
        let spawner = Spawner::new(&config).unwrap();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ids = EntityIds::default();

        assert!(spawner.spawn_powerup(Vec2::ZERO, 2, false, &mut ids, &config, &mut rng).is_some());
        assert!(spawner.spawn_powerup(Vec2::ZERO, 3, false, &mut ids, &config, &mut rng).is_none());

        config.powerup_chance = 0.0;
        for _ in 0..50 {
            assert!(spawner.spawn_powerup(Vec2::ZERO, 0, false, &mut ids, &config, &mut rng).is_none());
        }
    }

    #[test]
    fn test_no_shield_drop_while_shielded() {
        let config = GameConfig {
            powerup_chance: 1.0,
            powerup_kinds: vec![PowerUpKind::Shield, PowerUpKind::Trishot],
            ..Default::default()
        };
        let spawner = Spawner::new(&config).unwrap();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ids = EntityIds::default();
        for _ in 0..50 {
            let p = spawner
                .spawn_powerup(Vec2::ZERO, 0, true, &mut ids, &config, &mut rng)
                .unwrap();
            assert_eq!(p.kind, PowerUpKind::Trishot);
        }
    }
}
