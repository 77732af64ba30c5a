//! Read-only view of the world for renderers and tooling

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::asteroid::{AsteroidKind, AsteroidVariant};
use super::particle::Particle;
use super::player::WeaponMode;
use super::powerup::PowerUpKind;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub angle: f32,
    /// Nose, left, right
    pub hull: [Vec2; 3],
    pub thrusting: bool,
    pub invincible: bool,
    /// False on the "off" frames of the invincibility blink
    pub visible: bool,
    pub shield_active: bool,
    pub weapon_mode: WeaponMode,
    /// Ticks left on the weapon power-up
    pub powerup_timer: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub ricochet: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidView {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub stage: u8,
    pub kind: AsteroidKind,
    pub outline: Vec<Vec2>,
    pub exploding: bool,
    pub shield: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PowerUpKind,
    pub symbol: char,
    pub visible: bool,
}

/// Everything a frame needs to be drawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    /// None while the player is waiting to respawn or the run is over
    pub player: Option<PlayerView>,
    pub bullets: Vec<BulletView>,
    pub asteroids: Vec<AsteroidView>,
    pub powerups: Vec<PowerUpView>,
    /// Exhaust, debris and explosion particles
    pub particles: Vec<Particle>,
    pub score: u64,
    pub multiplier: u32,
    pub lives: u8,
    pub level: u32,
    pub slowdown_active: bool,
}

impl GameState {
    pub fn snapshot(&self) -> WorldSnapshot {
        let config = &self.config;
        let alive = !self.is_respawning() && self.phase != GamePhase::GameOver;
        let player = alive.then(|| {
            let p = &self.player;
            PlayerView {
                pos: p.pos,
                angle: p.angle,
                hull: p.hull(),
                thrusting: p.thrusting,
                invincible: p.invincible,
                visible: !p.invincible || p.invincibility_timer % 10.0 < 5.0,
                shield_active: p.shield_active,
                weapon_mode: p.weapon_mode,
                powerup_timer: p.powerup_timer,
            }
        });

        let mut particles: Vec<Particle> = self.player.exhaust.clone();
        particles.extend(self.player.debris.iter().cloned());
        for asteroid in &self.asteroids {
            if let AsteroidVariant::Exploding(e) = &asteroid.variant {
                particles.extend(e.fragments.iter().cloned());
                particles.extend(e.particles.iter().cloned());
            }
        }

        WorldSnapshot {
            width: config.width,
            height: config.height,
            phase: self.phase,
            player,
            bullets: self
                .bullets
                .iter()
                .map(|b| BulletView {
                    id: b.id,
                    pos: b.pos,
                    radius: b.radius,
                    ricochet: b.ricochet,
                })
                .collect(),
            asteroids: self
                .asteroids
                .iter()
                .map(|a| AsteroidView {
                    id: a.id,
                    pos: a.pos,
                    size: a.size,
                    stage: a.stage,
                    kind: a.kind(),
                    outline: a.shape.clone(),
                    exploding: a.is_exploding(),
                    shield: a.shield(),
                })
                .collect(),
            powerups: self
                .powerups
                .iter()
                .map(|p| PowerUpView {
                    id: p.id,
                    pos: p.pos,
                    radius: p.radius,
                    kind: p.kind,
                    symbol: p.kind.symbol(),
                    visible: p.visible(config),
                })
                .collect(),
            particles,
            score: self.score.value,
            multiplier: self.score.multiplier,
            lives: self.lives,
            level: self.level,
            slowdown_active: self.slowdown.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_mirrors_state() {
        let state = GameState::new(4);
        let snap = state.snapshot();
        assert_eq!(snap.asteroids.len(), state.asteroids.len());
        assert_eq!(snap.lives, 3);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.phase, GamePhase::Playing);
        assert!(snap.player.is_some());
    }

    #[test]
    fn test_player_hidden_while_respawning() {
        let mut state = GameState::new(4);
        state.respawn_timer = 10.0;
        assert!(state.snapshot().player.is_none());
    }

    #[test]
    fn test_player_hidden_after_final_death() {
        let mut state = GameState::new(4);
        state.lives = 1;
        state.player.invincible = false;
        state.player.invincibility_timer = 0.0;
        state.player.shield_active = false;
        let pos = state.player.pos;
        state.spawn_asteroid_at(AsteroidKind::Plain, pos, 3);

        crate::sim::collision::resolve_player_hit(&mut state);

        assert_eq!(state.phase, GamePhase::GameOver);
        let snap = state.snapshot();
        assert!(snap.player.is_none());
        assert!(!snap.particles.is_empty(), "debris still drawn");
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(8);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.asteroids.len(), state.asteroids.len());
    }
}
