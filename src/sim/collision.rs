//! Collision detection and resolution
//!
//! One pass per frame. Bullets are checked against asteroids in insertion
//! order; anything destroyed is only marked during the scan and filtered out
//! afterwards, while split children and ricochet bullets wait in side buffers
//! so they can't be hit in the frame they appear.

use std::sync::Arc;

use rand::Rng;

use super::asteroid::{Asteroid, AsteroidKind};
use super::bullet::Bullet;
use super::event::GameEvent;
use super::state::{GamePhase, GameState};
use crate::config::GameConfig;
use crate::distance;

/// Bullet hits within the asteroid's radius
pub fn bullet_hits_asteroid(bullet: &Bullet, asteroid: &Asteroid) -> bool {
    distance(bullet.pos, asteroid.pos) < asteroid.size
}

/// Asteroids that are mid-explosion are already spent
fn is_target(asteroid: &Asteroid) -> bool {
    !asteroid.is_exploding()
}

/// Resolve every bullet/asteroid overlap for this frame
pub fn resolve_bullet_hits(state: &mut GameState) {
    let config = Arc::clone(&state.config);
    let mut destroyed = vec![false; state.asteroids.len()];
    let mut spent = vec![false; state.bullets.len()];
    let mut new_asteroids = Vec::new();
    let mut new_bullets = Vec::new();

    for bi in 0..state.bullets.len() {
        let mut landed = false;

        for ai in 0..state.asteroids.len() {
            if destroyed[ai] || !is_target(&state.asteroids[ai]) {
                continue;
            }
            if !bullet_hits_asteroid(&state.bullets[bi], &state.asteroids[ai]) {
                continue;
            }
            landed = true;
            let impact = state.asteroids[ai].pos;

            state.bullets[bi].on_hit_asteroid(&mut state.rng);
            let size = state.asteroids[ai].size;
            award(state, size);

            // Shield soaks the hit; piercing or not, the bullet is used up
            if state.asteroids[ai].absorb_hit() {
                log::debug!(
                    "Asteroid {} absorbed a hit, shield {} left",
                    state.asteroids[ai].id,
                    state.asteroids[ai].shield()
                );
                spent[bi] = true;
                break;
            }

            if state.asteroids[ai].kind() == AsteroidKind::Exploding {
                detonate(state, ai, &mut destroyed, &mut new_asteroids, &config);
            } else {
                destroyed[ai] = true;
            }
            let children =
                state.asteroids[ai].split(&state.spawner, &mut state.ids, &config, &mut state.rng);
            new_asteroids.extend(children);
            register_kill(state, &config);

            if !state.bullets[bi].piercing {
                spent[bi] = true;
            }

            if let Some(powerup) = state.spawner.spawn_powerup(
                impact,
                state.powerups.len(),
                state.player.shield_active,
                &mut state.ids,
                &config,
                &mut state.rng,
            ) {
                state.powerups.push(powerup);
            }

            if state.player.ricochet_active() && !state.bullets[bi].ricochet {
                let angle = state.rng.random_range(0.0f32..360.0);
                let id = state.ids.allocate();
                new_bullets.push(Bullet::ricochet(id, impact, angle, &config));
            }

            if spent[bi] {
                break;
            }
        }

        if landed && !state.bullets[bi].ricochet {
            state.stats.shots_hit += 1;
        }
    }

    let mut idx = 0;
    state.asteroids.retain(|_| {
        let keep = !destroyed[idx];
        idx += 1;
        keep
    });
    state.asteroids.extend(new_asteroids);

    let mut idx = 0;
    state.bullets.retain(|_| {
        let keep = !spent[idx];
        idx += 1;
        keep
    });
    state.bullets.extend(new_bullets);
}

/// Set off the exploding asteroid at `origin` and take out every other live
/// asteroid inside its blast. Only one level deep: caught asteroids never
/// explode themselves.
fn detonate(
    state: &mut GameState,
    origin: usize,
    destroyed: &mut [bool],
    new_asteroids: &mut Vec<Asteroid>,
    config: &GameConfig,
) {
    if !state.asteroids[origin].trigger_explosion(&mut state.rng) {
        return;
    }
    let center = state.asteroids[origin].pos;
    log::debug!("Asteroid {} exploded", state.asteroids[origin].id);

    for oi in 0..state.asteroids.len() {
        if oi == origin || destroyed[oi] || !is_target(&state.asteroids[oi]) {
            continue;
        }
        if distance(center, state.asteroids[oi].pos) > config.explosion_radius {
            continue;
        }
        destroyed[oi] = true;
        let size = state.asteroids[oi].size;
        award(state, size);
        let children =
            state.asteroids[oi].split(&state.spawner, &mut state.ids, config, &mut state.rng);
        new_asteroids.extend(children);
        register_kill(state, config);
    }
}

fn award(state: &mut GameState, size: f32) {
    state.score.award(size);
    state.events.push(GameEvent::ScoreChanged {
        score: state.score.value,
    });
}

fn register_kill(state: &mut GameState, config: &GameConfig) {
    state.score.register_kill(config);
    state.stats.asteroids_destroyed += 1;
}

/// Check the player against the asteroid field: at most one outcome per frame
pub fn resolve_player_hit(state: &mut GameState) {
    if state.is_respawning() || state.phase != GamePhase::Playing {
        return;
    }
    let player_pos = state.player.pos;
    let hit = state
        .asteroids
        .iter()
        .any(|a| is_target(a) && distance(player_pos, a.pos) < a.size);
    if !hit || state.player.invincible {
        return;
    }

    let config = Arc::clone(&state.config);
    if state.player.shield_active {
        state.player.take_damage(&config);
        return;
    }

    state.player.explode(&config, &mut state.rng);
    state.lives = state.lives.saturating_sub(1);
    log::info!("Player destroyed, {} lives left", state.lives);
    state.events.push(GameEvent::LifeLost {
        remaining: state.lives,
    });

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        let stats = state.stats();
        log::info!(
            "Game over: score {}, level {}, accuracy {:.1}%",
            stats.score,
            stats.level,
            stats.accuracy()
        );
        state.events.push(GameEvent::GameOver(stats));
    } else if config.respawn_delay > 0.0 {
        state.respawn_timer = config.respawn_delay;
    } else {
        state.respawn_player();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::powerup::PowerUpKind;
    use glam::Vec2;

    /// A quiet world: no random asteroids, no power-up drops
    fn empty_state() -> GameState {
        let config = GameConfig {
            initial_asteroids: 0,
            powerup_chance: 0.0,
            ..Default::default()
        };
        GameState::with_config(config, 1).unwrap()
    }

    fn park(state: &mut GameState, id: u32) {
        if let Some(a) = state.asteroids.iter_mut().find(|a| a.id == id) {
            a.base_speed = 0.0;
        }
    }

    fn bullet_at(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        let bullet = Bullet::new(id, pos, 0.0, &state.config);
        state.bullets.push(bullet);
    }

    #[test]
    fn test_plain_hit_splits_and_scores() {
        let mut state = empty_state();
        let id = state.spawn_asteroid_at(AsteroidKind::Plain, Vec2::new(400.0, 400.0), 3);
        park(&mut state, id);
        bullet_at(&mut state, Vec2::new(410.0, 400.0));

        resolve_bullet_hits(&mut state);

        assert!(state.bullets.is_empty());
        assert_eq!(state.asteroids.len(), 2);
        assert!(state.asteroids.iter().all(|a| a.stage == 2 && a.id != id));
        assert_eq!(state.score.value, 100);
        assert_eq!(state.stats.shots_hit, 1);
        assert_eq!(state.stats.asteroids_destroyed, 1);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ScoreChanged { score: 100 }]
        );
    }

    #[test]
    fn test_bullet_consumed_by_first_asteroid_only() {
        let mut state = empty_state();
        state.spawn_asteroid_at(AsteroidKind::Plain, Vec2::new(400.0, 400.0), 1);
        state.spawn_asteroid_at(AsteroidKind::Plain, Vec2::new(405.0, 400.0), 1);
        bullet_at(&mut state, Vec2::new(402.0, 400.0));

        resolve_bullet_hits(&mut state);

        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.score.value, 200);
    }

    #[test]
    fn test_shielded_absorbs_then_breaks() {
        let mut state = empty_state();
        state.spawn_asteroid_at(AsteroidKind::Shielded, Vec2::new(400.0, 400.0), 1);
        for hit in 1..=3 {
            bullet_at(&mut state, Vec2::new(400.0, 400.0));
            resolve_bullet_hits(&mut state);
            assert!(state.bullets.is_empty());
            assert_eq!(state.asteroids.len(), 1);
            assert_eq!(state.asteroids[0].shield(), 3 - hit);
        }
        bullet_at(&mut state, Vec2::new(400.0, 400.0));
        resolve_bullet_hits(&mut state);
        assert!(state.asteroids.is_empty());
        // Absorbed hits still score
        assert_eq!(state.score.value, 4 * 200);
    }

    #[test]
    fn test_piercing_bullet_consumed_by_shield() {
        let mut state = empty_state();
        state.spawn_asteroid_at(AsteroidKind::Shielded, Vec2::new(400.0, 400.0), 2);
        let id = state.next_entity_id();
        let config = Arc::clone(&state.config);
        state
            .bullets
            .push(Bullet::ricochet(id, Vec2::new(400.0, 400.0), 0.0, &config));
        resolve_bullet_hits(&mut state);
        assert!(state.bullets.is_empty());
        assert_eq!(state.asteroids[0].shield(), 2);
    }

    #[test]
    fn test_explosion_chain_is_single_level() {
        let mut state = empty_state();
        let origin = state.spawn_asteroid_at(AsteroidKind::Exploding, Vec2::new(400.0, 400.0), 1);
        // Inside the blast: one plain, one exploding that must not go off
        state.spawn_asteroid_at(AsteroidKind::Plain, Vec2::new(500.0, 400.0), 1);
        state.spawn_asteroid_at(AsteroidKind::Exploding, Vec2::new(400.0, 550.0), 1);
        // Outside the blast
        let far = state.spawn_asteroid_at(AsteroidKind::Plain, Vec2::new(900.0, 400.0), 1);
        bullet_at(&mut state, Vec2::new(400.0, 400.0));

        resolve_bullet_hits(&mut state);

        let ids: Vec<u32> = state.asteroids.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![origin, far]);
        assert!(state.asteroids[0].is_exploding());
        assert!(!state.asteroids[1].is_exploding());
        assert_eq!(state.stats.asteroids_destroyed, 3);
        assert_eq!(state.score.value, 600);
    }

    #[test]
    fn test_exploding_asteroid_is_not_a_target() {
        let mut state = empty_state();
        state.spawn_asteroid_at(AsteroidKind::Exploding, Vec2::new(400.0, 400.0), 1);
        bullet_at(&mut state, Vec2::new(400.0, 400.0));
        resolve_bullet_hits(&mut state);
        assert!(state.asteroids[0].is_exploding());

        bullet_at(&mut state, Vec2::new(400.0, 400.0));
        resolve_bullet_hits(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.score.value, 200);
    }

    #[test]
    fn test_ricochet_mode_spawns_ricochet_bullet() {
        let mut state = empty_state();
        state.apply_powerup(PowerUpKind::Ricochet);
        state.spawn_asteroid_at(AsteroidKind::Plain, Vec2::new(400.0, 400.0), 1);
        bullet_at(&mut state, Vec2::new(400.0, 400.0));

        resolve_bullet_hits(&mut state);

        assert_eq!(state.bullets.len(), 1);
        let b = &state.bullets[0];
        assert!(b.ricochet && b.piercing);
        assert_eq!(b.pos, Vec2::new(400.0, 400.0));
        assert_eq!(b.radius, state.config.ricochet_bullet_radius);
    }

    #[test]
    fn test_shield_blocks_player_death() {
        let mut state = empty_state();
        state.player.invincible = false;
        state.player.invincibility_timer = 0.0;
        let pos = state.player.pos;
        state.spawn_asteroid_at(AsteroidKind::Plain, pos, 3);

        resolve_player_hit(&mut state);
        assert!(!state.player.shield_active);
        assert!(state.player.invincible);
        assert_eq!(state.lives, 3);

        // Still overlapping, but invincible now
        resolve_player_hit(&mut state);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_unprotected_player_dies_once() {
        let mut state = empty_state();
        state.player.invincible = false;
        state.player.invincibility_timer = 0.0;
        state.player.shield_active = false;
        let pos = state.player.pos;
        state.spawn_asteroid_at(AsteroidKind::Plain, pos, 3);
        state.spawn_asteroid_at(AsteroidKind::Plain, pos, 3);

        resolve_player_hit(&mut state);
        resolve_player_hit(&mut state);

        assert_eq!(state.lives, 2);
        assert!(state.is_respawning());
        assert!(state.player.explosion_timer > 0.0);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LifeLost { remaining: 2 }]
        );
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = empty_state();
        state.lives = 1;
        state.player.invincible = false;
        state.player.invincibility_timer = 0.0;
        state.player.shield_active = false;
        let pos = state.player.pos;
        state.spawn_asteroid_at(AsteroidKind::Plain, pos, 3);

        resolve_player_hit(&mut state);

        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::GameOver(stats)) if stats.level == 1));
    }
}
