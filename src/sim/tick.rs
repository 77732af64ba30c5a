//! Per-frame simulation step
//!
//! Frame order:
//! 1. respawn countdown, or player movement and firing
//! 2. bullets advance, expired ones dropped
//! 3. asteroids advance (exploding ones play out their animation instead)
//! 4. power-ups drift and expire, slowdown counts down
//! 5. power-up pickup
//! 6. collisions: bullets first, then the player
//! 7. next wave once the field is clear

use std::sync::Arc;

use super::collision;
use super::event::GameEvent;
use super::player::Controls;
use super::state::{GamePhase, GameState};
use crate::config::GameConfig;
use crate::{distance, ticks};

/// Input intents for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    /// Fire one volley this frame
    pub fire: bool,
    /// Pause toggle
    pub toggle_pause: bool,
}

impl TickInput {
    pub fn controls(&self) -> Controls {
        Controls {
            rotate_left: self.rotate_left,
            rotate_right: self.rotate_right,
            thrust: self.thrust,
        }
    }
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.toggle_pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Game paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Game resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = sanitize_dt(dt);
    let config = Arc::clone(&state.config);
    state.time_ticks += 1;
    state.stats.elapsed_secs += dt;

    update_player(state, input, dt, &config);

    for bullet in &mut state.bullets {
        bullet.advance(dt, &config);
    }
    state.bullets.retain(|b| !b.expired());

    let slowdown_active = state.slowdown.active;
    state.asteroids.retain_mut(|asteroid| {
        if asteroid.is_exploding() {
            !asteroid.advance_explosion(dt)
        } else {
            asteroid.advance(dt, slowdown_active, &config);
            true
        }
    });

    for powerup in &mut state.powerups {
        powerup.advance(dt, &config);
    }
    state.powerups.retain(|p| !p.expired());
    state.slowdown.update(dt);

    collect_powerup(state);

    collision::resolve_bullet_hits(state);
    collision::resolve_player_hit(state);
    state.score.update(dt);

    if state.phase == GamePhase::Playing && state.asteroids.is_empty() {
        advance_level(state, &config);
    }
}

/// Negative, NaN or infinite frame times become 0. Long frames are passed
/// through as-is so motion and timers track the caller's clock.
fn sanitize_dt(dt: f32) -> f32 {
    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Ignoring invalid frame time {dt}");
        0.0
    } else {
        dt
    }
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32, config: &GameConfig) {
    if state.is_respawning() {
        state.respawn_timer -= ticks(dt);
        if state.respawn_timer <= 0.0 {
            state.respawn_player();
        }
    } else {
        state
            .player
            .advance(dt, &input.controls(), config, &mut state.rng);
        if input.fire {
            let volley = state.player.fire(&mut state.ids, config);
            state.stats.shots_fired += volley.len() as u32;
            state.bullets.extend(volley);
        }
    }
    state.player.advance_explosion(dt);
}

/// Pick up the first overlapping power-up, if the player is alive
fn collect_powerup(state: &mut GameState) {
    if state.is_respawning() {
        return;
    }
    let player = &state.player;
    let touched = state
        .powerups
        .iter()
        .position(|p| distance(p.pos, player.pos) < p.radius + player.size);
    if let Some(index) = touched {
        let powerup = state.powerups.remove(index);
        state.apply_powerup(powerup.kind);
    }
}

fn advance_level(state: &mut GameState, config: &GameConfig) {
    let cleared = state.level;
    state.level += 1;
    log::info!("Level {cleared} cleared, starting level {}", state.level);
    state.spawn_wave(config.wave_size(state.level));
    state.player.set_invincibility(config.respawn_invincibility);
    state.events.push(GameEvent::LevelCleared { level: state.level });
}
