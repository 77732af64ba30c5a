//! Planetoids - A wraparound asteroid-field arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, spawning, collisions, game state)
//! - `config`: Immutable game tuning, loaded once and shared by reference
//! - `error`: Configuration errors
//!
//! Rendering, menus, audio and persistence live outside this crate. They feed
//! the simulation a `dt` and input intents, and read back a snapshot plus events.

pub mod config;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use error::ConfigError;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame rate the per-tick tuning values were authored against.
    /// Every "per tick" quantity is scaled by `dt * REFERENCE_FPS`.
    pub const REFERENCE_FPS: f32 = 60.0;
}

/// Convert seconds of frame time into reference ticks
#[inline]
pub fn ticks(dt: f32) -> f32 {
    dt * consts::REFERENCE_FPS
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Unit vector for a heading in degrees.
///
/// Screen space has y pointing down, so positive angles turn counter-clockwise
/// as seen on screen (0° = right, 90° = up).
#[inline]
pub fn heading_vector(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos(), -rad.sin())
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Toroidal wrap into [0, width) x [0, height)
#[inline]
pub fn wrap_modulo(pos: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(wrap_axis(pos.x, width), wrap_axis(pos.y, height))
}

fn wrap_axis(v: f32, extent: f32) -> f32 {
    let w = v.rem_euclid(extent);
    if w >= extent { 0.0 } else { w }
}

/// Wrap with an off-screen margin: an object must fully leave one edge
/// (by `margin`) before it reappears just outside the opposite edge.
#[inline]
pub fn wrap_with_margin(pos: Vec2, width: f32, height: f32, margin: f32) -> Vec2 {
    Vec2::new(
        wrap_axis_margin(pos.x, width, margin),
        wrap_axis_margin(pos.y, height, margin),
    )
}

fn wrap_axis_margin(v: f32, extent: f32, margin: f32) -> f32 {
    if v < -margin {
        extent + margin
    } else if v > extent + margin {
        -margin
    } else {
        v
    }
}
