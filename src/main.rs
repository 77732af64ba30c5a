//! Planetoids headless runner
//!
//! Drives the simulation with a simple autopilot, logs gameplay events and
//! prints a JSON summary of the final world. Useful for smoke-testing tuning
//! files and reproducing runs from a seed.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;

use planetoids::GameConfig;
use planetoids::sim::{GameEvent, GamePhase, GameState, GameStats, TickInput, WorldSnapshot, tick};
use planetoids::{distance, normalize_degrees};

#[derive(Parser, Debug)]
#[command(name = "planetoids")]
#[command(about = "Run a headless Planetoids simulation with a simple autopilot")]
struct Cli {
    /// Seed for the world's random generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Frames to simulate (stops early on game over)
    #[arg(long, default_value_t = 3_600)]
    frames: u32,
    /// Simulated frame rate; each frame advances by 1/fps seconds
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// JSON file overriding any subset of the default tuning
    #[arg(long)]
    config: Option<PathBuf>,
    /// Pretty-print the summary
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    frames_run: u32,
    accuracy: f32,
    stats: GameStats,
    world: WorldSnapshot,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if !(cli.fps.is_finite() && cli.fps > 0.0) {
        bail!("--fps must be a positive number, got {}", cli.fps);
    }

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    let mut state = GameState::with_config(config, cli.seed)?;
    log::info!(
        "Planetoids (headless) starting: seed {}, {} frames at {} fps",
        cli.seed,
        cli.frames,
        cli.fps
    );

    let dt = 1.0 / cli.fps;
    let mut frames_run = 0;
    for frame in 0..cli.frames {
        let input = autopilot(&state, frame);
        tick(&mut state, &input, dt);
        frames_run += 1;

        for event in state.drain_events() {
            report(&event);
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let stats = state.stats();
    let summary = Summary {
        seed: cli.seed,
        frames_run,
        accuracy: stats.accuracy(),
        stats,
        world: state.snapshot(),
    };
    let json = if cli.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{json}");
    Ok(())
}

/// Turn toward the nearest asteroid, fire every few frames, and give a
/// short burst of thrust now and then to keep moving
fn autopilot(state: &GameState, frame: u32) -> TickInput {
    let player = &state.player;
    let nearest = state
        .asteroids
        .iter()
        .filter(|a| !a.is_exploding())
        .min_by(|a, b| {
            distance(a.pos, player.pos)
                .partial_cmp(&distance(b.pos, player.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let mut input = TickInput {
        fire: frame % 12 == 0,
        thrust: frame % 180 < 20,
        ..Default::default()
    };

    if let Some(target) = nearest {
        let to_target = target.pos - player.pos;
        // Screen y points down, headings count counter-clockwise
        let bearing = (-to_target.y).atan2(to_target.x).to_degrees();
        let mut turn = normalize_degrees(bearing - player.angle);
        if turn > 180.0 {
            turn -= 360.0;
        }
        let step = state.config.rotation_speed;
        input.rotate_left = turn > step;
        input.rotate_right = turn < -step;
    }
    input
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::ScoreChanged { score } => log::debug!("Score: {score}"),
        GameEvent::LifeLost { remaining } => log::info!("Life lost, {remaining} remaining"),
        GameEvent::LevelCleared { level } => log::info!("Level cleared, now on level {level}"),
        GameEvent::PowerupCollected { kind } => log::info!("Power-up collected: {kind:?}"),
        GameEvent::GameOver(stats) => log::info!(
            "Game over after {:.1}s: score {}, {} asteroids, accuracy {:.1}%",
            stats.elapsed_secs,
            stats.score,
            stats.asteroids_destroyed,
            stats.accuracy()
        ),
    }
}
