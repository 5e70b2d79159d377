//! Waddle Simulation Runner
//!
//! Headless driver for the game core: builds a world, opens every gift by
//! walking the penguin around, and prints the final state hash. Useful for
//! profiling and for checking determinism across machines.
//!
//! Configuration comes from the environment:
//! - `WADDLE_CONFIG`: path to a `GameConfig` JSON file (defaults apply otherwise)
//! - `WADDLE_FRAMES`: frames to simulate (default 3600, one minute at 60Hz)
//! - `WADDLE_GIFTS`: gift boxes to scatter (default 6)

use std::time::Instant;

use anyhow::Context;
use rapier3d::prelude::Vector;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waddle_core::{ClickTarget, Game, GameConfig, MoveDirection};

fn env_u64(name: &str, default: u64) -> anyhow::Result<u64> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{name} must be an integer, got {value:?}")),
        Err(_) => Ok(default),
    }
}

fn load_config() -> anyhow::Result<GameConfig> {
    match std::env::var("WADDLE_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config file {path}"))
        }
        Err(_) => Ok(GameConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let frames = env_u64("WADDLE_FRAMES", 3600)?;
    let gifts = env_u64("WADDLE_GIFTS", 6)?;
    let config = load_config()?;

    let mut game = Game::new(config)?;
    for _ in 0..gifts {
        game.spawn_gift_box(Vector::new(2.0, 2.0, 2.0), Box::new(|_| {}))?;
    }
    for _ in 0..4 {
        game.spawn_light()?;
    }
    for _ in 0..8 {
        game.spawn_prop(5.0, 1.0)?;
    }

    // Skip straight to main play; the runner has no UI to click through.
    game.handle_click(ClickTarget::StartButton);
    loop {
        game.handle_click(ClickTarget::StoryForward);
        if !game.handle_click(ClickTarget::StoryFrame).is_empty() {
            break;
        }
    }
    game.movement(MoveDirection::Forward, true);

    let started = Instant::now();
    let mut opened = 0usize;
    for _ in 0..frames {
        let events = game.update();
        opened += events.gifts_opened.len();
        if events.gifts_opened.is_empty() {
            continue;
        }
        let (found, total) = game.gifts_found();
        tracing::info!("[sim] gift opened ({found}/{total})");
    }
    let elapsed = started.elapsed();

    let (found, total) = game.gifts_found();
    tracing::info!(
        "[sim] {frames} frames in {elapsed:?} ({:.0} fps), gifts {found}/{total} ({opened} events), state hash {:#018x}",
        frames as f64 / elapsed.as_secs_f64(),
        game.state_hash(),
    );
    Ok(())
}
