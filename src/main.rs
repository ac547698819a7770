//! Keygate headless runner
//!
//! Drives the simulation with scripted input, logging HUD changes and sound
//! cues. `RUST_LOG=info` (or `debug`) shows the run.
//!
//! Environment:
//! - `KEYGATE_TUNING`: path to a tuning JSON file
//! - `KEYGATE_SEED`: run seed (defaults to the clock)
//! - `KEYGATE_LEVEL`: starting level (defaults to 1)
//! - `KEYGATE_FRAMES`: frame limit (defaults to one hour of play)

use std::time::{SystemTime, UNIX_EPOCH};

use keygate::audio::{AudioManager, LogAudio};
use keygate::consts::SIM_HZ;
use keygate::level::NoiseGridProvider;
use keygate::platform::{self, LogRenderer, ScriptedInput};
use keygate::sim::GameState;
use keygate::Tuning;

fn load_tuning() -> Tuning {
    match std::env::var("KEYGATE_TUNING") {
        Ok(path) => Tuning::load(&path).unwrap_or_else(|err| {
            log::warn!("Could not load tuning from {}: {}; using defaults", path, err);
            Tuning::default()
        }),
        Err(_) => Tuning::default(),
    }
}

fn env_number(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Ignoring {}={:?}: {}", name, raw, err);
            None
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn main() {
    env_logger::init();

    let tuning = load_tuning();
    let seed = env_number("KEYGATE_SEED").unwrap_or_else(clock_seed);
    let start_level = env_number("KEYGATE_LEVEL")
        .and_then(|level| u32::try_from(level).ok())
        .unwrap_or(1);
    let max_frames = env_number("KEYGATE_FRAMES").unwrap_or(u64::from(SIM_HZ) * 3600);

    log::info!("Keygate (headless) starting with seed {}", seed);

    let provider = NoiseGridProvider::new(seed);
    let mut state = GameState::starting_at(seed, tuning, &provider, start_level);
    let mut input = ScriptedInput::new(max_frames);
    let mut renderer = LogRenderer::default();
    let mut audio = AudioManager::new(Box::new(LogAudio::default()));

    let frames = platform::run(&mut state, &provider, &mut input, &mut renderer, &mut audio);

    log::info!(
        "Finished after {} frames on level {} with score {}",
        frames,
        state.level_index,
        state.score
    );
}
