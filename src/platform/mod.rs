//! Platform abstraction layer
//!
//! The simulation only talks to the outside world through these seams:
//! - [`InputSource`]: one command set per frame
//! - [`Renderer`]: read-only snapshot per frame
//! - [`AudioManager`](crate::audio::AudioManager): cues from tick events
//!
//! Windowed frontends implement the traits; the headless implementations
//! here drive the native runner and tests.

use crate::audio::AudioManager;
use crate::level::LevelContentProvider;
use crate::sim::{GamePhase, GameState, Hud, RenderSnapshot, TickInput, tick};

/// Per-frame command source
pub trait InputSource {
    fn poll(&mut self, state: &GameState) -> TickInput;
}

/// Per-frame presentation
pub trait Renderer {
    fn present(&mut self, snapshot: &RenderSnapshot);
}

/// Autopilot: runs right, hops on a fixed cadence and answers every
/// end-of-level prompt. Quits once the game is beaten or the frame limit
/// is hit.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    frame: u64,
    max_frames: u64,
    jump_every: u64,
}

impl ScriptedInput {
    pub fn new(max_frames: u64) -> Self {
        Self {
            frame: 0,
            max_frames,
            jump_every: 45,
        }
    }

    pub fn with_jump_every(mut self, frames: u64) -> Self {
        self.jump_every = frames.max(1);
        self
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, state: &GameState) -> TickInput {
        self.frame += 1;
        if self.frame > self.max_frames {
            return TickInput {
                quit: true,
                ..Default::default()
            };
        }

        match state.phase {
            GamePhase::Playing => TickInput {
                right: true,
                jump: self.frame % self.jump_every == 0,
                ..Default::default()
            },
            GamePhase::LevelComplete => TickInput {
                next_level: true,
                ..Default::default()
            },
            GamePhase::GameOver => TickInput {
                restart: true,
                ..Default::default()
            },
            GamePhase::Beaten => TickInput {
                quit: true,
                ..Default::default()
            },
            GamePhase::Exited => TickInput::default(),
        }
    }
}

/// Renderer that logs HUD and phase changes instead of drawing
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
    last_hud: Option<Hud>,
    last_phase: Option<GamePhase>,
}

impl LogRenderer {
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn present(&mut self, snapshot: &RenderSnapshot) {
        self.frames += 1;

        if self.last_phase != Some(snapshot.phase) {
            log::info!("[frame {}] {:?}", self.frames, snapshot.phase);
            self.last_phase = Some(snapshot.phase);
        }

        if self.last_hud.as_ref() != Some(&snapshot.hud) {
            let hud = &snapshot.hud;
            let keys: Vec<&str> = hud.keys.iter().map(|k| k.as_str()).collect();
            log::info!(
                "Level {} | Score {} | Coins {} | Keys [{}]{}",
                hud.level,
                hud.score,
                hud.coins,
                keys.join(", "),
                hud.notice
                    .as_deref()
                    .map(|n| format!(" | {n}"))
                    .unwrap_or_default()
            );
            self.last_hud = Some(hud.clone());
        }
    }
}

/// Drive the session until it exits: poll, step, play cues, present.
/// Returns the number of frames run.
pub fn run(
    state: &mut GameState,
    provider: &dyn LevelContentProvider,
    input: &mut dyn InputSource,
    renderer: &mut dyn Renderer,
    audio: &mut AudioManager,
) -> u64 {
    let mut frames = 0;
    while state.phase != GamePhase::Exited {
        let command = input.poll(state);
        tick(state, &command, provider);
        audio.play_events(&state.events);
        renderer.present(&RenderSnapshot::capture(state));
        frames += 1;
    }
    frames
}
