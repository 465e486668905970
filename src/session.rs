//! Game session controller
//!
//! Owns the simulation state and the public command surface the host
//! drives: geometry setup, start/reset, per-frame update, press input,
//! and read-only snapshots for rendering. The controller is the single
//! writer of session state; collaborator ports (sound, persistence) are
//! fire-and-forget and can never stall or kill the simulation.

use std::panic::{AssertUnwindSafe, catch_unwind};

use glam::Vec2;
use serde::Serialize;

use crate::audio::{EffectSink, NullEffects, SoundEffect};
use crate::highscores::{MemoryScores, ScoreStore};
use crate::sim::{
    GameEvent, Geometry, Mode, Obstacle, PressAction, SessionState, classify_press, physics, tick,
};
use crate::tuning::Tuning;

/// Read-only view of one settled simulation state, taken between ticks
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub actor_pos: Vec2,
    pub actor_size: Vec2,
    pub shake_offset: f32,
    pub obstacles: Vec<Obstacle>,
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    pub mode: Mode,
    pub mode_progress: f32,
    pub running: bool,
}

/// The aggregate root of one play session
pub struct GameSession {
    state: Option<SessionState>,
    tuning: Tuning,
    seed: u64,
    paused: bool,
    press_armed: bool,
    effects: Box<dyn EffectSink>,
    scores: Box<dyn ScoreStore>,
    high_score: u64,
    flush_timer: f32,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_ports(Box::new(NullEffects), Box::new(MemoryScores::new()))
    }

    /// Construct with host-supplied ports; the persisted high score is
    /// read once here.
    pub fn with_ports(effects: Box<dyn EffectSink>, mut scores: Box<dyn ScoreStore>) -> Self {
        let high_score = scores.load().unwrap_or(0);
        Self {
            state: None,
            tuning: Tuning::default(),
            seed: 0,
            paused: false,
            press_armed: false,
            effects,
            scores,
            high_score,
            flush_timer: 0.0,
        }
    }

    /// Fixed run seed for reproducible sessions
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// One-time geometry setup. Non-positive dimensions are refused and
    /// logged; the session stays not-ready and every command is a no-op.
    pub fn initialize(&mut self, viewport_width: f32, viewport_height: f32) {
        match Geometry::derive(viewport_width, viewport_height) {
            Some(geom) => {
                log::info!("Initialized viewport {viewport_width}x{viewport_height}");
                self.state = Some(SessionState::new(geom, self.seed, &self.tuning));
            }
            None => {
                log::error!(
                    "Refusing to initialize with non-positive viewport \
                     {viewport_width}x{viewport_height}"
                );
            }
        }
    }

    /// Begin (or restart) play from a fresh state
    pub fn start(&mut self) {
        let Some(state) = self.state.as_mut() else {
            log::warn!("start() before initialize(); ignoring");
            return;
        };
        state.reset(&self.tuning);
        state.running = true;
        self.paused = false;
        self.press_armed = false;
        self.flush_timer = 0.0;
        log::info!("Session started (seed {})", self.seed);
    }

    /// Return to a fresh stopped state; idempotent while stopped
    pub fn reset(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.reset(&self.tuning);
        self.paused = false;
        self.press_armed = false;
    }

    /// Advance the simulation by `dt` seconds of host time.
    ///
    /// Any panic inside the tick pipeline is caught here, logged, and
    /// converted into a forced stop: a half-applied tick must never keep
    /// playing.
    pub fn update(&mut self, dt: f32) {
        if self.paused || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if !state.running {
            return;
        }

        let mut events = Vec::new();
        let tuning = &self.tuning;
        let panicked = catch_unwind(AssertUnwindSafe(|| {
            tick(&mut *state, dt, tuning, &mut events);
        }))
        .is_err();
        if panicked {
            log::error!("Simulation tick panicked; forcing session stop");
            state.running = false;
            return;
        }

        for event in events {
            match event {
                GameEvent::Jumped => self.effects.play_sound(SoundEffect::Jump),
                GameEvent::ModeEntered(_) => self.effects.play_sound(SoundEffect::ModeEnter),
                GameEvent::Scored => self.effects.play_sound(SoundEffect::Score),
                GameEvent::LeveledUp(level) => {
                    log::info!("Level up -> {level}");
                    self.effects.play_sound(SoundEffect::LevelUp);
                }
                GameEvent::ModeExited(_) => self.effects.play_sound(SoundEffect::ModeExit),
                GameEvent::Collided => {
                    self.effects.play_sound(SoundEffect::Collision);
                    self.effects.trigger_shake();
                }
                GameEvent::GameOver => {
                    log::info!("Game over at score {}", state.score);
                    // The write-through below has already persisted any
                    // new high; this is the final safety flush.
                    self.flush_timer = self.tuning.score_flush_interval;
                }
            }
        }

        // Write-through: persist the moment the high score is beaten
        if state.score > self.high_score {
            self.high_score = state.score;
            self.scores.store(self.high_score);
        }

        // Periodic safety flush tolerates abrupt termination
        self.flush_timer += dt;
        if self.flush_timer >= self.tuning.score_flush_interval {
            self.flush_timer = 0.0;
            self.scores.store(self.high_score);
        }
    }

    /// Gesture start: arm the press timer reference
    pub fn on_press_start(&mut self) {
        if self.paused {
            return;
        }
        self.press_armed = true;
    }

    /// Gesture end: classify the resolved duration and apply it
    pub fn on_press_end(&mut self, duration_ms: u32) {
        if self.paused || !self.press_armed {
            return;
        }
        self.press_armed = false;
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if !state.running {
            return;
        }

        match classify_press(duration_ms, &self.tuning) {
            PressAction::Jump { power } => {
                // Float drives position directly; jumps are disabled
                if state.modes.mode() != Mode::Float {
                    physics::jump(
                        &mut state.actor,
                        &state.geom,
                        power,
                        state.modes.gravity_dir(),
                    );
                    self.effects.play_sound(SoundEffect::Jump);
                }
            }
            PressAction::EnterSpeed => match state.modes.mode() {
                Mode::Base => {
                    state.modes.enter(Mode::Speed, &self.tuning);
                    physics::jump(
                        &mut state.actor,
                        &state.geom,
                        self.tuning.speed_jump_power,
                        state.modes.gravity_dir(),
                    );
                    self.effects.play_sound(SoundEffect::ModeEnter);
                    self.effects.play_sound(SoundEffect::Jump);
                }
                Mode::Speed => {
                    state.modes.request_base(&self.tuning);
                    self.effects.play_sound(SoundEffect::ModeExit);
                }
                _ => {}
            },
            PressAction::EnterFloat => match state.modes.mode() {
                Mode::Base => {
                    state.modes.enter(Mode::Float, &self.tuning);
                    // Gravity is suspended; stale velocity must not leak
                    // into the first tick after reversion
                    state.actor.vel_y = 0.0;
                    self.effects.play_sound(SoundEffect::ModeEnter);
                }
                Mode::Float => {
                    state.modes.request_base(&self.tuning);
                    self.effects.play_sound(SoundEffect::ModeExit);
                }
                _ => {}
            },
            PressAction::EnterInvert => match state.modes.mode() {
                Mode::Base => {
                    state.modes.enter(Mode::Invert, &self.tuning);
                    self.effects.play_sound(SoundEffect::ModeEnter);
                }
                Mode::Invert => {
                    state.modes.request_base(&self.tuning);
                    self.effects.play_sound(SoundEffect::ModeExit);
                }
                _ => {}
            },
        }
    }

    /// Direct vertical positioning; valid only while in Float
    pub fn set_vertical_target(&mut self, y: f32) {
        if self.paused {
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if !state.running || state.modes.mode() != Mode::Float {
            return;
        }
        physics::set_vertical_target(&mut state.actor, &state.geom, y);
    }

    /// Pause: updates become no-ops and no timers advance. Idempotent.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume from pause. Idempotent.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    // === Queries (read-only, observed between ticks) ===

    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.running)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u64 {
        self.state.as_ref().map_or(0, |s| s.score)
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn level(&self) -> u32 {
        self.state.as_ref().map_or(1, |s| s.level)
    }

    pub fn mode(&self) -> Mode {
        self.state.as_ref().map_or(Mode::Base, |s| s.modes.mode())
    }

    /// Elapsed fraction of the current timed mode, in [0, 1]
    pub fn mode_progress(&self) -> f32 {
        self.state
            .as_ref()
            .map_or(0.0, |s| s.modes.progress(&self.tuning))
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.state.as_ref().map_or(&[], |s| &s.obstacles)
    }

    pub fn actor_pos(&self) -> Option<Vec2> {
        self.state.as_ref().map(|s| s.actor.pos)
    }

    /// One settled copy of everything the renderer needs
    pub fn snapshot(&self) -> Option<Snapshot> {
        let state = self.state.as_ref()?;
        Some(Snapshot {
            actor_pos: state.actor.pos,
            actor_size: state.actor.size,
            shake_offset: state.actor.shake_offset,
            obstacles: state.obstacles.clone(),
            score: state.score,
            high_score: self.high_score,
            level: state.level,
            mode: state.modes.mode(),
            mode_progress: state.modes.progress(&self.tuning),
            running: state.running,
        })
    }
}
