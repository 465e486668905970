//! Mode state machine
//!
//! Four states govern gravity sign, scroll-speed multiplier, and input
//! mapping. The machine is the single source of truth for the multiplier
//! and gravity direction; physics reads them here every tick instead of
//! re-deriving them from the mode.
//!
//! Transition rules:
//! - Float and Invert are reachable only from Base.
//! - Speed returns to Base on an explicit re-entry request only.
//! - Float and Invert return to Base when their timer expires, or on an
//!   explicit request.
//! - An explicit return to Base starts a short cosmetic shake and defers
//!   the speed-multiplier reset until the shake completes; the shake must
//!   visibly finish before the scroll speed snaps back.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mode {
    #[default]
    Base,
    Speed,
    Float,
    Invert,
}

impl Mode {
    /// Vertical position is driven directly rather than by gravity
    pub fn uses_direct_control(&self) -> bool {
        *self == Mode::Float
    }

    /// Ground contact bounces instead of ending the session
    pub fn ground_immune(&self) -> bool {
        *self == Mode::Float
    }

    pub fn gravity_dir(&self) -> f32 {
        if *self == Mode::Invert { -1.0 } else { 1.0 }
    }
}

/// Action a completed press resolves to (classification is pure; the
/// session applies it against the current mode)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressAction {
    Jump { power: f32 },
    EnterSpeed,
    EnterFloat,
    EnterInvert,
}

/// Classify a press duration into its band, cyclic modulo the full
/// period: short press jumps, longer presses cycle through the special
/// modes, then wrap back to band 1.
pub fn classify_press(duration_ms: u32, tuning: &Tuning) -> PressAction {
    let bands = &tuning.press_bands;
    let wrapped = duration_ms % bands.period_ms();
    if wrapped < bands.jump_ms {
        let power = 1.0 + (wrapped as f32 / bands.jump_ms as f32) * tuning.jump_power_ramp;
        PressAction::Jump { power }
    } else if wrapped < bands.jump_ms + bands.speed_ms {
        PressAction::EnterSpeed
    } else if wrapped < bands.jump_ms + bands.speed_ms + bands.float_ms {
        PressAction::EnterFloat
    } else {
        PressAction::EnterInvert
    }
}

/// The mode machine plus its timers and cached physics parameters
#[derive(Debug, Clone)]
pub struct ModeMachine {
    mode: Mode,
    /// Time spent in the current timed mode (Float/Invert)
    elapsed: f32,
    /// Cached scroll multiplier; reset may lag the mode on an explicit
    /// return to Base (see `shake_left`)
    speed_multiplier: f32,
    /// Remaining return-to-base shake time
    shake_left: f32,
    /// Multiplier reset deferred until the shake finishes
    reset_pending: bool,
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeMachine {
    pub fn new() -> Self {
        Self {
            mode: Mode::Base,
            elapsed: 0.0,
            speed_multiplier: 1.0,
            shake_left: 0.0,
            reset_pending: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn gravity_dir(&self) -> f32 {
        self.mode.gravity_dir()
    }

    /// Fraction of the timed mode elapsed, in [0, 1]; 0 for untimed modes
    pub fn progress(&self, tuning: &Tuning) -> f32 {
        match self.mode {
            Mode::Float => (self.elapsed / tuning.float_duration).clamp(0.0, 1.0),
            Mode::Invert => (self.elapsed / tuning.invert_duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Remaining shake time from the last explicit return to Base
    pub fn shake_left(&self) -> f32 {
        self.shake_left
    }

    /// Try to enter a special mode; only valid from Base
    pub fn enter(&mut self, target: Mode, tuning: &Tuning) -> bool {
        if self.mode != Mode::Base || target == Mode::Base {
            return false;
        }
        self.mode = target;
        self.elapsed = 0.0;
        self.reset_pending = false;
        self.speed_multiplier = match target {
            Mode::Speed => tuning.speed_multiplier,
            Mode::Float => tuning.float_multiplier,
            _ => 1.0,
        };
        true
    }

    /// Explicit return to Base. The mode (and with it the gravity
    /// direction) changes immediately; the multiplier reset waits for the
    /// shake so the transition never snaps speed mid-shake.
    pub fn request_base(&mut self, tuning: &Tuning) -> Option<Mode> {
        if self.mode == Mode::Base {
            return None;
        }
        let exited = self.mode;
        self.mode = Mode::Base;
        self.elapsed = 0.0;
        self.shake_left = tuning.shake_duration;
        self.reset_pending = true;
        Some(exited)
    }

    /// Step the mode timers; returns the mode exited on auto-revert
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) -> Option<Mode> {
        let duration = match self.mode {
            Mode::Float => tuning.float_duration,
            Mode::Invert => tuning.invert_duration,
            _ => return None,
        };
        self.elapsed += dt;
        if self.elapsed >= duration {
            let exited = self.mode;
            // Auto-revert resets immediately; only the explicit path
            // carries the shake-deferred reset.
            self.mode = Mode::Base;
            self.elapsed = 0.0;
            self.speed_multiplier = 1.0;
            self.reset_pending = false;
            return Some(exited);
        }
        None
    }

    /// Step the shake countdown; applies the deferred multiplier reset
    /// once the shake has fully played out
    pub fn tick_shake(&mut self, dt: f32) {
        if self.shake_left > 0.0 {
            self.shake_left = (self.shake_left - dt).max(0.0);
            if self.shake_left == 0.0 && self.reset_pending {
                self.speed_multiplier = 1.0;
                self.reset_pending = false;
            }
        }
    }
}
