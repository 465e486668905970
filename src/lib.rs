//! Modefall - deterministic core of a side-scrolling reaction game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle generation, mode machine)
//! - `session`: Session controller owning the public command surface
//! - `audio`: Fire-and-forget sound/shake port consumed by the core
//! - `highscores`: High-score persistence port
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod session;
pub mod sim;
pub mod tuning;

pub use audio::{EffectSink, NullEffects, SoundEffect};
pub use highscores::{FileScores, MemoryScores, ScoreStore};
pub use session::{GameSession, Snapshot};
pub use sim::{GameEvent, Mode};
pub use tuning::Tuning;

/// Game configuration constants
///
/// Everything geometric is a fixed fraction of the viewport so the game
/// plays identically across screen sizes.
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Actor x position (fraction of viewport width, constant during play)
    pub const ACTOR_X_FRACTION: f32 = 0.22;
    /// Actor bounding-box side (fraction of viewport width)
    pub const ACTOR_SIZE_FRACTION: f32 = 0.055;
    /// Actor spawn height (fraction of viewport height)
    pub const ACTOR_SPAWN_Y_FRACTION: f32 = 0.45;

    /// Gravity magnitude (fraction of viewport height, per s^2)
    pub const GRAVITY_FRACTION: f32 = 0.9;
    /// Base jump speed (fraction of viewport height, per s)
    pub const BASE_JUMP_FRACTION: f32 = 0.65;
    /// Terminal fall/rise speed (fraction of viewport height, per s)
    pub const MAX_FALL_FRACTION: f32 = 1.1;
    /// Base scroll speed (fraction of viewport width, per s)
    pub const BASE_SCROLL_FRACTION: f32 = 0.28;

    /// Safe corridor: central vertical band that generation must keep traversable
    pub const CORRIDOR_TOP_FRACTION: f32 = 0.30;
    pub const CORRIDOR_BOTTOM_FRACTION: f32 = 0.70;

    /// Velocity retained after a ceiling bounce
    pub const CEILING_DAMPING: f32 = 0.5;
    /// Velocity retained after a ground bounce in the ground-immune mode
    pub const FLOAT_GROUND_DAMPING: f32 = 0.45;
}

/// Axis-aligned rectangle overlap (full rectangles, no hitbox shrinkage)
#[inline]
pub fn aabb_overlap(
    ax: f32,
    ay: f32,
    aw: f32,
    ah: f32,
    bx: f32,
    by: f32,
    bw: f32,
    bh: f32,
) -> bool {
    ax < bx + bw && bx < ax + aw && ay < by + bh && by < ay + ah
}
