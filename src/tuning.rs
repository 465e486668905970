//! Data-driven game balance
//!
//! Every number that was tuned by hand lives here rather than being
//! scattered through the simulation. The structural contracts (band
//! ordering, level monotonicity, corridor safety) are enforced by the
//! simulation and its tests; the values themselves are free to change.

use serde::{Deserialize, Serialize};

/// Number of distinct level themes; levels cycle 1..=LEVEL_COUNT
pub const LEVEL_COUNT: u32 = 4;

/// Press-duration classification bands, in milliseconds
///
/// A completed press is classified by where its duration falls, cyclic
/// modulo the full period (the sum of all band widths): short presses
/// jump, longer presses enter Speed, then Float, then Invert, then wrap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PressBands {
    /// Band 1 width: Base jump, power scales linearly across the band
    pub jump_ms: u32,
    /// Band 2 width: enter Speed (plus a fixed-bonus jump)
    pub speed_ms: u32,
    /// Band 3 width: enter Float (no jump)
    pub float_ms: u32,
    /// Band 4 width: enter Invert
    pub invert_ms: u32,
}

impl Default for PressBands {
    fn default() -> Self {
        Self {
            jump_ms: 300,
            speed_ms: 300,
            float_ms: 300,
            invert_ms: 300,
        }
    }
}

impl PressBands {
    /// Full press cycle: the sum of all band widths
    pub fn period_ms(&self) -> u32 {
        self.jump_ms + self.speed_ms + self.float_ms + self.invert_ms
    }
}

/// Game balance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub press_bands: PressBands,

    // === Jump ===
    /// Extra jump power at the top of band 1 (power ramps 1.0 -> 1.0 + this)
    pub jump_power_ramp: f32,
    /// Fixed jump power applied when entering Speed via band 2
    pub speed_jump_power: f32,

    // === Modes ===
    /// Scroll-speed multiplier while in Speed
    pub speed_multiplier: f32,
    /// Scroll-speed multiplier while in Float
    pub float_multiplier: f32,
    /// Seconds before Float auto-reverts to Base
    pub float_duration: f32,
    /// Seconds before Invert auto-reverts to Base
    pub invert_duration: f32,
    /// Cosmetic actor shake played on an explicit return to Base; the
    /// speed-multiplier reset is deferred until this has run out
    pub shake_duration: f32,

    // === Obstacle generation (indexed by level - 1) ===
    /// Kind weights per level: [Narrow, Normal, Wide, Spiked]
    pub kind_weights: [[u32; 4]; LEVEL_COUNT as usize],
    /// Lowest level at which Spiked obstacles may appear
    pub spiked_min_level: u32,
    /// Obstacle height band (fractions of viewport height); the max
    /// widens with level and is clamped by the safe corridor at draw time
    pub height_min_fraction: f32,
    pub height_max_fraction: [f32; LEVEL_COUNT as usize],
    /// Obstacles until the next moving one, redrawn from [min, max] each
    /// time a moving obstacle is emitted
    pub moving_gap: [(u32, u32); LEVEL_COUNT as usize],
    /// Oscillation speed band (fractions of viewport height, per s)
    pub move_speed_fraction: [(f32, f32); LEVEL_COUNT as usize],
    /// Horizontal spacing between spawns (fraction of viewport width)
    pub spacing_fraction: [f32; LEVEL_COUNT as usize],

    // === Progression ===
    /// Obstacles passed per level-up
    pub level_up_passes: u32,

    // === Persistence ===
    /// Seconds of play between safety flushes of the high score
    pub score_flush_interval: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            press_bands: PressBands::default(),
            jump_power_ramp: 0.35,
            speed_jump_power: 1.25,
            speed_multiplier: 1.5,
            float_multiplier: 1.9,
            float_duration: 6.0,
            invert_duration: 5.0,
            shake_duration: 0.35,
            kind_weights: [
                [30, 55, 15, 0],
                [25, 45, 22, 8],
                [20, 38, 27, 15],
                [16, 32, 30, 22],
            ],
            spiked_min_level: 2,
            height_min_fraction: 0.12,
            height_max_fraction: [0.20, 0.26, 0.32, 0.38],
            moving_gap: [(4, 7), (3, 6), (2, 4), (1, 3)],
            move_speed_fraction: [(0.10, 0.20), (0.12, 0.24), (0.14, 0.28), (0.16, 0.32)],
            spacing_fraction: [0.48, 0.42, 0.36, 0.30],
            level_up_passes: 2,
            score_flush_interval: 10.0,
        }
    }
}

impl Tuning {
    /// Clamp a level into the cyclic 1..=LEVEL_COUNT range and index a table
    #[inline]
    fn idx(level: u32) -> usize {
        (level.clamp(1, LEVEL_COUNT) - 1) as usize
    }

    pub fn kind_weights(&self, level: u32) -> [u32; 4] {
        self.kind_weights[Self::idx(level)]
    }

    pub fn height_max_fraction(&self, level: u32) -> f32 {
        self.height_max_fraction[Self::idx(level)]
    }

    pub fn moving_gap(&self, level: u32) -> (u32, u32) {
        self.moving_gap[Self::idx(level)]
    }

    pub fn move_speed_fraction(&self, level: u32) -> (f32, f32) {
        self.move_speed_fraction[Self::idx(level)]
    }

    pub fn spacing_fraction(&self, level: u32) -> f32 {
        self.spacing_fraction[Self::idx(level)]
    }
}
