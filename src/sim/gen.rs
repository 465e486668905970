//! Procedural obstacle generation
//!
//! The fairness-critical part of the game. Two guarantees hold for every
//! obstacle ever produced:
//! - the safe corridor (central band of the viewport) is never occupied,
//!   at spawn or anywhere inside a moving obstacle's travel band;
//! - moving obstacles keep a minimum spacing, enforced by a countdown
//!   redrawn from a level-dependent range rather than per-obstacle
//!   probability, which would occasionally cluster.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Geometry, Obstacle, ObstacleKind};
use crate::tuning::Tuning;

const KINDS: [ObstacleKind; 4] = [
    ObstacleKind::Narrow,
    ObstacleKind::Normal,
    ObstacleKind::Wide,
    ObstacleKind::Spiked,
];

/// Seeded obstacle factory; all randomness in the game flows through here
#[derive(Debug, Clone)]
pub struct ObstacleGenerator {
    rng: Pcg32,
    /// Obstacles until the next moving one may be emitted
    until_moving: u32,
}

impl ObstacleGenerator {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (min, max) = tuning.moving_gap(1);
        let until_moving = rng.random_range(min..=max);
        Self { rng, until_moving }
    }

    /// Produce the next obstacle for the given level
    pub fn next(&mut self, level: u32, geom: &Geometry, tuning: &Tuning) -> Obstacle {
        self.generate(level, geom, tuning, true)
    }

    /// Opening obstacle: always static, and the moving countdown is left
    /// untouched so the spacing guarantee is unaffected
    pub fn next_opening(&mut self, level: u32, geom: &Geometry, tuning: &Tuning) -> Obstacle {
        self.generate(level, geom, tuning, false)
    }

    fn generate(
        &mut self,
        level: u32,
        geom: &Geometry,
        tuning: &Tuning,
        allow_moving: bool,
    ) -> Obstacle {
        let kind = self.draw_kind(level, tuning);
        let width = geom.obstacle_width(kind);
        let top_aligned = self.rng.random_bool(0.5);

        // Height from the level band, then clamped so the occupied span
        // can never invade the safe corridor for this alignment.
        let min_h = geom.height * tuning.height_min_fraction;
        let max_h = geom.height * tuning.height_max_fraction(level);
        let corridor_limit = if top_aligned {
            geom.corridor_top
        } else {
            geom.ground_y - geom.corridor_bottom
        };
        let drawn = self.rng.random_range(min_h..=max_h);
        let height = drawn.min(corridor_limit).max(min_h.min(corridor_limit));

        let moving = if !allow_moving {
            false
        } else if self.until_moving == 0 {
            let (min, max) = tuning.moving_gap(level);
            self.until_moving = self.rng.random_range(min..=max);
            true
        } else {
            self.until_moving -= 1;
            false
        };

        let (speed_lo, speed_hi) = tuning.move_speed_fraction(level);
        let move_speed = if moving {
            self.rng.random_range(geom.height * speed_lo..=geom.height * speed_hi)
        } else {
            0.0
        };
        // Start drifting into the band: top-aligned obstacles begin at the
        // upper bound, bottom-aligned at the lower, so the first reversal
        // happens at the far edge.
        let move_dir = if top_aligned { 1.0 } else { -1.0 };

        let y = if top_aligned {
            0.0
        } else {
            geom.ground_y - height
        };

        Obstacle {
            x: geom.width,
            y,
            width,
            height,
            kind,
            top_aligned,
            moving,
            move_speed,
            move_dir,
            passed: false,
        }
    }

    /// Level-dependent weighted draw over the four kinds
    fn draw_kind(&mut self, level: u32, tuning: &Tuning) -> ObstacleKind {
        let mut weights = tuning.kind_weights(level);
        if level < tuning.spiked_min_level {
            weights[3] = 0;
        }
        let total: u32 = weights.iter().sum();
        debug_assert!(total > 0);
        let mut roll = self.rng.random_range(0..total);
        for (kind, &weight) in KINDS.iter().zip(&weights) {
            if roll < weight {
                return *kind;
            }
            roll -= weight;
        }
        ObstacleKind::Normal
    }
}
