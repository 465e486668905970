//! Session state and core simulation types
//!
//! Everything the renderer may observe is derived from the types here;
//! mutation happens only inside the per-tick pipeline.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::r#gen::ObstacleGenerator;
use super::modes::{Mode, ModeMachine};
use crate::consts::*;
use crate::tuning::Tuning;

/// Viewport-derived geometry, computed once at initialize
///
/// All speeds and sizes are fixed fractions of the viewport so identical
/// inputs produce identical play at any resolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Geometry {
    pub width: f32,
    pub height: f32,
    /// Ground line; contact below this is fatal outside the immune mode
    pub ground_y: f32,
    pub actor_x: f32,
    pub actor_size: Vec2,
    pub gravity: f32,
    pub base_jump_speed: f32,
    pub max_fall_speed: f32,
    pub base_scroll_speed: f32,
    /// Safe corridor band: generation must never occupy (top, bottom)
    pub corridor_top: f32,
    pub corridor_bottom: f32,
}

impl Geometry {
    /// Derive geometry from viewport dimensions; `None` for non-positive sizes
    pub fn derive(width: f32, height: f32) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let side = width * ACTOR_SIZE_FRACTION;
        Some(Self {
            width,
            height,
            ground_y: height,
            actor_x: width * ACTOR_X_FRACTION,
            actor_size: Vec2::new(side, side),
            gravity: height * GRAVITY_FRACTION,
            base_jump_speed: height * BASE_JUMP_FRACTION,
            max_fall_speed: height * MAX_FALL_FRACTION,
            base_scroll_speed: width * BASE_SCROLL_FRACTION,
            corridor_top: height * CORRIDOR_TOP_FRACTION,
            corridor_bottom: height * CORRIDOR_BOTTOM_FRACTION,
        })
    }

    /// Collision width for an obstacle kind
    pub fn obstacle_width(&self, kind: ObstacleKind) -> f32 {
        self.width * kind.width_fraction()
    }
}

/// The player-controlled entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner; x is constant during normal play
    pub pos: Vec2,
    pub vel_y: f32,
    /// Cosmetic per-frame offset, excluded from collision
    pub shake_offset: f32,
    pub size: Vec2,
}

impl Actor {
    pub fn spawn(geom: &Geometry) -> Self {
        Self {
            pos: Vec2::new(geom.actor_x, geom.height * ACTOR_SPAWN_Y_FRACTION),
            vel_y: 0.0,
            shake_offset: 0.0,
            size: geom.actor_size,
        }
    }
}

/// Obstacle silhouettes, each with a distinct collision width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Narrow,
    Normal,
    Wide,
    /// Hazard silhouette, gated behind a minimum level
    Spiked,
}

impl ObstacleKind {
    pub fn width_fraction(&self) -> f32 {
        match self {
            ObstacleKind::Narrow => 0.045,
            ObstacleKind::Normal => 0.07,
            ObstacleKind::Wide => 0.12,
            ObstacleKind::Spiked => 0.07,
        }
    }
}

/// One obstacle in the scrolling stream
///
/// `y` is the top edge. At creation exactly one of the two alignments
/// holds: top-aligned (`y == 0`) or bottom-aligned
/// (`y == ground - height`). Moving obstacles oscillate inside the
/// travel band derived from their alignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    pub top_aligned: bool,
    pub moving: bool,
    /// Oscillation speed magnitude (px/s)
    pub move_speed: f32,
    /// Oscillation direction, +1 downward / -1 upward
    pub move_dir: f32,
    /// Set exactly once, when the actor's leading edge clears the
    /// trailing edge; used to award score a single time
    pub passed: bool,
}

impl Obstacle {
    /// Vertical travel band for the top edge, derived from alignment
    ///
    /// Both bounds respect the safe corridor, so an oscillating obstacle
    /// can never drift into the central band.
    pub fn travel_band(&self, geom: &Geometry) -> (f32, f32) {
        if self.top_aligned {
            (0.0, (geom.corridor_top - self.height).max(0.0))
        } else {
            (geom.corridor_bottom, geom.ground_y - self.height)
        }
    }

    /// Fully past the left edge of the viewport
    pub fn off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }
}

/// Events produced by a tick, mapped to side-effect ports by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    ModeEntered(Mode),
    ModeExited(Mode),
    Scored,
    LeveledUp(u32),
    Collided,
    GameOver,
}

/// Complete simulation state for one play session
///
/// The aggregate root: the session controller is its only writer.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub geom: Geometry,
    /// Run seed, reused on reset so restarts are reproducible
    pub seed: u64,
    pub actor: Actor,
    /// Live obstacles in spawn order (front of the vec is leftmost)
    pub obstacles: Vec<Obstacle>,
    pub generator: ObstacleGenerator,
    pub modes: ModeMachine,
    pub score: u64,
    pub level: u32,
    /// Total obstacles passed, drives cyclic level progression
    pub passed_total: u32,
    /// Current spawn spacing in pixels, recomputed on level change
    pub spacing: f32,
    pub running: bool,
    /// Accumulated play time in seconds
    pub elapsed: f32,
}

impl SessionState {
    pub fn new(geom: Geometry, seed: u64, tuning: &Tuning) -> Self {
        let mut state = Self {
            geom,
            seed,
            actor: Actor::spawn(&geom),
            obstacles: Vec::new(),
            generator: ObstacleGenerator::new(seed, tuning),
            modes: ModeMachine::new(),
            score: 0,
            level: 1,
            passed_total: 0,
            spacing: geom.width * tuning.spacing_fraction(1),
            running: false,
            elapsed: 0.0,
        };
        state.spawn_opening_obstacle(tuning);
        state
    }

    /// Reinitialize in place without destroying the aggregate
    pub fn reset(&mut self, tuning: &Tuning) {
        self.actor = Actor::spawn(&self.geom);
        self.obstacles.clear();
        self.generator = ObstacleGenerator::new(self.seed, tuning);
        self.modes = ModeMachine::new();
        self.score = 0;
        self.level = 1;
        self.passed_total = 0;
        self.spacing = self.geom.width * tuning.spacing_fraction(1);
        self.elapsed = 0.0;
        self.running = false;
        self.spawn_opening_obstacle(tuning);
    }

    /// The opening obstacle is forced non-moving and spawned fully
    /// off-screen so every run has a fair start.
    fn spawn_opening_obstacle(&mut self, tuning: &Tuning) {
        let ob = self
            .generator
            .next_opening(self.level, &self.geom, tuning);
        self.obstacles.push(ob);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_rejects_bad_viewport() {
        assert!(Geometry::derive(0.0, 1600.0).is_none());
        assert!(Geometry::derive(1000.0, -1.0).is_none());
        assert!(Geometry::derive(1000.0, 1600.0).is_some());
    }

    #[test]
    fn test_geometry_fractions() {
        let geom = Geometry::derive(1000.0, 1600.0).unwrap();
        assert_eq!(geom.actor_x, 220.0);
        assert_eq!(geom.ground_y, 1600.0);
        assert_eq!(geom.corridor_top, 480.0);
        assert_eq!(geom.corridor_bottom, 1120.0);
        assert!(geom.obstacle_width(ObstacleKind::Wide) > geom.obstacle_width(ObstacleKind::Narrow));
    }

    #[test]
    fn test_opening_obstacle_static_and_off_screen() {
        let tuning = Tuning::default();
        let geom = Geometry::derive(1000.0, 1600.0).unwrap();
        let state = SessionState::new(geom, 7, &tuning);
        assert_eq!(state.obstacles.len(), 1);
        let first = &state.obstacles[0];
        assert!(!first.moving);
        assert!(first.x >= geom.width);
    }

    #[test]
    fn test_reset_reinitializes_in_place() {
        let tuning = Tuning::default();
        let geom = Geometry::derive(1000.0, 1600.0).unwrap();
        let mut state = SessionState::new(geom, 7, &tuning);
        state.score = 42;
        state.level = 3;
        state.passed_total = 6;
        state.running = true;

        state.reset(&tuning);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.passed_total, 0);
        assert!(!state.running);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.actor.vel_y, 0.0);
    }

    #[test]
    fn test_travel_band_respects_corridor() {
        let geom = Geometry::derive(1000.0, 1600.0).unwrap();
        let top = Obstacle {
            x: 0.0,
            y: 0.0,
            width: 70.0,
            height: 300.0,
            kind: ObstacleKind::Normal,
            top_aligned: true,
            moving: true,
            move_speed: 100.0,
            move_dir: 1.0,
            passed: false,
        };
        let (lo, hi) = top.travel_band(&geom);
        assert_eq!(lo, 0.0);
        // Bottom edge at the band limit stays above the corridor
        assert!(hi + top.height <= geom.corridor_top);

        let bottom = Obstacle {
            top_aligned: false,
            y: geom.ground_y - 300.0,
            ..top
        };
        let (lo, hi) = bottom.travel_band(&geom);
        assert!(lo >= geom.corridor_bottom);
        assert!(hi + bottom.height <= geom.ground_y + 0.001);
    }
}
