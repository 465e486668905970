//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time advances only by the `dt` the host supplies
//! - No rendering, audio, or storage dependencies (ticks report events)

pub mod r#gen;
pub mod modes;
pub mod physics;
pub mod state;
pub mod tick;

pub use r#gen::ObstacleGenerator;
pub use modes::{Mode, ModeMachine, PressAction, classify_press};
pub use physics::GroundContact;
pub use state::{Actor, GameEvent, Geometry, Obstacle, ObstacleKind, SessionState};
pub use tick::tick;
