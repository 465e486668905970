//! Actor physics: gravity integration, jumps, bounds policy
//!
//! Policy at the vertical bounds is asymmetric by design: the ceiling is
//! always a damped bounce in every mode, while ground contact is fatal
//! unless the current mode grants ground immunity.

use crate::consts::{CEILING_DAMPING, FLOAT_GROUND_DAMPING};

use super::state::{Actor, Geometry};

/// Outcome of one integration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundContact {
    None,
    /// Ground-immune mode: velocity reflected and damped, position clamped
    Bounced,
    /// Ground hit outside the immune mode; the session ends as a collision
    Fatal,
}

/// Advance the actor by `dt`: integrate velocity (clamped to the
/// symmetric terminal speed), integrate position, then apply the bounds
/// policy.
pub fn advance_actor(
    actor: &mut Actor,
    dt: f32,
    geom: &Geometry,
    gravity_dir: f32,
    ground_immune: bool,
) -> GroundContact {
    actor.vel_y += geom.gravity * gravity_dir * dt;
    actor.vel_y = actor
        .vel_y
        .clamp(-geom.max_fall_speed, geom.max_fall_speed);
    actor.pos.y += actor.vel_y * dt;

    // Ceiling: reflect and damp, never fatal
    if actor.pos.y < 0.0 {
        actor.pos.y = 0.0;
        if actor.vel_y < 0.0 {
            actor.vel_y = -actor.vel_y * CEILING_DAMPING;
        }
    }

    // Ground
    if actor.pos.y + actor.size.y > geom.ground_y {
        if ground_immune {
            actor.pos.y = geom.ground_y - actor.size.y;
            if actor.vel_y > 0.0 {
                actor.vel_y = -actor.vel_y * FLOAT_GROUND_DAMPING;
            }
            return GroundContact::Bounced;
        }
        return GroundContact::Fatal;
    }

    GroundContact::None
}

/// Set jump velocity. The sign follows the gravity direction so the
/// gesture always pushes against gravity, which keeps the button mapping
/// intuitive in Invert.
pub fn jump(actor: &mut Actor, geom: &Geometry, power: f32, gravity_dir: f32) {
    actor.vel_y = -geom.base_jump_speed * power * gravity_dir;
}

/// Direct vertical positioning for the Float mode: center the actor on
/// `y` with no smoothing, clamped to `[0, ground - height]`.
pub fn set_vertical_target(actor: &mut Actor, geom: &Geometry, y: f32) {
    let top = y - actor.size.y / 2.0;
    actor.pos.y = top.clamp(0.0, geom.ground_y - actor.size.y);
}
