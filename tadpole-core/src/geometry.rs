//! Steering and body-shape math shared by every tadpole.

use crate::{math, Vector2D};

/// Base spacing between chain points, negative so points trail the head
pub const STRETCH_BASE: f32 = -7.0;
/// Extra spacing per unit of head speed
pub const STRETCH_PER_SPEED: f32 = 0.5;
/// Sway phase gained per chain point per unit of head speed
pub const SWAY_RATE: f32 = 12.0;
/// Phase offset between neighbouring chain points
pub const SWAY_PHASE_STEP: f32 = 10.0;
/// Divisor turning accumulated sway into radians
pub const SWAY_PERIOD: f32 = 700.0;

/// Heading from `from` to `to` in radians
pub fn angle_to_target(from: Vector2D, to: Vector2D) -> f32 {
    math::atan2(to.y - from.y, to.x - from.x)
}

/// Split a speed along `angle` into x/y velocity components
pub fn velocity_toward(speed: f32, angle: f32) -> Vector2D {
    Vector2D::from_polar(speed, angle)
}

/// Bounce one axis off the walls at `0` and `extent`.
///
/// The velocity component is negated only when the position is at or past a
/// wall while still moving outward, so a crossing flips it exactly once.
/// The position is mirrored back across the wall and clamped into
/// `0..=extent`. Returns whether the component was negated.
pub fn reflect_axis(position: &mut f32, velocity: &mut f32, extent: f32) -> bool {
    let outward = (*position >= extent && *velocity > 0.0) || (*position <= 0.0 && *velocity < 0.0);
    if outward {
        *velocity = -*velocity;
    }

    if *position > extent {
        *position = 2.0 * extent - *position;
    } else if *position < 0.0 {
        *position = -*position;
    }
    *position = position.clamp(0.0, extent);

    outward
}

/// Drag the trailing chain behind an already-moved head.
///
/// `path[0]` must hold the new head position and `motion` the velocity the
/// head just moved with. Every following point is pulled a stretch distance
/// behind the point updated before it and pushed sideways by a travelling
/// sine wave whose phase accumulates in `sway`.
///
/// A head that did not move leaves the chain untouched.
pub fn update_trailing_chain(path: &mut [Vector2D], motion: Vector2D, sway: &mut f32) {
    let Some((head, rest)) = path.split_first_mut() else {
        return;
    };

    let head_speed = motion.magnitude();
    if head_speed <= 0.0 || !head_speed.is_finite() {
        return;
    }

    let increment = head_speed * SWAY_RATE;
    let stretch = STRETCH_BASE - head_speed * STRETCH_PER_SPEED;

    let mut anchor = *head;
    let mut direction = motion;

    for (offset, point) in rest.iter_mut().enumerate() {
        let index = (offset + 1) as f32;
        // direction for the next point, measured before this one moves
        let next_direction = anchor - *point;

        *sway += increment;

        let speed = direction.magnitude();
        if speed > 0.0 {
            let oscillation = math::sin((*sway + index * SWAY_PHASE_STEP) / SWAY_PERIOD) / speed;
            anchor += direction * (stretch / speed);
            *point = Vector2D::new(
                anchor.x - direction.y * oscillation,
                anchor.y + direction.x * oscillation,
            );
        } else {
            *point = anchor;
        }

        direction = next_direction;
    }
}
