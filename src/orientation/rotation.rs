//! Rotation helpers.

use crate::geometry::{MIN_DIRECTION_LENGTH, UP};
use glam::{Mat3, Quat, Vec3};

/// Forward axis of the camera rig in its local frame.
pub const RIG_FORWARD: Vec3 = Vec3::X;

/// Fixed lateral correction turning the look-at frame (+Z forward) into the
/// rig frame (+X forward).
pub const RIG_CORRECTION: Quat = Quat::from_xyzw(0.0, -0.707_106_77, 0.0, 0.707_106_77);

/// Rotation whose rig forward axis points along `direction`, with the rig's
/// up axis as close to world up as possible.
///
/// Returns `None` for a degenerate direction.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    if !direction.is_finite() || direction.length() < MIN_DIRECTION_LENGTH {
        return None;
    }
    let forward = direction.normalize();

    let side = UP.cross(forward);
    let x_axis = if side.length_squared() < 1e-8 {
        // Looking straight up or down.
        forward.any_orthonormal_vector()
    } else {
        side.normalize()
    };
    let y_axis = forward.cross(x_axis);

    let look = Quat::from_mat3(&Mat3::from_cols(x_axis, y_axis, forward));
    Some((look * RIG_CORRECTION).normalize())
}

/// Shortest-arc angle between two orientations, in radians.
pub fn angle_between(a: Quat, b: Quat) -> f32 {
    let delta = b.normalize() * a.normalize().conjugate();
    2.0 * delta.xyz().length().atan2(delta.w.abs())
}

/// Moves `from` toward `to` by at most `max_angle` radians.
pub fn rotate_towards(from: Quat, to: Quat, max_angle: f32) -> Quat {
    let max_angle = if max_angle.is_finite() { max_angle.max(0.0) } else { 0.0 };
    let angle = angle_between(from, to);
    if angle <= max_angle || angle < 1e-6 {
        return to;
    }
    from.slerp(to, max_angle / angle).normalize()
}
