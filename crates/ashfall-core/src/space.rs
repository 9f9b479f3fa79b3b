//! Planar space helpers
//!
//! Gameplay distances ignore the vertical axis; the world is effectively 2.5D.

use glam::Vec3;

/// Drop the vertical component.
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Distance between two points measured on the ground plane.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(b - a).length()
}

/// Normalized ground-plane direction from `from` to `to`, or zero if they coincide.
pub fn planar_direction(from: Vec3, to: Vec3) -> Vec3 {
    planar(to - from).normalize_or_zero()
}

/// Yaw (radians about +Y) that makes a -Z forward vector point from `from` to `to`.
pub fn yaw_towards(from: Vec3, to: Vec3) -> Option<f32> {
    let dir = planar(to - from);
    if dir.length_squared() < f32::EPSILON {
        return None;
    }
    Some((-dir.x).atan2(-dir.z))
}

/// Unsigned angle in radians between two directions after flattening both.
pub fn angle_between_planar(a: Vec3, b: Vec3) -> f32 {
    let a = planar(a).normalize_or_zero();
    let b = planar(b).normalize_or_zero();
    if a == Vec3::ZERO || b == Vec3::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Ray queries against static level geometry.
pub trait ObstacleQuery {
    /// Distance along `direction` (normalized) to the first obstacle within `max_distance`.
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32>;
}

/// An empty level.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl ObstacleQuery for NoObstacles {
    fn cast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<f32> {
        None
    }
}
