//! Core types used throughout Ashfall

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::space::{planar, yaw_towards};

/// Unique identifier for transient entities (projectiles, effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Position and orientation of an actor in the world.
///
/// Orientation only ever turns about the Y axis; the play space is 2.5D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Forward direction flattened onto the ground plane
    pub fn planar_forward(&self) -> Vec3 {
        planar(self.forward()).normalize_or_zero()
    }

    /// Translate by the given offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Snap to face a point. Does nothing when the point is directly above or below.
    pub fn face_towards(&mut self, point: Vec3) {
        if let Some(yaw) = yaw_towards(self.position, point) {
            self.rotation = Quat::from_rotation_y(yaw);
        }
    }

    /// Turn towards a point with damping: `rate * dt` is the slerp factor, capped at 1.
    pub fn rotate_towards(&mut self, point: Vec3, rate: f32, dt: f32) {
        let Some(yaw) = yaw_towards(self.position, point) else {
            return;
        };
        let desired = Quat::from_rotation_y(yaw);
        let t = (rate * dt).clamp(0.0, 1.0);
        self.rotation = self.rotation.slerp(desired, t).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_default_forward_is_negative_z() {
        let t = Transform::default();
        assert!((t.forward() - Vec3::new(0.0, 0.0, -1.0)).length() < EPS);
    }

    #[test]
    fn test_face_towards_points_forward_at_target() {
        let mut t = Transform::from_position(Vec3::new(1.0, 0.0, 1.0));
        t.face_towards(Vec3::new(4.0, 2.0, 5.0));
        let expected = Vec3::new(3.0, 0.0, 4.0).normalize();
        assert!((t.planar_forward() - expected).length() < EPS);
    }

    #[test]
    fn test_face_towards_ignores_vertical_target() {
        let mut t = Transform::default();
        t.face_towards(Vec3::new(2.0, 0.0, 1.0));
        let before = t.rotation;
        t.face_towards(Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(t.rotation, before);
    }

    #[test]
    fn test_rotate_towards_full_factor_snaps() {
        let mut t = Transform::default();
        t.rotate_towards(Vec3::new(5.0, 0.0, 0.0), 10.0, 0.5);
        assert!((t.planar_forward() - Vec3::X).length() < EPS);
    }

    #[test]
    fn test_rotate_towards_partial_factor_turns_partway() {
        let mut t = Transform::default();
        t.rotate_towards(Vec3::new(5.0, 0.0, 0.0), 1.0, 0.25);
        let fwd = t.planar_forward();
        assert!(fwd.x > 0.0 && fwd.x < 1.0 - EPS);
    }
}
