//! Ashfall Core - Core types and utilities shared by the Ashfall crates
//!
//! This crate provides the foundational types used throughout the game:
//! - Mathematical primitives (re-exported from glam)
//! - Transform with facing helpers for the 2.5D play space
//! - Planar distance/direction helpers and the obstacle ray query
//! - Game clock and countdown timers

pub mod space;
pub mod time;
pub mod types;

pub use glam::{Quat, Vec2, Vec3};
pub use space::{
    angle_between_planar, planar, planar_direction, planar_distance, yaw_towards, NoObstacles,
    ObstacleQuery,
};
pub use time::{GameTime, TimeConfig, TimeError, Timer};
pub use types::{EntityId, Transform};
