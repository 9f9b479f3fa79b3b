//! Straight-line navigation for headless runs and tests

use ashfall_core::{planar_direction, planar_distance};
use glam::Vec3;

use crate::collab::NavigationMover;

/// Walks straight at the destination on the ground plane, keeping height.
#[derive(Debug, Clone)]
pub struct StraightLineMover {
    speed: f32,
    destination: Option<Vec3>,
    /// Stop this close to the destination
    pub stopping_distance: f32,
    orders: u64,
}

impl StraightLineMover {
    pub fn new() -> Self {
        Self {
            speed: 0.0,
            destination: None,
            stopping_distance: 0.1,
            orders: 0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Number of move orders received
    pub fn orders(&self) -> u64 {
        self.orders
    }
}

impl Default for StraightLineMover {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationMover for StraightLineMover {
    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn move_to(&mut self, destination: Vec3) {
        self.destination = Some(destination);
        self.orders += 1;
    }

    fn stop(&mut self) {
        self.destination = None;
    }

    fn advance(&mut self, position: Vec3, dt: f32) -> Vec3 {
        let Some(destination) = self.destination else {
            return position;
        };

        let remaining = planar_distance(position, destination) - self.stopping_distance;
        if remaining <= 0.0 {
            self.destination = None;
            return position;
        }

        let step = (self.speed * dt).min(remaining);
        position + planar_direction(position, destination) * step
    }
}
