//! Ashfall Physics - Level collision using rapier3d
//!
//! Agents never simulate rigid bodies; they only ask the level "how far can I
//! travel in this direction". This crate keeps the static colliders and the
//! query pipeline that answers that.

use ashfall_core::ObstacleQuery;
use glam::Vec3;
use rapier3d::prelude::*;

/// Static level geometry plus the query pipeline for ray casts
pub struct ObstacleWorld {
    /// Always empty; the query API still wants one
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    /// Island manager, needed to remove colliders
    island_manager: IslandManager,
    /// Query pipeline for raycasts
    query_pipeline: QueryPipeline,
    /// Whether colliders changed since the last pipeline refresh
    dirty: bool,
}

impl ObstacleWorld {
    /// Create an empty level
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
            dirty: false,
        }
    }

    /// Add a static collider (walls, pillars, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.dirty = true;
        self.collider_set.insert(collider)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .build();
        self.add_static_collider(collider)
    }

    /// Create a static upright cylinder (a pillar) standing on `base`
    pub fn create_pillar(&mut self, base: Vec3, radius: f32, height: f32) -> ColliderHandle {
        let half_height = height * 0.5;
        let collider = ColliderBuilder::cylinder(half_height, radius)
            .translation(vector![base.x, base.y + half_height, base.z])
            .build();
        self.add_static_collider(collider)
    }

    /// Remove a collider
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set
            .remove(handle, &mut self.island_manager, &mut self.rigid_body_set, true);
        self.dirty = true;
    }

    /// Number of colliders in the level
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Rebuild the query acceleration structure after colliders changed
    pub fn update_queries(&mut self) {
        if self.dirty {
            self.query_pipeline.update(&self.collider_set);
            self.dirty = false;
            tracing::debug!(colliders = self.collider_set.len(), "obstacle queries rebuilt");
        }
    }

    /// Nearest collider along a ray and the distance to it. A zero
    /// direction never hits.
    pub fn first_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<(ColliderHandle, f32)> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );
        self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            QueryFilter::default(),
        )
    }
}

impl Default for ObstacleWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleQuery for ObstacleWorld {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        self.first_hit(origin, direction, max_distance)
            .map(|(_, distance)| distance)
    }
}
