//! Fire-and-forget projectiles
//!
//! Once spawned a projectile belongs to the pool, not to the strategy that
//! fired it. It flies in a straight planar line until it reaches its target,
//! strikes an obstacle, or its lifetime runs out.

use ashfall_core::{planar, planar_distance, EntityId, ObstacleQuery, Timer};
use glam::Vec3;
use serde::Serialize;
use tracing::{debug, trace};

use crate::agent::AgentId;
use crate::collab::{DamageSink, TargetId, TargetLookup};

/// Everything needed to launch one projectile
#[derive(Debug, Clone, Copy)]
pub struct ProjectileSpec {
    pub owner: AgentId,
    pub target: Option<TargetId>,
    pub origin: Vec3,
    /// Flattened and normalized on spawn
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub lifetime: f32,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: AgentId,
    pub target: Option<TargetId>,
    pub position: Vec3,
    pub velocity: Vec3,
    pub damage: f32,
    pub radius: f32,
    life: Timer,
}

impl Projectile {
    pub fn remaining_life(&self) -> f32 {
        self.life.remaining()
    }
}

/// Why a projectile left the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectileFate {
    Hit,
    Blocked,
    Expired,
}

/// Counters over the pool's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectileStats {
    pub spawned: u64,
    pub hits: u64,
    pub blocked: u64,
    pub expired: u64,
}

impl ProjectileStats {
    fn record(&mut self, fate: ProjectileFate) {
        match fate {
            ProjectileFate::Hit => self.hits += 1,
            ProjectileFate::Blocked => self.blocked += 1,
            ProjectileFate::Expired => self.expired += 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectilePool {
    projectiles: Vec<Projectile>,
    stats: ProjectileStats,
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, spec: ProjectileSpec) -> EntityId {
        let id = EntityId::new();
        let direction = planar(spec.direction).normalize_or_zero();
        self.projectiles.push(Projectile {
            id,
            owner: spec.owner,
            target: spec.target,
            position: spec.origin,
            velocity: direction * spec.speed.max(0.0),
            damage: spec.damage,
            radius: spec.radius.max(0.0),
            life: Timer::new(spec.lifetime),
        });
        self.stats.spawned += 1;
        debug!(owner = %spec.owner, projectile = ?id, "projectile spawned");
        id
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Projectiles fired by `owner` still in flight
    pub fn in_flight_from(&self, owner: AgentId) -> usize {
        self.projectiles.iter().filter(|p| p.owner == owner).count()
    }

    pub fn stats(&self) -> ProjectileStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }

    /// Advance every projectile by `dt` and resolve hits. Returns the number of hits.
    pub fn update(
        &mut self,
        dt: f32,
        targets: &dyn TargetLookup,
        damage: &mut dyn DamageSink,
        obstacles: &dyn ObstacleQuery,
    ) -> usize {
        let dt = dt.max(0.0);
        let mut hits = 0;
        let stats = &mut self.stats;

        self.projectiles.retain_mut(|projectile| {
            let fate = step(projectile, dt, targets, &mut *damage, obstacles);
            match fate {
                Some(fate) => {
                    if fate == ProjectileFate::Hit {
                        hits += 1;
                    }
                    stats.record(fate);
                    trace!(projectile = ?projectile.id, ?fate, "projectile removed");
                    false
                }
                None => true,
            }
        });
        hits
    }
}

fn step(
    projectile: &mut Projectile,
    dt: f32,
    targets: &dyn TargetLookup,
    damage: &mut dyn DamageSink,
    obstacles: &dyn ObstacleQuery,
) -> Option<ProjectileFate> {
    let start = projectile.position;
    let travel = projectile.velocity * dt;
    let distance = travel.length();
    let direction = if distance > 0.0 { travel / distance } else { Vec3::ZERO };
    let blocked_at = if distance > 0.0 {
        obstacles.cast(start, direction, distance)
    } else {
        None
    };
    let reach = blocked_at.unwrap_or(distance);

    // Swept test so a fast projectile cannot step over its target
    if let Some(target) = projectile.target.and_then(|id| targets.snapshot(id)) {
        if target.alive {
            let along = planar(target.position - start).dot(direction).clamp(0.0, reach);
            let point = start + direction * along;
            if planar_distance(point, target.position) <= projectile.radius {
                projectile.position = point;
                damage.apply_damage(target.id, projectile.damage, point);
                return Some(ProjectileFate::Hit);
            }
        }
    }

    if blocked_at.is_some() {
        projectile.position = start + direction * reach;
        return Some(ProjectileFate::Blocked);
    }
    projectile.position += travel;

    if projectile.life.tick(dt) {
        return Some(ProjectileFate::Expired);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{DamageLedger, StaticTarget, TargetRoster};
    use ashfall_core::NoObstacles;

    struct Wall(f32);

    impl ObstacleQuery for Wall {
        fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
            // Plane x = self.0
            if direction.x <= 0.0 {
                return None;
            }
            let d = (self.0 - origin.x) / direction.x;
            (d >= 0.0 && d <= max_distance).then_some(d)
        }
    }

    fn spec(target: Option<TargetId>) -> ProjectileSpec {
        ProjectileSpec {
            owner: AgentId(1),
            target,
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::new(1.0, 0.5, 0.0),
            speed: 4.0,
            damage: 8.0,
            radius: 0.5,
            lifetime: 1.0,
        }
    }

    #[test]
    fn test_flies_flat_and_hits_once() {
        let mut roster = TargetRoster::new();
        roster.insert(TargetId(1), StaticTarget::at(Vec3::new(2.0, 0.0, 0.0)));
        let mut ledger = DamageLedger::new();
        let mut pool = ProjectilePool::new();
        pool.spawn(spec(Some(TargetId(1))));

        assert_eq!(pool.update(0.25, &roster, &mut ledger, &NoObstacles), 0);
        let p = pool.iter().next().unwrap();
        assert!((p.position - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
        assert!((p.remaining_life() - 0.75).abs() < 1e-5);

        assert_eq!(pool.update(0.25, &roster, &mut ledger, &NoObstacles), 1);
        assert!(pool.is_empty());
        assert_eq!(ledger.events().len(), 1);
        assert_eq!(ledger.events()[0].amount, 8.0);
        assert_eq!(pool.stats().hits, 1);
    }

    #[test]
    fn test_fast_projectile_cannot_skip_target() {
        let mut roster = TargetRoster::new();
        roster.insert(TargetId(1), StaticTarget::at(Vec3::new(3.0, 0.0, 0.2)));
        let mut ledger = DamageLedger::new();
        let mut pool = ProjectilePool::new();
        pool.spawn(ProjectileSpec {
            speed: 40.0,
            ..spec(Some(TargetId(1)))
        });

        // One 10-unit step passes straight through the target
        assert_eq!(pool.update(0.25, &roster, &mut ledger, &NoObstacles), 1);
        assert!((ledger.events()[0].source.x - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_expires_after_lifetime() {
        let roster: TargetRoster<StaticTarget> = TargetRoster::new();
        let mut ledger = DamageLedger::new();
        let mut pool = ProjectilePool::new();
        pool.spawn(spec(None));

        for _ in 0..3 {
            pool.update(0.25, &roster, &mut ledger, &NoObstacles);
        }
        assert_eq!(pool.len(), 1);
        pool.update(0.25, &roster, &mut ledger, &NoObstacles);
        assert!(pool.is_empty());
        assert_eq!(pool.stats().expired, 1);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_blocked_by_obstacle() {
        let mut roster = TargetRoster::new();
        roster.insert(TargetId(1), StaticTarget::at(Vec3::new(5.0, 0.0, 0.0)));
        let mut ledger = DamageLedger::new();
        let mut pool = ProjectilePool::new();
        pool.spawn(spec(Some(TargetId(1))));

        pool.update(0.25, &roster, &mut ledger, &Wall(1.5));
        assert_eq!(pool.len(), 1);
        pool.update(0.25, &roster, &mut ledger, &Wall(1.5));
        assert!(pool.is_empty());
        assert_eq!(pool.stats().blocked, 1);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_dead_or_missing_target_is_not_hit() {
        let mut roster = TargetRoster::new();
        roster.insert(
            TargetId(1),
            StaticTarget {
                position: Vec3::new(1.0, 0.0, 0.0),
                alive: false,
            },
        );
        let mut ledger = DamageLedger::new();
        let mut pool = ProjectilePool::new();
        pool.spawn(spec(Some(TargetId(1))));
        pool.spawn(spec(Some(TargetId(9))));

        pool.update(0.25, &roster, &mut ledger, &NoObstacles);
        assert_eq!(pool.len(), 2);
        assert!(ledger.events().is_empty());
        assert_eq!(pool.in_flight_from(AgentId(1)), 2);
    }
}
