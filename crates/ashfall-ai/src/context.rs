//! Per-agent state read by the behavior states, and the per-tick view that
//! bundles it with the agent's collaborators.

use ashfall_core::{planar, planar_distance, ObstacleQuery, Transform};
use glam::Vec3;

use crate::agent::AgentId;
use crate::collab::{DamageSink, HitZone, NavigationMover, PostureDriver, TargetSnapshot};
use crate::projectile::ProjectilePool;
use crate::states::BoundStrategy;

/// Tuning and kinematic state of one agent
#[derive(Debug, Clone)]
pub struct AgentBody {
    pub transform: Transform,
    /// Base movement speed handed to the navigation mover
    pub movement_speed: f32,
    /// Multiplier applied to `movement_speed` (0 idle/attacking, <1 chasing)
    pub movement_speed_modifier: f32,
    /// Turn damping rate (slerp factor per second)
    pub rotation_speed: f32,
    pub detection_radius: f32,
    /// Beyond this the target is no longer valid; never below `detection_radius`
    pub chase_range: f32,
    /// Attack range used when no strategy is bound
    pub fallback_attack_range: f32,
    /// Cooldown used when no strategy is bound
    pub fallback_cooldown: f32,
    /// Modifier while chasing
    pub chase_speed_fraction: f32,
    /// Seconds between move-to refreshes while chasing
    pub repath_interval: f32,
}

impl Default for AgentBody {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            movement_speed: 3.5,
            movement_speed_modifier: 0.0,
            rotation_speed: 8.0,
            detection_radius: 10.0,
            chase_range: 15.0,
            fallback_attack_range: 2.0,
            fallback_cooldown: 0.0,
            chase_speed_fraction: 0.8,
            repath_interval: 0.2,
        }
    }
}

impl AgentBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Default::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Speed the mover should use right now
    pub fn effective_speed(&self) -> f32 {
        self.movement_speed * self.movement_speed_modifier
    }
}

/// Requests a strategy or state makes against the whole agent, applied by the
/// agent once the current phase returns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AgentRequests {
    force_idle: Option<f32>,
}

impl AgentRequests {
    /// Ask for a forced idle; overlapping requests keep the longest
    pub fn request_force_idle(&mut self, duration: f32) {
        let duration = duration.max(0.0);
        self.force_idle = Some(self.force_idle.map_or(duration, |d| d.max(duration)));
    }

    pub fn take_force_idle(&mut self) -> Option<f32> {
        self.force_idle.take()
    }

    pub fn is_empty(&self) -> bool {
        self.force_idle.is_none()
    }
}

/// Everything a behavior state may touch during one callback
pub struct AgentContext<'a> {
    pub agent: AgentId,
    pub body: &'a mut AgentBody,
    /// The target as sensed this phase; `None` when there is no handle or it no longer resolves
    pub target: Option<TargetSnapshot>,
    /// Read-only here; see [`BoundStrategy`]
    pub strategy: BoundStrategy<'a>,
    pub mover: &'a mut dyn NavigationMover,
    pub posture: &'a mut dyn PostureDriver,
    pub hit_zone: &'a mut dyn HitZone,
    pub damage: &'a mut dyn DamageSink,
    pub obstacles: &'a dyn ObstacleQuery,
    pub projectiles: &'a mut ProjectilePool,
    pub requests: &'a mut AgentRequests,
    pub dt: f32,
}

impl<'a> AgentContext<'a> {
    /// Planar distance to the sensed target, alive or not
    pub fn target_distance(&self) -> Option<f32> {
        self.target
            .map(|target| planar_distance(self.body.position(), target.position))
    }

    /// Target present, alive, and within chase range
    pub fn is_target_valid(&self) -> bool {
        match self.target {
            Some(target) if target.alive => {
                planar_distance(self.body.position(), target.position) <= self.body.chase_range
            }
            _ => false,
        }
    }

    pub fn is_in_detection_range(&self) -> bool {
        self.is_target_valid()
            && self
                .target_distance()
                .is_some_and(|d| d <= self.body.detection_radius)
    }

    /// Valid target within the bound strategy's range and engagement gate
    pub fn is_in_attack_range(&self) -> bool {
        if !self.is_target_valid() {
            return false;
        }
        let (Some(target), Some(distance)) = (self.target, self.target_distance()) else {
            return false;
        };
        if distance > self.attack_range() {
            return false;
        }
        match self.strategy.get() {
            Some(strategy) => {
                let to_target = planar(target.position - self.body.position());
                strategy.can_engage(self.body.transform.planar_forward(), to_target)
            }
            None => true,
        }
    }

    /// Range of the bound strategy, or the body's fallback
    pub fn attack_range(&self) -> f32 {
        self.strategy
            .get()
            .map_or(self.body.fallback_attack_range, |s| s.attack_range())
    }

    /// Cooldown of the bound strategy, or the body's fallback
    pub fn cooldown_time(&self) -> f32 {
        self.strategy
            .get()
            .map_or(self.body.fallback_cooldown, |s| s.cooldown_time())
    }

    pub fn has_strategy(&self) -> bool {
        self.strategy.is_bound()
    }

    pub fn is_attacking(&self) -> bool {
        self.strategy.get().is_some_and(|s| s.is_attacking())
    }

    /// Set the speed modifier and push the resulting speed to the mover
    pub fn set_movement_modifier(&mut self, modifier: f32) {
        self.body.movement_speed_modifier = modifier.max(0.0);
        let speed = self.body.effective_speed();
        self.mover.set_speed(speed);
    }

    /// Damped turn towards the target, if one is sensed
    pub fn turn_towards_target(&mut self) {
        if let Some(target) = self.target {
            let rate = self.body.rotation_speed;
            self.body
                .transform
                .rotate_towards(target.position, rate, self.dt);
        }
    }
}
