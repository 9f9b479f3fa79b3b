//! Charge dash: telegraph, then a straight capped dash at where the target is now

use ashfall_core::{angle_between_planar, planar_direction, planar_distance};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    require_non_negative, require_positive, AttackContext, AttackPhase, AttackStrategy, PhaseClock,
};
use crate::error::StrategyConfigError;

/// Posture trigger fired when the telegraph starts
pub const CHARGE_TELEGRAPH_TRIGGER: &str = "ChargeTelegraph";
/// Posture trigger fired when the dash launches
pub const CHARGE_DASH_TRIGGER: &str = "ChargeDash";

/// Tuning for [`ChargeDash`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeConfig {
    pub attack_range: f32,
    pub cooldown: f32,
    pub damage: f32,
    /// Largest allowed angle between facing and the target, in degrees
    pub facing_cone_degrees: f32,
    pub telegraph: f32,
    /// Time the dash takes regardless of its length
    pub dash_duration: f32,
    pub max_charge_distance: f32,
    /// The target is hit if it is this close to the dash endpoint on arrival
    pub arrival_radius: f32,
    /// Forced idle applied to the whole agent after arrival
    pub post_delay: f32,
    /// Stop this far short of an obstacle in the dash path
    pub obstacle_padding: f32,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            attack_range: 8.0,
            cooldown: 0.5,
            damage: 20.0,
            facing_cone_degrees: 60.0,
            telegraph: 0.3,
            dash_duration: 0.35,
            max_charge_distance: 6.0,
            arrival_radius: 1.5,
            post_delay: 1.2,
            obstacle_padding: 0.5,
        }
    }
}

impl ChargeConfig {
    pub fn validate(&self) -> Result<(), StrategyConfigError> {
        require_positive("charge", "attack_range", self.attack_range)?;
        require_positive("charge", "max_charge_distance", self.max_charge_distance)?;
        require_positive("charge", "dash_duration", self.dash_duration)?;
        for (field, value) in [
            ("cooldown", self.cooldown),
            ("damage", self.damage),
            ("telegraph", self.telegraph),
            ("arrival_radius", self.arrival_radius),
            ("post_delay", self.post_delay),
            ("obstacle_padding", self.obstacle_padding),
        ] {
            require_non_negative("charge", field, value)?;
        }
        if !(0.0..=180.0).contains(&self.facing_cone_degrees) {
            return Err(StrategyConfigError::OutOfRange {
                strategy: "charge",
                field: "facing_cone_degrees",
                value: self.facing_cone_degrees,
                min: 0.0,
                max: 180.0,
            });
        }
        Ok(())
    }
}

/// The committed path, fixed when the telegraph ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashPath {
    pub start: Vec3,
    pub end: Vec3,
}

impl DashPath {
    pub fn length(&self) -> f32 {
        planar_distance(self.start, self.end)
    }

    /// Point along the path with height held at the start height
    fn sample(&self, t: f32) -> Vec3 {
        let mut point = self.start.lerp(self.end, t.clamp(0.0, 1.0));
        point.y = self.start.y;
        point
    }
}

#[derive(Debug, Clone)]
pub struct ChargeDash {
    config: ChargeConfig,
    clock: PhaseClock,
    path: Option<DashPath>,
    has_hit: bool,
}

impl ChargeDash {
    pub fn new(config: ChargeConfig) -> Self {
        Self {
            config,
            clock: PhaseClock::new(),
            path: None,
            has_hit: false,
        }
    }

    pub fn config(&self) -> &ChargeConfig {
        &self.config
    }

    /// The dash in flight, if any
    pub fn path(&self) -> Option<DashPath> {
        self.path
    }

    /// Fix the path towards the target's position right now
    fn commit_dash(&mut self, ctx: &mut AttackContext<'_>) -> bool {
        let Some(target) = ctx.live_target() else {
            return false;
        };
        let start = ctx.body.position();
        let direction = planar_direction(start, target.position);
        if direction == Vec3::ZERO {
            return false;
        }

        let mut distance = planar_distance(start, target.position).min(self.config.max_charge_distance);
        if let Some(hit) = ctx.obstacles.cast(start, direction, distance) {
            distance = (hit - self.config.obstacle_padding).max(0.0);
        }

        let mut end = start + direction * distance;
        end.y = start.y;
        self.path = Some(DashPath { start, end });

        ctx.body.transform.face_towards(target.position);
        ctx.hit_zone.enable();
        ctx.posture.fire(CHARGE_DASH_TRIGGER);
        debug!(agent = %ctx.agent, distance, "charge committed");
        true
    }

    fn arrive(&mut self, ctx: &mut AttackContext<'_>, path: DashPath) {
        ctx.body.transform.position = path.end;
        if let Some(target) = ctx.live_target() {
            if !self.has_hit && planar_distance(path.end, target.position) <= self.config.arrival_radius {
                ctx.damage.apply_damage(target.id, self.config.damage, path.end);
                self.has_hit = true;
            }
        }
        ctx.hit_zone.disable();
        self.path = None;
        self.clock.finish();
        ctx.requests.request_force_idle(self.config.post_delay);
        debug!(agent = %ctx.agent, hit = self.has_hit, "charge arrived");
    }
}

impl AttackStrategy for ChargeDash {
    fn name(&self) -> &'static str {
        "charge"
    }

    fn phase(&self) -> AttackPhase {
        self.clock.phase()
    }

    fn start_attack(&mut self, ctx: &mut AttackContext<'_>) {
        if self.clock.is_active() {
            return;
        }
        self.clock.begin();
        self.path = None;
        self.has_hit = false;
        ctx.face_target();
        ctx.posture.fire(CHARGE_TELEGRAPH_TRIGGER);
    }

    fn stop_attack(&mut self, ctx: &mut AttackContext<'_>) {
        if self.clock.cancel() {
            debug!(agent = %ctx.agent, "charge cancelled");
        }
        if self.path.take().is_some() || ctx.hit_zone.is_enabled() {
            ctx.hit_zone.disable();
        }
        self.has_hit = false;
    }

    fn tick(&mut self, ctx: &mut AttackContext<'_>) {
        if !self.clock.is_active() {
            self.clock.advance(ctx.dt);
            return;
        }
        let elapsed = self.clock.advance(ctx.dt);

        if self.clock.phase() == AttackPhase::Windup {
            if elapsed < self.config.telegraph {
                return;
            }
            if !self.commit_dash(ctx) {
                // Nothing left to charge at
                self.clock.finish();
                return;
            }
            self.clock.commit();
        }

        let Some(path) = self.path else {
            self.clock.finish();
            return;
        };
        let t = (elapsed - self.config.telegraph) / self.config.dash_duration;
        if t >= 1.0 {
            self.arrive(ctx, path);
        } else {
            ctx.body.transform.position = path.sample(t);
        }
    }

    fn attack_range(&self) -> f32 {
        self.config.attack_range
    }

    fn cooldown_time(&self) -> f32 {
        self.config.cooldown
    }

    fn can_engage(&self, facing: Vec3, to_target: Vec3) -> bool {
        angle_between_planar(facing, to_target) <= self.config.facing_cone_degrees.to_radians()
    }
}
