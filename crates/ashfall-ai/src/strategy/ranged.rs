//! Ranged projectile: a stationary windup that can be cancelled, then one shot

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    require_non_negative, require_positive, AttackContext, AttackPhase, AttackStrategy, PhaseClock,
};
use crate::error::StrategyConfigError;
use crate::projectile::ProjectileSpec;

/// Posture trigger fired when the windup starts
pub const RANGED_TRIGGER: &str = "RangedWindup";
/// Posture trigger fired when the projectile leaves
pub const RANGED_RELEASE_TRIGGER: &str = "RangedRelease";

/// Tuning for [`RangedProjectile`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedConfig {
    pub attack_range: f32,
    pub cooldown: f32,
    pub damage: f32,
    pub windup: f32,
    /// Whole action length, windup included
    pub total_duration: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_radius: f32,
    /// Launch height above the agent's feet
    pub muzzle_height: f32,
}

impl Default for RangedConfig {
    fn default() -> Self {
        Self {
            attack_range: 12.0,
            cooldown: 1.5,
            damage: 8.0,
            windup: 1.2,
            total_duration: 2.0,
            projectile_speed: 14.0,
            projectile_lifetime: 3.0,
            projectile_radius: 0.5,
            muzzle_height: 1.2,
        }
    }
}

impl RangedConfig {
    pub fn validate(&self) -> Result<(), StrategyConfigError> {
        require_positive("ranged", "attack_range", self.attack_range)?;
        require_positive("ranged", "projectile_speed", self.projectile_speed)?;
        for (field, value) in [
            ("cooldown", self.cooldown),
            ("damage", self.damage),
            ("windup", self.windup),
            ("projectile_lifetime", self.projectile_lifetime),
            ("projectile_radius", self.projectile_radius),
        ] {
            require_non_negative("ranged", field, value)?;
        }
        // The release has to land inside the action
        if self.windup >= self.total_duration {
            return Err(StrategyConfigError::OutOfOrder {
                strategy: "ranged",
                earlier: "windup",
                first: self.windup,
                later: "total_duration",
                second: self.total_duration,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RangedProjectile {
    config: RangedConfig,
    clock: PhaseClock,
    fired: bool,
}

impl RangedProjectile {
    pub fn new(config: RangedConfig) -> Self {
        Self {
            config,
            clock: PhaseClock::new(),
            fired: false,
        }
    }

    pub fn config(&self) -> &RangedConfig {
        &self.config
    }

    /// Whether this activation already released its projectile
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    fn release(&mut self, ctx: &mut AttackContext<'_>) {
        self.fired = true;
        let origin = ctx.body.position() + glam::Vec3::Y * self.config.muzzle_height;
        // Aim at the target if it is still around, else straight ahead
        let direction = match ctx.live_target() {
            Some(target) => {
                ctx.face_target();
                let aim = ashfall_core::planar_direction(ctx.body.position(), target.position);
                if aim == glam::Vec3::ZERO {
                    ctx.body.transform.planar_forward()
                } else {
                    aim
                }
            }
            None => ctx.body.transform.planar_forward(),
        };

        let id = ctx.projectiles.spawn(ProjectileSpec {
            owner: ctx.agent,
            target: ctx.target.map(|t| t.id),
            origin,
            direction,
            speed: self.config.projectile_speed,
            damage: self.config.damage,
            radius: self.config.projectile_radius,
            lifetime: self.config.projectile_lifetime,
        });
        ctx.posture.fire(RANGED_RELEASE_TRIGGER);
        debug!(agent = %ctx.agent, projectile = ?id, "ranged shot released");
    }
}

impl AttackStrategy for RangedProjectile {
    fn name(&self) -> &'static str {
        "ranged"
    }

    fn phase(&self) -> AttackPhase {
        self.clock.phase()
    }

    fn start_attack(&mut self, ctx: &mut AttackContext<'_>) {
        if self.clock.is_active() {
            return;
        }
        self.clock.begin();
        self.fired = false;
        ctx.face_target();
        ctx.posture.fire(RANGED_TRIGGER);
    }

    fn stop_attack(&mut self, ctx: &mut AttackContext<'_>) {
        if self.clock.cancel() {
            debug!(agent = %ctx.agent, fired = self.fired, "ranged attack cancelled");
        }
        self.fired = false;
    }

    fn tick(&mut self, ctx: &mut AttackContext<'_>) {
        if !self.clock.is_active() {
            self.clock.advance(ctx.dt);
            return;
        }
        let elapsed = self.clock.advance(ctx.dt);

        if self.clock.phase() == AttackPhase::Windup && elapsed >= self.config.windup {
            self.clock.commit();
            if !self.fired {
                self.release(ctx);
            }
        }

        if elapsed >= self.config.total_duration {
            self.clock.finish();
        }
    }

    fn attack_range(&self) -> f32 {
        self.config.attack_range
    }

    fn cooldown_time(&self) -> f32 {
        self.config.cooldown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{TargetId, TargetSnapshot};
    use crate::test_support::Fixture;
    use glam::Vec3;

    fn fixture() -> Fixture {
        let mut fixture = Fixture::new();
        fixture.dt = 0.125;
        fixture.target = Some(TargetSnapshot {
            id: TargetId(3),
            position: Vec3::new(0.0, 0.0, 10.0),
            alive: true,
        });
        fixture
    }

    fn config() -> RangedConfig {
        RangedConfig {
            windup: 1.25,
            total_duration: 2.0,
            ..Default::default()
        }
    }

    fn run(ranged: &mut RangedProjectile, fx: &mut Fixture, ticks: usize) {
        for _ in 0..ticks {
            ranged.tick(&mut fx.attack_context());
        }
    }

    #[test]
    fn test_cancel_during_windup_spawns_nothing() {
        let mut fx = fixture();
        let mut ranged = RangedProjectile::new(RangedConfig::default());
        ranged.start_attack(&mut fx.attack_context());

        // 0.5s into the 1.2s windup
        run(&mut ranged, &mut fx, 4);
        assert!(ranged.is_attacking());
        ranged.stop_attack(&mut fx.attack_context());
        assert!(!ranged.is_attacking());

        run(&mut ranged, &mut fx, 20);
        assert!(fx.projectiles.is_empty());
        assert_eq!(fx.projectiles.stats().spawned, 0);
        assert!(!ranged.is_attacking());
    }

    #[test]
    fn test_one_projectile_per_activation() {
        let mut fx = fixture();
        let mut ranged = RangedProjectile::new(config());
        ranged.start_attack(&mut fx.attack_context());

        run(&mut ranged, &mut fx, 9);
        assert_eq!(ranged.phase(), AttackPhase::Windup);
        assert!(fx.projectiles.is_empty());

        // 1.25: released
        run(&mut ranged, &mut fx, 1);
        assert_eq!(ranged.phase(), AttackPhase::Committed);
        assert_eq!(fx.projectiles.len(), 1);

        // Holds until 2.0 without firing again
        run(&mut ranged, &mut fx, 5);
        assert!(ranged.is_attacking());
        run(&mut ranged, &mut fx, 1);
        assert!(!ranged.is_attacking());
        assert_eq!(fx.projectiles.stats().spawned, 1);
    }

    #[test]
    fn test_projectile_aims_at_target_on_the_plane() {
        let mut fx = fixture();
        let mut ranged = RangedProjectile::new(config());
        ranged.start_attack(&mut fx.attack_context());
        run(&mut ranged, &mut fx, 10);

        let projectile = fx.projectiles.iter().next().unwrap();
        assert_eq!(projectile.velocity.y, 0.0);
        assert!((projectile.velocity.normalize() - Vec3::Z).length() < 1e-5);
        assert_eq!(projectile.target, Some(TargetId(3)));
        assert!((projectile.position.y - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_stop_after_release_leaves_projectile_flying() {
        let mut fx = fixture();
        let mut ranged = RangedProjectile::new(config());
        ranged.start_attack(&mut fx.attack_context());
        run(&mut ranged, &mut fx, 11);

        ranged.stop_attack(&mut fx.attack_context());
        ranged.stop_attack(&mut fx.attack_context());
        assert!(!ranged.is_attacking());
        assert_eq!(fx.projectiles.len(), 1);
    }

    #[test]
    fn test_back_to_back_activations_fire_again() {
        let mut fx = fixture();
        let mut ranged = RangedProjectile::new(config());
        for _ in 0..2 {
            ranged.start_attack(&mut fx.attack_context());
            run(&mut ranged, &mut fx, 16);
            assert!(!ranged.is_attacking());
        }
        assert_eq!(fx.projectiles.stats().spawned, 2);
    }

    #[test]
    fn test_config_validation() {
        assert!(RangedConfig::default().validate().is_ok());
        let bad = RangedConfig {
            windup: 3.0,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(StrategyConfigError::OutOfOrder { earlier: "windup", .. })
        ));
    }
}
