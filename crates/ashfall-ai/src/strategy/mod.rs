//! Attack strategies
//!
//! Every strategy runs the same small sequence,
//! `Ready -> Windup -> (Committed | Cancelled) -> Ready`, driven by an
//! elapsed-time counter the owning Attack state advances once per tick.
//! Nothing here blocks or spawns tasks; cancelling is a field reset.

pub mod charge;
pub mod melee;
pub mod ranged;

pub use charge::{ChargeConfig, ChargeDash};
pub use melee::{MeleeConfig, MeleeStrike};
pub use ranged::{RangedConfig, RangedProjectile};

use ashfall_core::{planar_distance, ObstacleQuery};
use glam::Vec3;
use serde::Serialize;

use crate::agent::AgentId;
use crate::collab::{DamageSink, HitZone, PostureDriver, TargetSnapshot};
use crate::context::{AgentBody, AgentRequests};
use crate::error::StrategyConfigError;
use crate::projectile::ProjectilePool;

/// Where a strategy is in its sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttackPhase {
    Ready,
    /// Started, effect not yet delivered
    Windup,
    /// Effect under way (hit window open, dash in flight, projectile away)
    Committed,
    /// Stopped before finishing; behaves as `Ready`
    Cancelled,
}

impl AttackPhase {
    pub fn is_active(self) -> bool {
        matches!(self, AttackPhase::Windup | AttackPhase::Committed)
    }
}

/// What a strategy may touch while it runs
pub struct AttackContext<'a> {
    pub agent: AgentId,
    pub body: &'a mut AgentBody,
    pub target: Option<TargetSnapshot>,
    pub posture: &'a mut dyn PostureDriver,
    pub hit_zone: &'a mut dyn HitZone,
    pub damage: &'a mut dyn DamageSink,
    pub obstacles: &'a dyn ObstacleQuery,
    pub projectiles: &'a mut ProjectilePool,
    pub requests: &'a mut AgentRequests,
    pub dt: f32,
}

impl<'a> AttackContext<'a> {
    /// The target, only if it is alive
    pub fn live_target(&self) -> Option<TargetSnapshot> {
        self.target.filter(|t| t.alive)
    }

    /// Snap to face the target
    pub fn face_target(&mut self) {
        if let Some(target) = self.target {
            self.body.transform.face_towards(target.position);
        }
    }

    pub fn distance_to_target(&self) -> Option<f32> {
        self.target
            .map(|t| planar_distance(self.body.position(), t.position))
    }
}

/// The contract every attack behavior satisfies.
///
/// Only the owning agent's Attack state calls `start_attack`/`stop_attack`/`tick`.
/// All methods are total: redundant starts and stops are no-ops.
pub trait AttackStrategy {
    fn name(&self) -> &'static str;

    fn phase(&self) -> AttackPhase;

    fn is_attacking(&self) -> bool {
        self.phase().is_active()
    }

    /// Begin the sequence. No-op while already attacking.
    fn start_attack(&mut self, ctx: &mut AttackContext<'_>);

    /// Abort any in-flight sequence and clear hit tracking. Idempotent.
    fn stop_attack(&mut self, ctx: &mut AttackContext<'_>);

    /// Advance the sequence by `ctx.dt`
    fn tick(&mut self, ctx: &mut AttackContext<'_>);

    fn attack_range(&self) -> f32;

    fn cooldown_time(&self) -> f32;

    /// Extra gate on top of range. `facing` and `to_target` are planar.
    fn can_engage(&self, _facing: Vec3, _to_target: Vec3) -> bool {
        true
    }
}

pub(crate) fn require_positive(
    strategy: &'static str,
    field: &'static str,
    value: f32,
) -> Result<(), StrategyConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(StrategyConfigError::NotPositive { strategy, field, value })
    }
}

pub(crate) fn require_non_negative(
    strategy: &'static str,
    field: &'static str,
    value: f32,
) -> Result<(), StrategyConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(StrategyConfigError::Negative { strategy, field, value })
    }
}

/// `first <= second`
pub(crate) fn require_ordered(
    strategy: &'static str,
    (earlier, first): (&'static str, f32),
    (later, second): (&'static str, f32),
) -> Result<(), StrategyConfigError> {
    if first <= second {
        Ok(())
    } else {
        Err(StrategyConfigError::OutOfOrder {
            strategy,
            earlier,
            first,
            later,
            second,
        })
    }
}

/// Phase plus elapsed seconds since the sequence began
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PhaseClock {
    phase: AttackPhase,
    elapsed: f32,
}

impl PhaseClock {
    pub(crate) fn new() -> Self {
        Self {
            phase: AttackPhase::Ready,
            elapsed: 0.0,
        }
    }

    pub(crate) fn phase(&self) -> AttackPhase {
        self.phase
    }

    pub(crate) fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub(crate) fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub(crate) fn begin(&mut self) {
        self.phase = AttackPhase::Windup;
        self.elapsed = 0.0;
    }

    pub(crate) fn commit(&mut self) {
        self.phase = AttackPhase::Committed;
    }

    pub(crate) fn finish(&mut self) {
        self.phase = AttackPhase::Ready;
    }

    /// Returns true if a running sequence was cancelled
    pub(crate) fn cancel(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        self.phase = AttackPhase::Cancelled;
        true
    }

    /// Advance a running sequence; settles `Cancelled` back to `Ready`
    pub(crate) fn advance(&mut self, dt: f32) -> f32 {
        match self.phase {
            AttackPhase::Windup | AttackPhase::Committed => self.elapsed += dt.max(0.0),
            AttackPhase::Cancelled => self.phase = AttackPhase::Ready,
            AttackPhase::Ready => {}
        }
        self.elapsed
    }
}
