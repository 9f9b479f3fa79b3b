//! Ashfall enemy behavior engine
//!
//! Each agent runs a small state machine (Idle, Chasing, Attack) over a
//! per-tick context, and delegates combat to the attack strategy bound to it
//! when it was spawned. Everything is single-threaded and tick-driven:
//! waits are elapsed-time counters, cancellation is a field reset.

pub mod agent;
pub mod archetype;
pub mod collab;
pub mod context;
pub mod error;
pub mod fsm;
pub mod mover;
pub mod projectile;
pub mod registry;
pub mod scheduler;
pub mod states;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_support;

pub use agent::{Agent, AgentId, AgentRig};
pub use archetype::{Archetype, ArchetypeCatalog, AttackProfile};
pub use collab::{
    DamageEvent, DamageLedger, DamageSink, FlagHitZone, HitZone, NavigationMover, NullPosture,
    PostureDriver, StaticTarget, Target, TargetId, TargetLookup, TargetRoster, TargetSnapshot,
};
pub use context::{AgentBody, AgentContext, AgentRequests};
pub use error::{AiError, StrategyConfigError};
pub use fsm::{State, StateMachine};
pub use mover::StraightLineMover;
pub use projectile::{Projectile, ProjectileFate, ProjectilePool, ProjectileSpec, ProjectileStats};
pub use registry::AgentRegistry;
pub use scheduler::{Encounter, Frame, Tickable};
pub use states::{BehaviorKind, BehaviorState, BoundStrategy};
pub use strategy::{
    AttackContext, AttackPhase, AttackStrategy, ChargeConfig, ChargeDash, MeleeConfig, MeleeStrike,
    RangedConfig, RangedProjectile,
};
