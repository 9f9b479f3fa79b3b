//! Behavior states: Idle, Chasing, Attack
//!
//! Each state reads the agent context's range predicates to decide its
//! transitions and leaves combat execution to the bound attack strategy.

mod attack;
mod chasing;
mod idle;

pub use attack::{AttackState, BoundStrategy};
pub use chasing::ChasingState;
pub use idle::IdleState;

use std::fmt;

use serde::Serialize;

use crate::context::AgentContext;
use crate::fsm::State;

/// Posture signal held on while idle
pub const IDLE_SIGNAL: &str = "Idle";
/// Posture signal held on while chasing
pub const LOCOMOTION_SIGNAL: &str = "Locomotion";
/// Posture signal held on while in the attack state
pub const ATTACK_SIGNAL: &str = "Attacking";

/// Which behavior an agent is in, without its per-activation data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BehaviorKind {
    Idle,
    Chasing,
    Attack,
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BehaviorKind::Idle => "idle",
            BehaviorKind::Chasing => "chasing",
            BehaviorKind::Attack => "attack",
        };
        f.write_str(name)
    }
}

/// The behavior state machine's state type
#[derive(Debug, Clone)]
pub enum BehaviorState {
    Idle(IdleState),
    Chasing(ChasingState),
    Attack(AttackState),
}

impl BehaviorState {
    pub fn idle() -> Self {
        BehaviorState::Idle(IdleState::new())
    }

    /// Idle that ignores detection for `duration` seconds
    pub fn held_idle(duration: f32) -> Self {
        BehaviorState::Idle(IdleState::held(duration))
    }

    pub fn chasing(repath_interval: f32) -> Self {
        BehaviorState::Chasing(ChasingState::new(repath_interval))
    }

    pub fn attack() -> Self {
        BehaviorState::Attack(AttackState::new())
    }

    pub fn kind(&self) -> BehaviorKind {
        match self {
            BehaviorState::Idle(_) => BehaviorKind::Idle,
            BehaviorState::Chasing(_) => BehaviorKind::Chasing,
            BehaviorState::Attack(_) => BehaviorKind::Attack,
        }
    }

    /// True while a forced idle is still holding
    pub fn is_held(&self) -> bool {
        matches!(self, BehaviorState::Idle(idle) if idle.is_holding())
    }
}

impl<'a> State<AgentContext<'a>> for BehaviorState {
    fn name(&self) -> &'static str {
        match self {
            BehaviorState::Idle(_) => "Idle",
            BehaviorState::Chasing(_) => "Chasing",
            BehaviorState::Attack(_) => "Attack",
        }
    }

    fn enter(&mut self, ctx: &mut AgentContext<'a>) {
        tracing::debug!(agent = %ctx.agent, state = %self.kind(), "enter");
        match self {
            BehaviorState::Idle(state) => state.enter(ctx),
            BehaviorState::Chasing(state) => state.enter(ctx),
            BehaviorState::Attack(state) => state.enter(ctx),
        }
    }

    fn exit(&mut self, ctx: &mut AgentContext<'a>) {
        match self {
            BehaviorState::Idle(state) => state.exit(ctx),
            BehaviorState::Chasing(state) => state.exit(ctx),
            BehaviorState::Attack(state) => state.exit(ctx),
        }
    }

    fn update(&mut self, ctx: &mut AgentContext<'a>) -> Option<Self> {
        match self {
            BehaviorState::Idle(state) => state.update(ctx),
            BehaviorState::Chasing(state) => state.update(ctx),
            BehaviorState::Attack(state) => state.update(ctx),
        }
    }

    fn physics_update(&mut self, ctx: &mut AgentContext<'a>) -> Option<Self> {
        match self {
            BehaviorState::Attack(state) => state.physics_update(ctx),
            BehaviorState::Idle(_) | BehaviorState::Chasing(_) => None,
        }
    }
}
