//! One AI-controlled enemy: body, bound strategy, collaborators, and its
//! behavior state machine.

use std::fmt;

use ashfall_core::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collab::{FlagHitZone, HitZone, NavigationMover, NullPosture, PostureDriver, TargetId};
use crate::context::{AgentBody, AgentContext, AgentRequests};
use crate::fsm::StateMachine;
use crate::mover::StraightLineMover;
use crate::scheduler::{Frame, Tickable};
use crate::states::{BehaviorKind, BehaviorState, BoundStrategy};
use crate::strategy::AttackStrategy;

/// Stable handle to an agent in an [`crate::AgentRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// The per-agent collaborators the host supplies
pub struct AgentRig {
    pub mover: Box<dyn NavigationMover>,
    pub posture: Box<dyn PostureDriver>,
    pub hit_zone: Box<dyn HitZone>,
}

impl AgentRig {
    /// Straight-line movement, no animation, a plain flag for the hit zone
    pub fn headless() -> Self {
        Self {
            mover: Box::new(StraightLineMover::new()),
            posture: Box::new(NullPosture),
            hit_zone: Box::new(FlagHitZone::default()),
        }
    }
}

impl Default for AgentRig {
    fn default() -> Self {
        Self::headless()
    }
}

#[derive(Clone, Copy)]
enum Phase {
    HandleInput,
    Update,
    PhysicsUpdate,
}

pub struct Agent {
    id: AgentId,
    archetype: String,
    body: AgentBody,
    target: Option<TargetId>,
    /// Bound once at construction; never swapped
    strategy: Option<Box<dyn AttackStrategy>>,
    rig: AgentRig,
    machine: StateMachine<BehaviorState>,
    requests: AgentRequests,
    interrupts: u32,
}

impl Agent {
    pub fn new(
        id: AgentId,
        archetype: impl Into<String>,
        body: AgentBody,
        strategy: Option<Box<dyn AttackStrategy>>,
        rig: AgentRig,
    ) -> Self {
        let agent = Self {
            id,
            archetype: archetype.into(),
            body,
            target: None,
            strategy,
            rig,
            machine: StateMachine::new(),
            requests: AgentRequests::default(),
            interrupts: 0,
        };
        info!(
            agent = %agent.id,
            archetype = %agent.archetype,
            strategy = agent.strategy.as_deref().map_or("none", |s| s.name()),
            "agent spawned"
        );
        agent
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn archetype(&self) -> &str {
        &self.archetype
    }

    pub fn body(&self) -> &AgentBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut AgentBody {
        &mut self.body
    }

    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    /// Point the agent at a target handle. The agent never owns the target.
    pub fn set_target(&mut self, target: Option<TargetId>) {
        self.target = target;
    }

    pub fn strategy(&self) -> Option<&dyn AttackStrategy> {
        self.strategy.as_deref()
    }

    pub fn is_attacking(&self) -> bool {
        self.strategy.as_deref().is_some_and(|s| s.is_attacking())
    }

    pub fn state(&self) -> Option<&BehaviorState> {
        self.machine.current()
    }

    /// `None` until the agent's first tick
    pub fn state_kind(&self) -> Option<BehaviorKind> {
        self.machine.current().map(BehaviorState::kind)
    }

    /// In a forced idle that has not yet run out
    pub fn is_held(&self) -> bool {
        self.machine.current().is_some_and(BehaviorState::is_held)
    }

    pub fn transitions(&self) -> u64 {
        self.machine.transitions()
    }

    pub fn interrupts(&self) -> u32 {
        self.interrupts
    }

    /// Interrupt handler: abort any attack, cancel movement, and hold Idle
    /// for `duration` seconds before detection resumes.
    pub fn force_idle(&mut self, duration: f32, frame: &mut Frame<'_>) {
        self.interrupts += 1;
        debug!(agent = %self.id, duration, "forced idle");
        self.run(frame, |machine, ctx| {
            machine.change_state(BehaviorState::held_idle(duration), ctx);
        });
    }

    fn run_phase(&mut self, phase: Phase, frame: &mut Frame<'_>) {
        self.run(frame, |machine, ctx| match phase {
            Phase::HandleInput => machine.handle_input(ctx),
            Phase::Update => machine.update(ctx),
            Phase::PhysicsUpdate => {
                machine.physics_update(ctx);
                let next = ctx.mover.advance(ctx.body.position(), ctx.dt);
                ctx.body.transform.position = next;
            }
        });
    }

    /// Build this agent's context for one call into its state machine, then
    /// apply whatever the call asked of the whole agent.
    fn run(
        &mut self,
        frame: &mut Frame<'_>,
        f: impl FnOnce(&mut StateMachine<BehaviorState>, &mut AgentContext<'_>),
    ) {
        let Agent {
            id,
            body,
            target,
            strategy,
            rig,
            machine,
            requests,
            ..
        } = self;

        let mut ctx = AgentContext {
            agent: *id,
            body,
            target: target.and_then(|handle| frame.targets.snapshot(handle)),
            strategy: BoundStrategy::new(match strategy {
                Some(strategy) => Some(strategy.as_mut()),
                None => None,
            }),
            mover: rig.mover.as_mut(),
            posture: rig.posture.as_mut(),
            hit_zone: rig.hit_zone.as_mut(),
            damage: &mut *frame.damage,
            obstacles: frame.obstacles,
            projectiles: &mut *frame.projectiles,
            requests,
            dt: frame.dt,
        };

        if machine.current().is_none() {
            machine.change_state(BehaviorState::idle(), &mut ctx);
        }
        f(machine, &mut ctx);

        if let Some(duration) = ctx.requests.take_force_idle() {
            debug!(agent = %ctx.agent, duration, "agent idle requested");
            machine.change_state(BehaviorState::held_idle(duration), &mut ctx);
        }
    }
}

impl Tickable for Agent {
    fn handle_input(&mut self, frame: &mut Frame<'_>) {
        self.run_phase(Phase::HandleInput, frame);
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        self.run_phase(Phase::Update, frame);
    }

    fn physics_update(&mut self, frame: &mut Frame<'_>) {
        self.run_phase(Phase::PhysicsUpdate, frame);
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("archetype", &self.archetype)
            .field("position", &self.body.position())
            .field("target", &self.target)
            .field("state", &self.state_kind())
            .field("strategy", &self.strategy.as_deref().map(|s| s.name()))
            .finish()
    }
}
