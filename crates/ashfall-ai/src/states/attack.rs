use ashfall_core::Timer;
use tracing::{debug, warn};

use super::{BehaviorState, ATTACK_SIGNAL};
use crate::context::AgentContext;
use crate::error::AiError;
use crate::strategy::{AttackContext, AttackStrategy};

/// An agent's bound strategy as the behavior states see it. Every state may
/// query it; only the Attack state can start, stop or tick it.
pub struct BoundStrategy<'a> {
    strategy: Option<&'a mut dyn AttackStrategy>,
}

impl<'a> BoundStrategy<'a> {
    pub fn new(strategy: Option<&'a mut dyn AttackStrategy>) -> Self {
        Self { strategy }
    }

    pub fn get(&self) -> Option<&dyn AttackStrategy> {
        self.strategy.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.strategy.is_some()
    }
}

/// Run `f` against the bound strategy with an attack view of `ctx`.
/// Returns `None` when no strategy is bound.
fn drive<R>(
    ctx: &mut AgentContext<'_>,
    f: impl FnOnce(&mut dyn AttackStrategy, &mut AttackContext<'_>) -> R,
) -> Option<R> {
    let strategy = ctx.strategy.strategy.as_deref_mut()?;
    let mut attack = AttackContext {
        agent: ctx.agent,
        body: &mut *ctx.body,
        target: ctx.target,
        posture: &mut *ctx.posture,
        hit_zone: &mut *ctx.hit_zone,
        damage: &mut *ctx.damage,
        obstacles: ctx.obstacles,
        projectiles: &mut *ctx.projectiles,
        requests: &mut *ctx.requests,
        dt: ctx.dt,
    };
    Some(f(strategy, &mut attack))
}

/// Running the bound strategy, then holding its cooldown before deciding
/// what to do next.
#[derive(Debug, Clone)]
pub struct AttackState {
    /// The current activation has finished and the cooldown is running
    completed: bool,
    cooldown: Timer,
    /// Seconds since this state was entered
    elapsed: f32,
    activations: u32,
}

impl AttackState {
    pub fn new() -> Self {
        Self {
            completed: false,
            cooldown: Timer::new(0.0),
            elapsed: 0.0,
            activations: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Strategy activations started during this state, back-to-back ones included
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Start the bound strategy, or fall straight through to the cooldown
    fn begin_activation(&mut self, ctx: &mut AgentContext<'_>) {
        if drive(ctx, |strategy, attack| strategy.start_attack(attack)).is_some() {
            self.completed = false;
            self.activations += 1;
        } else {
            self.complete(ctx);
        }
    }

    fn complete(&mut self, ctx: &mut AgentContext<'_>) {
        self.completed = true;
        self.cooldown.start(ctx.cooldown_time());
    }

    fn decide(&mut self, ctx: &mut AgentContext<'_>) -> Option<BehaviorState> {
        if !ctx.is_target_valid() {
            return Some(BehaviorState::idle());
        }
        if ctx.is_in_attack_range() {
            debug!(agent = %ctx.agent, "attacking again");
            self.begin_activation(ctx);
            return None;
        }
        if ctx.is_in_detection_range() {
            return Some(BehaviorState::chasing(ctx.body.repath_interval));
        }
        Some(BehaviorState::idle())
    }

    pub(super) fn enter(&mut self, ctx: &mut AgentContext<'_>) {
        ctx.set_movement_modifier(0.0);
        ctx.mover.stop();
        ctx.posture.start_signal(ATTACK_SIGNAL);
        self.elapsed = 0.0;

        if !ctx.has_strategy() {
            let error = AiError::MissingCollaborator { agent: ctx.agent };
            warn!("{error}");
        }
        self.begin_activation(ctx);
    }

    pub(super) fn exit(&mut self, ctx: &mut AgentContext<'_>) {
        ctx.posture.stop_signal(ATTACK_SIGNAL);
        if ctx.is_attacking() {
            drive(ctx, |strategy, attack| strategy.stop_attack(attack));
        }
    }

    pub(super) fn update(&mut self, ctx: &mut AgentContext<'_>) -> Option<BehaviorState> {
        self.elapsed += ctx.dt.max(0.0);
        ctx.turn_towards_target();

        if !self.completed {
            if ctx.is_attacking() {
                return None;
            }
            self.complete(ctx);
        } else {
            self.cooldown.tick(ctx.dt);
        }

        if !self.cooldown.finished() {
            return None;
        }
        self.decide(ctx)
    }

    /// Advance the strategy's own sequence
    pub(super) fn physics_update(&mut self, ctx: &mut AgentContext<'_>) -> Option<BehaviorState> {
        drive(ctx, |strategy, attack| strategy.tick(attack));
        None
    }
}

impl Default for AttackState {
    fn default() -> Self {
        Self::new()
    }
}
