use ashfall_core::Timer;

use super::{BehaviorState, LOCOMOTION_SIGNAL};
use crate::context::AgentContext;

/// Closing in on the target
#[derive(Debug, Clone)]
pub struct ChasingState {
    /// Throttles move orders; starts finished so the first update issues one
    repath: Timer,
}

impl ChasingState {
    pub fn new(repath_interval: f32) -> Self {
        Self {
            repath: Timer::finished_with(repath_interval),
        }
    }

    pub(super) fn enter(&mut self, ctx: &mut AgentContext<'_>) {
        let fraction = ctx.body.chase_speed_fraction;
        ctx.set_movement_modifier(fraction);
        ctx.posture.start_signal(LOCOMOTION_SIGNAL);
    }

    pub(super) fn exit(&mut self, ctx: &mut AgentContext<'_>) {
        ctx.mover.stop();
        ctx.posture.stop_signal(LOCOMOTION_SIGNAL);
    }

    pub(super) fn update(&mut self, ctx: &mut AgentContext<'_>) -> Option<BehaviorState> {
        if !ctx.is_target_valid() {
            return Some(BehaviorState::idle());
        }
        if ctx.is_in_attack_range() {
            return Some(BehaviorState::attack());
        }
        if !ctx.is_in_detection_range() {
            return Some(BehaviorState::idle());
        }

        self.repath.tick(ctx.dt);
        if self.repath.finished() {
            if let Some(target) = ctx.target {
                ctx.mover.move_to(target.position);
            }
            self.repath.start(ctx.body.repath_interval);
        }
        ctx.turn_towards_target();
        None
    }
}
