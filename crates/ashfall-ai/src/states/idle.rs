use ashfall_core::Timer;
use tracing::debug;

use super::{BehaviorState, IDLE_SIGNAL};
use crate::context::AgentContext;

/// Standing still. Also the fallback for every invalid-target case and the
/// state an interrupt forces the agent into.
#[derive(Debug, Clone)]
pub struct IdleState {
    /// While running, detection is ignored
    hold: Option<Timer>,
}

impl IdleState {
    pub fn new() -> Self {
        Self { hold: None }
    }

    pub fn held(duration: f32) -> Self {
        Self {
            hold: Some(Timer::new(duration)),
        }
    }

    pub fn is_holding(&self) -> bool {
        self.hold.is_some_and(|timer| !timer.finished())
    }

    /// Seconds of forced idle left
    pub fn hold_remaining(&self) -> f32 {
        self.hold.map_or(0.0, |timer| timer.remaining())
    }

    pub(super) fn enter(&mut self, ctx: &mut AgentContext<'_>) {
        ctx.set_movement_modifier(0.0);
        ctx.mover.stop();
        ctx.posture.start_signal(IDLE_SIGNAL);
    }

    pub(super) fn exit(&mut self, ctx: &mut AgentContext<'_>) {
        ctx.posture.stop_signal(IDLE_SIGNAL);
    }

    pub(super) fn update(&mut self, ctx: &mut AgentContext<'_>) -> Option<BehaviorState> {
        if let Some(timer) = self.hold.as_mut() {
            if !timer.finished() {
                timer.tick(ctx.dt);
            }
            if !timer.finished() {
                ctx.turn_towards_target();
                return None;
            }
            self.hold = None;
            debug!(agent = %ctx.agent, "forced idle released");
        }

        if ctx.is_in_detection_range() {
            return Some(BehaviorState::chasing(ctx.body.repath_interval));
        }
        ctx.turn_towards_target();
        None
    }
}

impl Default for IdleState {
    fn default() -> Self {
        Self::new()
    }
}
