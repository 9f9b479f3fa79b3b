//! Melee strike: short windup, a timed hit window, and one forward step

use ashfall_core::planar_distance;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    require_non_negative, require_ordered, require_positive, AttackContext, AttackPhase, AttackStrategy,
    PhaseClock,
};
use crate::error::StrategyConfigError;

/// Posture trigger fired when a strike starts
pub const MELEE_TRIGGER: &str = "MeleeStrike";

/// Tuning for [`MeleeStrike`]. Times are seconds from the start of the strike.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeConfig {
    pub attack_range: f32,
    pub cooldown: f32,
    pub damage: f32,
    /// Whole action length; the strike stops reporting attacking after this
    pub action_duration: f32,
    pub hit_window_start: f32,
    pub hit_window_end: f32,
    /// Lunge distance applied when the hit window opens
    pub step_distance: f32,
}

impl Default for MeleeConfig {
    fn default() -> Self {
        Self {
            attack_range: 2.0,
            cooldown: 1.0,
            damage: 10.0,
            action_duration: 1.5,
            hit_window_start: 0.5,
            hit_window_end: 0.9,
            step_distance: 0.5,
        }
    }
}

impl MeleeConfig {
    pub fn validate(&self) -> Result<(), StrategyConfigError> {
        require_positive("melee", "attack_range", self.attack_range)?;
        require_non_negative("melee", "cooldown", self.cooldown)?;
        require_non_negative("melee", "damage", self.damage)?;
        require_non_negative("melee", "step_distance", self.step_distance)?;
        require_non_negative("melee", "hit_window_start", self.hit_window_start)?;
        require_ordered(
            "melee",
            ("hit_window_start", self.hit_window_start),
            ("hit_window_end", self.hit_window_end),
        )?;
        require_ordered(
            "melee",
            ("hit_window_end", self.hit_window_end),
            ("action_duration", self.action_duration),
        )
    }
}

/// Stay this far off a wall when stepping forward
const STEP_CLEARANCE: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct MeleeStrike {
    config: MeleeConfig,
    clock: PhaseClock,
    has_hit: bool,
    window_open: bool,
}

impl MeleeStrike {
    pub fn new(config: MeleeConfig) -> Self {
        Self {
            config,
            clock: PhaseClock::new(),
            has_hit: false,
            window_open: false,
        }
    }

    pub fn config(&self) -> &MeleeConfig {
        &self.config
    }

    /// Whether this activation already landed its hit
    pub fn has_hit(&self) -> bool {
        self.has_hit
    }

    pub fn is_window_open(&self) -> bool {
        self.window_open
    }

    fn open_window(&mut self, ctx: &mut AttackContext<'_>) {
        self.window_open = true;
        ctx.hit_zone.enable();
    }

    fn close_window(&mut self, ctx: &mut AttackContext<'_>) {
        if self.window_open {
            self.window_open = false;
            ctx.hit_zone.disable();
        }
    }

    fn step_forward(&self, ctx: &mut AttackContext<'_>) {
        let direction = ctx.body.transform.planar_forward();
        if direction == glam::Vec3::ZERO || self.config.step_distance <= 0.0 {
            return;
        }
        let origin = ctx.body.position();
        let distance = match ctx.obstacles.cast(origin, direction, self.config.step_distance) {
            Some(hit) => (hit - STEP_CLEARANCE).max(0.0),
            None => self.config.step_distance,
        };
        ctx.body.transform.translate(direction * distance);
    }

    fn try_hit(&mut self, ctx: &mut AttackContext<'_>) {
        if self.has_hit {
            return;
        }
        let Some(target) = ctx.live_target() else {
            return;
        };
        let origin = ctx.body.position();
        if planar_distance(origin, target.position) <= self.config.attack_range {
            ctx.damage.apply_damage(target.id, self.config.damage, origin);
            self.has_hit = true;
            debug!(agent = %ctx.agent, damage = self.config.damage, "melee strike landed");
        }
    }
}

impl AttackStrategy for MeleeStrike {
    fn name(&self) -> &'static str {
        "melee"
    }

    fn phase(&self) -> AttackPhase {
        self.clock.phase()
    }

    fn start_attack(&mut self, ctx: &mut AttackContext<'_>) {
        if self.clock.is_active() {
            return;
        }
        self.clock.begin();
        self.has_hit = false;
        self.window_open = false;
        ctx.face_target();
        ctx.posture.fire(MELEE_TRIGGER);
    }

    fn stop_attack(&mut self, ctx: &mut AttackContext<'_>) {
        if self.clock.cancel() {
            debug!(agent = %ctx.agent, "melee strike cancelled");
        }
        self.close_window(ctx);
        self.has_hit = false;
    }

    fn tick(&mut self, ctx: &mut AttackContext<'_>) {
        if !self.clock.is_active() {
            self.clock.advance(ctx.dt);
            return;
        }
        let elapsed = self.clock.advance(ctx.dt);

        if self.clock.phase() == AttackPhase::Windup && elapsed >= self.config.hit_window_start {
            self.clock.commit();
            self.open_window(ctx);
            self.step_forward(ctx);
        }

        if self.window_open {
            self.try_hit(ctx);
            if elapsed >= self.config.hit_window_end {
                self.close_window(ctx);
            }
        }

        if elapsed >= self.config.action_duration {
            self.close_window(ctx);
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
