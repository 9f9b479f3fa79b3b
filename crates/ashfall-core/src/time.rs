//! Time system for Ashfall
//!
//! Handles the simulation clock (scaled, clamped delta time) and the
//! countdown timers that gameplay code advances once per tick.

use serde::{Deserialize, Serialize};

/// Errors in clock configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    #[error("Time scale must be non-negative, got {0}")]
    NegativeTimeScale(f32),

    #[error("Fixed timestep must be positive, got {0}")]
    InvalidTimestep(f32),

    #[error("Maximum delta time must be positive, got {0}")]
    InvalidMaxDelta(f32),
}

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Tick length used by headless runs (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 60.0,
            max_delta_time: 0.25,
        }
    }
}

impl TimeConfig {
    /// Check the configuration for values the clock cannot run with
    pub fn validate(&self) -> Result<(), TimeError> {
        if self.time_scale < 0.0 {
            return Err(TimeError::NegativeTimeScale(self.time_scale));
        }
        if self.fixed_timestep <= 0.0 {
            return Err(TimeError::InvalidTimestep(self.fixed_timestep));
        }
        if self.max_delta_time <= 0.0 {
            return Err(TimeError::InvalidMaxDelta(self.max_delta_time));
        }
        Ok(())
    }
}

/// Game time tracking
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since simulation start in seconds
    pub total_time: f64,
    /// Delta time for this tick (clamped and scaled)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Tick counter
    pub frame_count: u64,
    /// Whether the simulation is paused
    pub paused: bool,
}

impl Default for GameTime {
    fn default() -> Self {
        Self {
            config: TimeConfig::default(),
            total_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            frame_count: 0,
            paused: false,
        }
    }
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Advance the clock with the raw delta from the previous tick
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
    }

    /// Pause the simulation
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the simulation
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

/// A duration plus an elapsed counter, advanced once per tick.
///
/// A timer stops at `duration` and reports completion once. Elapsed time is
/// never negative and only goes back to zero via [`Timer::start`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    duration: f32,
    elapsed: f32,
}

impl Timer {
    /// Timer starting from zero
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// A timer that reports finished until it is started again
    pub fn finished_with(duration: f32) -> Self {
        let mut timer = Self::new(duration);
        timer.elapsed = timer.duration;
        timer
    }

    /// Restart with a new duration
    pub fn start(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
        self.elapsed = 0.0;
    }

    /// Advance by `dt`. Returns true on the tick the timer completes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.finished() {
            return false;
        }
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.finished()
    }

    /// Whether the timer has run its full duration
    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Time left before completion
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_time() {
        let mut time = GameTime::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.frame_count, 1);

        time.pause();
        time.update(0.016);
        assert_eq!(time.delta_time, 0.0);
    }

    #[test]
    fn test_resume_and_time_scale() {
        let mut time = GameTime::default();
        time.pause();
        time.update(0.125);
        assert_eq!(time.delta_time, 0.0);

        time.resume();
        time.set_time_scale(2.0);
        time.update(0.0625);
        assert_eq!(time.delta_time, 0.125);

        time.set_time_scale(-1.0);
        time.update(0.0625);
        assert_eq!(time.delta_time, 0.0);
    }

    #[test]
    fn test_game_time_clamps_spikes() {
        let mut time = GameTime::default();
        time.update(5.0);
        assert_eq!(time.delta_time, 0.25);
        time.update(-1.0);
        assert_eq!(time.delta_time, 0.0);
    }

    #[test]
    fn test_time_config_validation() {
        assert!(TimeConfig::default().validate().is_ok());
        let bad = TimeConfig {
            fixed_timestep: 0.0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(TimeError::InvalidTimestep(0.0)));
    }

    #[test]
    fn test_one_shot_timer() {
        let mut timer = Timer::new(1.0);
        assert!(!timer.tick(0.5));
        assert!(timer.tick(0.5));
        assert!(timer.finished());
        // Stays finished and does not report again
        assert!(!timer.tick(0.5));
        assert_eq!(timer.elapsed(), 1.0);
    }

    #[test]
    fn test_timer_never_negative() {
        let mut timer = Timer::new(1.0);
        timer.tick(-3.0);
        assert_eq!(timer.elapsed(), 0.0);
        assert_eq!(Timer::new(-2.0).duration(), 0.0);
    }

    #[test]
    fn test_finished_with_and_restart() {
        let mut timer = Timer::finished_with(2.0);
        assert!(timer.finished());
        assert_eq!(timer.remaining(), 0.0);
        timer.start(1.0);
        assert!(!timer.finished());
        assert_eq!(timer.remaining(), 1.0);
    }
}
