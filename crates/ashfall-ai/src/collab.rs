//! Contracts for the systems the behavior engine talks to but does not own:
//! the player target, navigation, animation posture, hit zones, and damage.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Handle to a target owned by the host. Agents hold this, never the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u64);

/// Something agents can hunt
pub trait Target {
    fn position(&self) -> Vec3;
    fn is_alive(&self) -> bool;
}

/// Resolves target handles. A handle that no longer resolves is a normal,
/// non-error outcome.
pub trait TargetLookup {
    fn target(&self, id: TargetId) -> Option<&dyn Target>;

    /// Read position and liveness in one go
    fn snapshot(&self, id: TargetId) -> Option<TargetSnapshot> {
        self.target(id).map(|target| TargetSnapshot {
            id,
            position: target.position(),
            alive: target.is_alive(),
        })
    }
}

/// A target as sensed at the start of an agent's tick phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    pub id: TargetId,
    pub position: Vec3,
    pub alive: bool,
}

/// Host-owned collection of targets
#[derive(Debug, Clone)]
pub struct TargetRoster<T> {
    targets: HashMap<TargetId, T>,
}

impl<T: Target> TargetRoster<T> {
    pub fn new() -> Self {
        Self {
            targets: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: TargetId, target: T) -> Option<T> {
        self.targets.insert(id, target)
    }

    pub fn remove(&mut self, id: TargetId) -> Option<T> {
        self.targets.remove(&id)
    }

    pub fn get(&self, id: TargetId) -> Option<&T> {
        self.targets.get(&id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut T> {
        self.targets.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl<T: Target> Default for TargetRoster<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Target> TargetLookup for TargetRoster<T> {
    fn target(&self, id: TargetId) -> Option<&dyn Target> {
        self.targets.get(&id).map(|t| t as &dyn Target)
    }
}

/// A fixed point with a liveness flag. Handy for scripted scenes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticTarget {
    pub position: Vec3,
    pub alive: bool,
}

impl StaticTarget {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            alive: true,
        }
    }
}

impl Target for StaticTarget {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Navigation capability. The engine never computes paths; it only orders
/// "go there", "this fast", and "stop".
pub trait NavigationMover {
    fn set_speed(&mut self, speed: f32);
    fn move_to(&mut self, destination: Vec3);
    fn stop(&mut self);

    /// Where the mover has carried an agent standing at `position` after `dt`.
    /// Movers backed by an engine that drives the transform itself keep the
    /// default, which leaves the position alone.
    fn advance(&mut self, position: Vec3, _dt: f32) -> Vec3 {
        position
    }
}

/// Animation posture, fire-and-forget. Signals are named booleans held on
/// until stopped; triggers are one-shots.
pub trait PostureDriver {
    fn start_signal(&mut self, name: &str);
    fn stop_signal(&mut self, name: &str);
    fn fire(&mut self, name: &str);

    /// Normalized progress of the named clip, if the driver tracks it
    fn normalized_progress(&self, _name: &str) -> Option<f32> {
        None
    }
}

/// The damage volume attached to an agent's weapon or body
pub trait HitZone {
    fn enable(&mut self);
    fn disable(&mut self);
    fn is_enabled(&self) -> bool;
}

/// Receives damage at hit time
pub trait DamageSink {
    fn apply_damage(&mut self, target: TargetId, amount: f32, source: Vec3);
}

/// One hit, as recorded by [`DamageLedger`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageEvent {
    pub target: TargetId,
    pub amount: f32,
    pub source: Vec3,
}

/// Queues damage for the host to apply after the tick
#[derive(Debug, Clone, Default)]
pub struct DamageLedger {
    events: Vec<DamageEvent>,
    total: f32,
}

impl DamageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DamageEvent] {
        &self.events
    }

    /// Take all queued hits
    pub fn drain(&mut self) -> Vec<DamageEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sum of every hit ever recorded, drained or not
    pub fn total(&self) -> f32 {
        self.total
    }
}

impl DamageSink for DamageLedger {
    fn apply_damage(&mut self, target: TargetId, amount: f32, source: Vec3) {
        self.total += amount;
        self.events.push(DamageEvent {
            target,
            amount,
            source,
        });
    }
}

/// Posture driver for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPosture;

impl PostureDriver for NullPosture {
    fn start_signal(&mut self, _name: &str) {}
    fn stop_signal(&mut self, _name: &str) {}
    fn fire(&mut self, _name: &str) {}
}

/// Hit zone for headless runs; only remembers its flag
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagHitZone {
    enabled: bool,
}

impl HitZone for FlagHitZone {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
