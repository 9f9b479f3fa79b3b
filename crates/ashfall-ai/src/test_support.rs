//! Recording doubles shared by the unit tests

use std::cell::RefCell;
use std::rc::Rc;

use ashfall_core::ObstacleQuery;
use glam::Vec3;

use crate::agent::{AgentId, AgentRig};
use crate::collab::{DamageLedger, HitZone, NavigationMover, PostureDriver, TargetSnapshot};
use crate::context::{AgentBody, AgentContext, AgentRequests};
use crate::projectile::ProjectilePool;
use crate::states::BoundStrategy;
use crate::strategy::{AttackContext, AttackPhase, AttackStrategy};

#[derive(Debug, Default)]
pub struct MoverLog {
    pub speeds: Vec<f32>,
    pub destinations: Vec<Vec3>,
    pub stops: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingMover {
    pub log: Rc<RefCell<MoverLog>>,
}

impl NavigationMover for RecordingMover {
    fn set_speed(&mut self, speed: f32) {
        self.log.borrow_mut().speeds.push(speed);
    }

    fn move_to(&mut self, destination: Vec3) {
        self.log.borrow_mut().destinations.push(destination);
    }

    fn stop(&mut self) {
        self.log.borrow_mut().stops += 1;
    }
}

#[derive(Debug, Default)]
pub struct PostureLog {
    pub started: Vec<String>,
    pub stopped: Vec<String>,
    pub fired: Vec<String>,
    /// Signals currently held on
    pub active: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingPosture {
    pub log: Rc<RefCell<PostureLog>>,
}

impl PostureDriver for RecordingPosture {
    fn start_signal(&mut self, name: &str) {
        let mut log = self.log.borrow_mut();
        log.started.push(name.to_string());
        if !log.active.iter().any(|s| s == name) {
            log.active.push(name.to_string());
        }
    }

    fn stop_signal(&mut self, name: &str) {
        let mut log = self.log.borrow_mut();
        log.stopped.push(name.to_string());
        log.active.retain(|s| s != name);
    }

    fn fire(&mut self, name: &str) {
        self.log.borrow_mut().fired.push(name.to_string());
    }
}

#[derive(Debug, Default)]
pub struct ZoneLog {
    pub enabled: bool,
    pub enables: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingZone {
    pub log: Rc<RefCell<ZoneLog>>,
}

impl HitZone for RecordingZone {
    fn enable(&mut self) {
        let mut log = self.log.borrow_mut();
        log.enabled = true;
        log.enables += 1;
    }

    fn disable(&mut self) {
        self.log.borrow_mut().enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.log.borrow().enabled
    }
}

/// A wall straight ahead of every ray, `distance` away
#[derive(Debug, Clone, Copy, Default)]
pub struct TestWall {
    pub distance: Option<f32>,
}

impl ObstacleQuery for TestWall {
    fn cast(&self, _origin: Vec3, _direction: Vec3, max_distance: f32) -> Option<f32> {
        self.distance.filter(|d| *d <= max_distance)
    }
}

/// Calls made on a [`ProbeStrategy`]
#[derive(Debug, Default)]
pub struct ProbeLog {
    pub starts: u32,
    pub stops: u32,
    pub ticks: u32,
}

/// Attacks for a fixed time; records every call it receives
#[derive(Debug, Clone)]
pub struct ProbeStrategy {
    pub log: Rc<RefCell<ProbeLog>>,
    pub range: f32,
    pub cooldown: f32,
    pub duration: f32,
    elapsed: f32,
    phase: AttackPhase,
}

impl ProbeStrategy {
    pub fn new(range: f32, cooldown: f32, duration: f32) -> Self {
        Self {
            log: Rc::default(),
            range,
            cooldown,
            duration,
            elapsed: 0.0,
            phase: AttackPhase::Ready,
        }
    }
}

impl AttackStrategy for ProbeStrategy {
    fn name(&self) -> &'static str {
        "probe"
    }

    fn phase(&self) -> AttackPhase {
        self.phase
    }

    fn start_attack(&mut self, _ctx: &mut AttackContext<'_>) {
        self.log.borrow_mut().starts += 1;
        if !self.phase.is_active() {
            self.phase = AttackPhase::Windup;
            self.elapsed = 0.0;
        }
    }

    fn stop_attack(&mut self, _ctx: &mut AttackContext<'_>) {
        self.log.borrow_mut().stops += 1;
        if self.phase.is_active() {
            self.phase = AttackPhase::Cancelled;
        }
    }

    fn tick(&mut self, ctx: &mut AttackContext<'_>) {
        self.log.borrow_mut().ticks += 1;
        match self.phase {
            AttackPhase::Windup | AttackPhase::Committed => {
                self.elapsed += ctx.dt;
                if self.elapsed >= self.duration {
                    self.phase = AttackPhase::Ready;
                }
            }
            AttackPhase::Cancelled => self.phase = AttackPhase::Ready,
            AttackPhase::Ready => {}
        }
    }

    fn attack_range(&self) -> f32 {
        self.range
    }

    fn cooldown_time(&self) -> f32 {
        self.cooldown
    }
}

/// Recording collaborators plus the logs that observe them
#[derive(Debug, Default)]
pub struct RigLogs {
    pub mover: Rc<RefCell<MoverLog>>,
    pub posture: Rc<RefCell<PostureLog>>,
    pub zone: Rc<RefCell<ZoneLog>>,
}

/// An agent rig whose collaborators record into the returned logs
pub fn recording_rig() -> (AgentRig, RigLogs) {
    let mover = RecordingMover::default();
    let posture = RecordingPosture::default();
    let zone = RecordingZone::default();
    let logs = RigLogs {
        mover: mover.log.clone(),
        posture: posture.log.clone(),
        zone: zone.log.clone(),
    };
    let rig = AgentRig {
        mover: Box::new(mover),
        posture: Box::new(posture),
        hit_zone: Box::new(zone),
    };
    (rig, logs)
}

/// Owns one agent's worth of state so contexts can be built in tests
pub struct Fixture {
    pub agent: AgentId,
    pub body: AgentBody,
    pub target: Option<TargetSnapshot>,
    pub mover: RecordingMover,
    pub mover_log: Rc<RefCell<MoverLog>>,
    pub posture: RecordingPosture,
    pub posture_log: Rc<RefCell<PostureLog>>,
    pub hit_zone: RecordingZone,
    pub zone_log: Rc<RefCell<ZoneLog>>,
    pub damage: DamageLedger,
    pub wall: TestWall,
    pub projectiles: ProjectilePool,
    pub requests: AgentRequests,
    pub dt: f32,
}

impl Fixture {
    pub fn new() -> Self {
        let mover = RecordingMover::default();
        let posture = RecordingPosture::default();
        let hit_zone = RecordingZone::default();
        Self {
            agent: AgentId(1),
            body: AgentBody::default(),
            target: None,
            mover_log: mover.log.clone(),
            mover,
            posture_log: posture.log.clone(),
            posture,
            zone_log: hit_zone.log.clone(),
            hit_zone,
            damage: DamageLedger::new(),
            wall: TestWall::default(),
            projectiles: ProjectilePool::new(),
            requests: AgentRequests::default(),
            dt: 0.25,
        }
    }

    pub fn agent_context<'a>(
        &'a mut self,
        strategy: Option<&'a mut dyn AttackStrategy>,
    ) -> AgentContext<'a> {
        AgentContext {
            agent: self.agent,
            body: &mut self.body,
            target: self.target,
            strategy: BoundStrategy::new(strategy),
            mover: &mut self.mover,
            posture: &mut self.posture,
            hit_zone: &mut self.hit_zone,
            damage: &mut self.damage,
            obstacles: &self.wall,
            projectiles: &mut self.projectiles,
            requests: &mut self.requests,
            dt: self.dt,
        }
    }

    pub fn attack_context(&mut self) -> AttackContext<'_> {
        AttackContext {
            agent: self.agent,
            body: &mut self.body,
            target: self.target,
            posture: &mut self.posture,
            hit_zone: &mut self.hit_zone,
            damage: &mut self.damage,
            obstacles: &self.wall,
            projectiles: &mut self.projectiles,
            requests: &mut self.requests,
            dt: self.dt,
        }
    }
}
