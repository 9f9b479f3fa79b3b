//! Explicit tick loop
//!
//! The host owns an [`Encounter`] and calls [`Encounter::tick`] once per
//! frame. Each tick runs every agent's `handle_input`, then every agent's
//! `update`, then every agent's `physics_update`, then moves projectiles.

use ashfall_core::{GameTime, ObstacleQuery, TimeConfig, Vec3};
use tracing::{debug, trace};

use crate::agent::{Agent, AgentId, AgentRig};
use crate::archetype::Archetype;
use crate::collab::{DamageSink, TargetId, TargetLookup};
use crate::projectile::ProjectilePool;
use crate::registry::AgentRegistry;

/// Shared world services for one pass over the agents
pub struct Frame<'w> {
    pub dt: f32,
    pub targets: &'w dyn TargetLookup,
    pub damage: &'w mut dyn DamageSink,
    pub obstacles: &'w dyn ObstacleQuery,
    pub projectiles: &'w mut ProjectilePool,
}

/// Something the scheduler drives once per tick
pub trait Tickable {
    fn handle_input(&mut self, frame: &mut Frame<'_>);
    fn update(&mut self, frame: &mut Frame<'_>);
    fn physics_update(&mut self, frame: &mut Frame<'_>);
}

/// A fight: the clock, every agent, their projectiles, and the world services
/// they act through.
pub struct Encounter<D, O> {
    time: GameTime,
    registry: AgentRegistry,
    projectiles: ProjectilePool,
    damage: D,
    obstacles: O,
}

impl<D: DamageSink, O: ObstacleQuery> Encounter<D, O> {
    pub fn new(time: TimeConfig, damage: D, obstacles: O) -> Self {
        Self {
            time: GameTime::new(time),
            registry: AgentRegistry::new(),
            projectiles: ProjectilePool::new(),
            damage,
            obstacles,
        }
    }

    pub fn time(&self) -> &GameTime {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut GameTime {
        &mut self.time
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut AgentRegistry {
        &mut self.registry
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.registry.get(id)
    }

    pub fn projectiles(&self) -> &ProjectilePool {
        &self.projectiles
    }

    pub fn damage(&self) -> &D {
        &self.damage
    }

    pub fn damage_mut(&mut self) -> &mut D {
        &mut self.damage
    }

    pub fn obstacles(&self) -> &O {
        &self.obstacles
    }

    /// Spawn an agent from an archetype with headless collaborators
    pub fn spawn(&mut self, archetype: &Archetype, position: Vec3, target: Option<TargetId>) -> AgentId {
        self.spawn_with_rig(archetype, position, target, AgentRig::headless())
    }

    pub fn spawn_with_rig(
        &mut self,
        archetype: &Archetype,
        position: Vec3,
        target: Option<TargetId>,
        rig: AgentRig,
    ) -> AgentId {
        self.registry.spawn(|id| {
            let mut agent = archetype.instantiate(id, position, rig);
            agent.set_target(target);
            agent
        })
    }

    pub fn despawn(&mut self, id: AgentId) -> Option<Agent> {
        self.registry.despawn(id)
    }

    /// Advance the clock by `raw_dt` and run one tick. Returns the scaled
    /// delta the agents saw; a paused clock runs nothing and returns zero.
    pub fn tick(&mut self, raw_dt: f32, targets: &dyn TargetLookup) -> f32 {
        self.time.update(raw_dt);
        if self.time.paused {
            return 0.0;
        }
        let dt = self.time.delta_time;
        trace!(frame = self.time.frame_count, dt, agents = self.registry.len(), "tick");

        let Self {
            registry,
            projectiles,
            damage,
            obstacles,
            ..
        } = self;

        let mut frame = Frame {
            dt,
            targets,
            damage,
            obstacles: &*obstacles,
            projectiles,
        };
        for agent in registry.iter_mut() {
            agent.handle_input(&mut frame);
        }
        for agent in registry.iter_mut() {
            agent.update(&mut frame);
        }
        for agent in registry.iter_mut() {
            agent.physics_update(&mut frame);
        }

        let hits = frame.projectiles.update(dt, targets, &mut *frame.damage, frame.obstacles);
        if hits > 0 {
            debug!(hits, "projectiles landed");
        }
        dt
    }

    /// Inbound interrupt channel: force `agent` into Idle for `stun` seconds.
    /// Returns false if the agent does not exist.
    pub fn interrupt(&mut self, agent: AgentId, stun: f32, targets: &dyn TargetLookup) -> bool {
        let dt = self.time.delta_time;
        let Some(agent) = self.registry.get_mut(agent) else {
            return false;
        };
        let mut frame = Frame {
            dt,
            targets,
            damage: &mut self.damage,
            obstacles: &self.obstacles,
            projectiles: &mut self.projectiles,
        };
        agent.force_idle(stun, &mut frame);
        true
    }
}
