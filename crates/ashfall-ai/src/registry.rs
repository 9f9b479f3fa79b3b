//! Explicit owner of every live agent

use std::collections::BTreeMap;

use ashfall_core::{planar_distance, Vec3};
use tracing::info;

use crate::agent::{Agent, AgentId};

/// Live agents keyed by id. Iteration is in id order, so a tick visits
/// agents in the same order every run.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentId, Agent>,
    next_id: u64,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id and insert the agent `build` makes with it
    pub fn spawn(&mut self, build: impl FnOnce(AgentId) -> Agent) -> AgentId {
        self.next_id += 1;
        let id = AgentId(self.next_id);
        self.agents.insert(id, build(id));
        id
    }

    pub fn despawn(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(&id);
        if agent.is_some() {
            info!(agent = %id, "agent despawned");
        }
        agent
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.values_mut()
    }

    /// Agents whose planar distance to `center` is at most `radius`
    pub fn within_radius(&self, center: Vec3, radius: f32) -> Vec<AgentId> {
        self.agents
            .values()
            .filter(|agent| planar_distance(agent.position(), center) <= radius)
            .map(Agent::id)
            .collect()
    }
}
