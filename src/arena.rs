//! Skirmish arena: a wandering player, a ring of agents, and pillars to dodge
//! around.

use anyhow::{Context, Result};
use ashfall_ai::{
    AgentId, ArchetypeCatalog, BehaviorKind, DamageLedger, Encounter, ProjectileStats, Target, TargetId,
    TargetRoster,
};
use ashfall_core::{planar_direction, planar_distance, Vec3};
use ashfall_physics::ObstacleWorld;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::settings::SimulationSettings;

pub const PLAYER: TargetId = TargetId(1);

/// The target every agent hunts
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    pub health: f32,
    pub speed: f32,
    waypoint: Vec3,
}

impl Player {
    fn new(health: f32, speed: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            health,
            speed,
            waypoint: Vec3::ZERO,
        }
    }

    /// Walk towards the current waypoint; pick a new one on arrival
    fn wander(&mut self, dt: f32, radius: f32, rng: &mut StdRng) {
        if !self.is_alive() {
            return;
        }
        if planar_distance(self.position, self.waypoint) < 0.5 {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let distance = rng.gen_range(0.0..radius);
            self.waypoint = Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
        }
        let step = (self.speed * dt).min(planar_distance(self.position, self.waypoint));
        self.position += planar_direction(self.position, self.waypoint) * step;
    }
}

impl Target for Player {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// One agent at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub id: u64,
    pub archetype: String,
    pub state: Option<BehaviorKind>,
    pub position: [f32; 3],
    pub transitions: u64,
    pub interrupts: u32,
}

/// What happened during a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub simulated_seconds: f64,
    pub player_alive: bool,
    pub player_health: f32,
    pub damage_taken: f32,
    pub hits_taken: u32,
    pub interrupts: u32,
    pub projectiles: ProjectileStats,
    pub agents: Vec<AgentSummary>,
}

impl RunSummary {
    pub fn print(&self) {
        println!("Ashfall skirmish: {} ticks ({:.1}s simulated)", self.ticks, self.simulated_seconds);
        println!(
            "  player: {} with {:.1} health ({:.1} damage taken)",
            if self.player_alive { "alive" } else { "dead" },
            self.player_health,
            self.damage_taken
        );
        println!("  hits taken: {}", self.hits_taken);
        println!(
            "  projectiles: {} fired, {} hit, {} blocked, {} expired",
            self.projectiles.spawned, self.projectiles.hits, self.projectiles.blocked, self.projectiles.expired
        );
        println!("  interrupts delivered: {}", self.interrupts);
        for agent in &self.agents {
            let state = agent.state.map_or_else(|| "-".to_string(), |s| s.to_string());
            println!(
                "  agent#{:<3} {:<8} {:<8} transitions={:<4} at ({:.1}, {:.1})",
                agent.id, agent.archetype, state, agent.transitions, agent.position[0], agent.position[2]
            );
        }
    }
}

pub struct Arena {
    settings: SimulationSettings,
    encounter: Encounter<DamageLedger, ObstacleWorld>,
    roster: TargetRoster<Player>,
    rng: StdRng,
    hits_taken: u32,
    interrupts: u32,
    ticks: u64,
}

impl Arena {
    pub fn new(settings: SimulationSettings, catalog: &ArchetypeCatalog) -> Result<Self> {
        settings.time.validate().context("Invalid time settings")?;

        let mut obstacles = ObstacleWorld::new();
        for pillar in &settings.arena.pillars {
            // Sink the base so rays cast at foot height hit the side
            obstacles.create_pillar(Vec3::new(pillar.x, -1.0, pillar.z), pillar.radius, pillar.height + 1.0);
        }
        obstacles.update_queries();

        let mut encounter = Encounter::new(settings.time.clone(), DamageLedger::new(), obstacles);

        let total: u32 = settings.arena.spawns.iter().map(|g| g.count).sum();
        let mut slot = 0;
        for group in &settings.arena.spawns {
            let archetype = catalog
                .require(&group.archetype)
                .with_context(|| format!("Spawn group refers to archetype '{}'", group.archetype))?;
            for _ in 0..group.count {
                let angle = std::f32::consts::TAU * slot as f32 / total.max(1) as f32;
                let ring = settings.arena.spawn_ring_radius;
                let position = Vec3::new(angle.cos() * ring, 0.0, angle.sin() * ring);
                encounter.spawn(archetype, position, Some(PLAYER));
                slot += 1;
            }
        }

        let mut roster = TargetRoster::new();
        roster.insert(PLAYER, Player::new(settings.run.player_health, settings.run.player_speed));

        info!(
            agents = encounter.registry().len(),
            pillars = settings.arena.pillars.len(),
            "arena ready"
        );

        Ok(Self {
            rng: StdRng::seed_from_u64(settings.run.seed),
            settings,
            encounter,
            roster,
            hits_taken: 0,
            interrupts: 0,
            ticks: 0,
        })
    }

    pub fn player(&self) -> Option<&Player> {
        self.roster.get(PLAYER)
    }

    /// Speed the encounter clock up or down; the fixed step stays the same
    pub fn set_time_scale(&mut self, scale: f32) {
        self.encounter.time_mut().set_time_scale(scale);
        info!(scale = self.encounter.time().config.time_scale, "time scale set");
    }

    /// Advance the whole scene by one fixed step
    pub fn step(&mut self) {
        let step = self.settings.time.fixed_timestep;
        let dt = self.encounter.tick(step, &self.roster);
        self.ticks += 1;

        let radius = self.settings.arena.radius;
        if let Some(player) = self.roster.get_mut(PLAYER) {
            player.wander(dt, radius, &mut self.rng);
        }
        self.apply_damage();
        self.maybe_stagger();
    }

    pub fn run(&mut self, ticks: u64) -> RunSummary {
        for _ in 0..ticks {
            self.step();
            if !self.player().is_some_and(Player::is_alive) {
                info!(tick = self.ticks, "player down");
                break;
            }
        }
        self.summary()
    }

    fn apply_damage(&mut self) {
        for event in self.encounter.damage_mut().drain() {
            self.hits_taken += 1;
            if let Some(player) = self.roster.get_mut(event.target) {
                player.health = (player.health - event.amount).max(0.0);
                debug!(amount = event.amount, health = player.health, "player hit");
            }
        }
    }

    /// The player occasionally staggers one agent within reach
    fn maybe_stagger(&mut self) {
        let Some(player) = self.roster.get(PLAYER) else {
            return;
        };
        if !player.is_alive() || !self.rng.gen_bool(self.settings.run.interrupt_chance.clamp(0.0, 1.0) as f64) {
            return;
        }
        let near = self
            .encounter
            .registry()
            .within_radius(player.position, self.settings.run.interrupt_reach);
        if near.is_empty() {
            return;
        }
        let victim: AgentId = near[self.rng.gen_range(0..near.len())];
        if self.encounter.interrupt(victim, self.settings.run.stun_duration, &self.roster) {
            self.interrupts += 1;
            debug!(agent = %victim, "staggered by the player");
        }
    }

    pub fn summary(&self) -> RunSummary {
        let player = self.player();
        let agents = self
            .encounter
            .registry()
            .iter()
            .map(|agent| {
                let p = agent.position();
                AgentSummary {
                    id: agent.id().0,
                    archetype: agent.archetype().to_string(),
                    state: agent.state_kind(),
                    position: [p.x, p.y, p.z],
                    transitions: agent.transitions(),
                    interrupts: agent.interrupts(),
                }
            })
            .collect();

        RunSummary {
            ticks: self.ticks,
            simulated_seconds: self.encounter.time().total_time,
            player_alive: player.is_some_and(Player::is_alive),
            player_health: player.map_or(0.0, |p| p.health),
            damage_taken: self.encounter.damage().total(),
            hits_taken: self.hits_taken,
            interrupts: self.interrupts,
            projectiles: self.encounter.projectiles().stats(),
            agents,
        }
    }
}
