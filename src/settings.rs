//! Simulation settings with persistence
//!
//! Settings are saved to `~/.config/ashfall/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ashfall_core::TimeConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All simulation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub time: TimeConfig,
    pub arena: ArenaSettings,
    pub run: RunSettings,
}

impl SimulationSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ashfall"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from the config directory, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        settings.time.validate().context("Invalid time settings")?;
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to the config directory
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(path)
    }
}

/// Arena layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// The player never wanders past this distance from the centre
    pub radius: f32,
    /// Agents start on a ring this far from the player
    pub spawn_ring_radius: f32,
    pub pillars: Vec<PillarSettings>,
    pub spawns: Vec<SpawnGroup>,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            radius: 20.0,
            spawn_ring_radius: 12.0,
            pillars: vec![
                PillarSettings { x: 6.0, z: 0.0, radius: 1.0, height: 4.0 },
                PillarSettings { x: -4.0, z: 5.0, radius: 1.0, height: 4.0 },
                PillarSettings { x: 0.0, z: -7.0, radius: 1.5, height: 4.0 },
            ],
            spawns: vec![
                SpawnGroup { archetype: "grunt".into(), count: 3 },
                SpawnGroup { archetype: "brute".into(), count: 1 },
                SpawnGroup { archetype: "archer".into(), count: 2 },
                SpawnGroup { archetype: "husk".into(), count: 1 },
            ],
        }
    }
}

/// An upright cylinder obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PillarSettings {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
    pub height: f32,
}

/// How many agents of one archetype to spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnGroup {
    pub archetype: String,
    pub count: u32,
}

/// Run length and player behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Ticks to simulate
    pub ticks: u64,
    pub seed: u64,
    pub player_health: f32,
    pub player_speed: f32,
    /// Chance per tick that the player staggers an adjacent agent
    pub interrupt_chance: f32,
    /// Agents this close to the player can be staggered
    pub interrupt_reach: f32,
    pub stun_duration: f32,
    /// Archetype catalog; the built-in catalog is used when unset
    pub catalog: Option<PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            ticks: 1800,
            seed: 7,
            player_health: 400.0,
            player_speed: 2.5,
            interrupt_chance: 0.02,
            interrupt_reach: 2.5,
            stun_duration: 2.0,
            catalog: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: SimulationSettings = toml::from_str(
            r#"
            [run]
            ticks = 60
            "#,
        )
        .unwrap();
        assert_eq!(settings.run.ticks, 60);
        assert_eq!(settings.run.seed, 7);
        assert_eq!(settings.arena.spawns.len(), 4);
        assert!(settings.time.validate().is_ok());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let settings = SimulationSettings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let back: SimulationSettings = toml::from_str(&text).unwrap();
        assert_eq!(back.arena.pillars.len(), settings.arena.pillars.len());
        assert_eq!(back.run.stun_duration, settings.run.stun_duration);
    }
}
