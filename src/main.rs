//! Ashfall - headless skirmish runner
//!
//! Spawns a ring of enemies around a wandering player and lets the behavior
//! engine run for a fixed number of ticks.

mod arena;
mod cli;
mod settings;

use std::fs;

use anyhow::{Context, Result};
use ashfall_ai::ArchetypeCatalog;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::arena::Arena;
use crate::settings::SimulationSettings;

fn main() -> Result<()> {
    let args = cli::parse_args();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Ashfall skirmish...");

    let mut settings = match &args.config {
        Some(path) => SimulationSettings::load_from(path)?,
        None => SimulationSettings::load(),
    };
    if let Some(ticks) = args.ticks {
        settings.run.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        settings.run.seed = seed;
    }
    if let Some(catalog) = &args.catalog {
        settings.run.catalog = Some(catalog.clone());
    }

    if args.save_settings {
        let path = settings.save().context("Failed to save settings")?;
        println!("{}", path.display());
        return Ok(());
    }

    let catalog = match &settings.run.catalog {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read archetype catalog {}", path.display()))?;
            ArchetypeCatalog::from_toml_str(&source)
                .with_context(|| format!("Invalid archetype catalog {}", path.display()))?
        }
        None => ArchetypeCatalog::builtin(),
    };
    info!(archetypes = catalog.len(), "catalog loaded");

    let ticks = settings.run.ticks;
    let mut arena = Arena::new(settings, &catalog)?;
    if let Some(scale) = args.time_scale {
        arena.set_time_scale(scale);
    }
    let summary = arena.run(ticks);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print();
    }

    Ok(())
}
