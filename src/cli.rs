//! Command-line interface for the skirmish runner

use std::path::PathBuf;

use clap::Parser;

/// Headless skirmish simulation for the Ashfall enemy behavior engine
#[derive(Parser, Debug)]
#[command(name = "ashfall")]
#[command(about = "Headless skirmish simulation for the Ashfall enemy behavior engine")]
#[command(version)]
pub struct Args {
    /// Ticks to simulate (overrides the settings file)
    #[arg(long)]
    pub ticks: Option<u64>,

    /// RNG seed for the player's wandering and staggers
    #[arg(long)]
    pub seed: Option<u64>,

    /// Settings file; defaults to the user config directory
    #[arg(long, value_name = "SETTINGS_FILE")]
    pub config: Option<PathBuf>,

    /// Archetype catalog (TOML); defaults to the built-in catalog
    #[arg(long, value_name = "CATALOG_FILE")]
    pub catalog: Option<PathBuf>,

    /// Simulation speed multiplier (1.0 = real time)
    #[arg(long, value_name = "SCALE")]
    pub time_scale: Option<f32>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Log state transitions and strategy phases
    #[arg(short, long)]
    pub verbose: bool,

    /// Write the effective settings to the user config directory and exit
    #[arg(long)]
    pub save_settings: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}
