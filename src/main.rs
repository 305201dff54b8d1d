use clap::Parser;
use env_logger::Builder;
use log::{LevelFilter, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

use crate::common::sensor_field::{SensorField, load_field};
use crate::config::SimulationConfig;
use crate::simulation::types::Path;
use crate::simulation::{PathSelector, PathStatus, discover};

mod common;
mod config;
mod simulation;

/// Energy-aware multipath route discovery simulator for wireless sensor networks.
#[derive(Parser)]
#[command(name = "wsn-multipath-simulator")]
struct Cli {
    /// Path to the sensor field JSON file
    field: String,

    /// Path to the parameters TOML file (defaults to config.toml next to the field file)
    #[arg(long)]
    config: Option<String>,

    /// Override the RNG seed from the config file
    #[arg(long)]
    seed: Option<u64>,
}

fn print_path(number: usize, path: &Path, field: &SensorField) {
    println!("\nPath No. {}", number);
    println!("{}", path);
    let ids: Vec<String> = path.ids(field).iter().map(u32::to_string).collect();
    println!("Sensor ids: {}", ids.join("->"));
}

fn main() -> anyhow::Result<()> {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("wsn_multipath_simulator"), LevelFilter::Debug)
        .init();

    let cli = Cli::parse();

    let field = load_field(&cli.field)?;
    let config_path = match cli.config {
        Some(path) => PathBuf::from(path),
        None => SimulationConfig::config_path_from_field(&cli.field),
    };
    let mut config = SimulationConfig::load(&config_path).map_err(anyhow::Error::msg)?;
    if let Some(seed) = cli.seed {
        config.rng_seed = Some(seed);
    }

    info!(
        "Loaded field {} with {} sensors, parameters from {}",
        cli.field,
        field.len(),
        config_path.display()
    );

    let mut rng = match config.rng_seed {
        Some(seed) => {
            info!("Using RNG seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let matrix = discover(&field, &config, &mut rng)?;
    println!("{}", matrix);

    let mut selector = PathSelector::new(&field, matrix)?;
    loop {
        match selector.next_path()? {
            PathStatus::Found(path) => print_path(selector.path_count(), &path, &field),
            PathStatus::Exhausted => {
                println!("\nNo More Paths Found");
                break;
            }
        }
    }

    info!("Simulation finished with {} paths", selector.path_count());
    Ok(())
}
