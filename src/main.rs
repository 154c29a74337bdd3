use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use daisyworld::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Daisyworld climate simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/temperate.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Override the time flow percentage (1 to 1000)
    #[arg(long)]
    time_flow: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    if let Some(time_flow) = cli.time_flow {
        scenario.parameters.time_flow = time_flow;
    }

    let (mut world, equilibrium) = scenario.build_world()?;
    info!(
        baseline = equilibrium.baseline,
        converged = equilibrium.converged,
        "world ready"
    );
    let ticks = scenario.ticks(cli.ticks);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_ticks);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        snapshot_interval_ticks: snapshot_interval,
        snapshot_dir,
    };

    let mut engine = EngineBuilder::new(settings, scenario.parameters.clone()).build()?;
    engine.run(&mut world, ticks)?;

    match world.census() {
        Some(census) => println!(
            "Scenario '{}' completed for {} ticks. White: {} Black: {} Empty: {} Water: {} Mean temperature: {:.2} (baseline {:.2})",
            scenario.name,
            ticks,
            census.white,
            census.black,
            census.empty,
            census.water,
            census.mean_temperature,
            world.baseline()
        ),
        None => println!("Scenario '{}' ran no ticks.", scenario.name),
    }
    Ok(())
}
