//! Demo campaign against an analytic transformer loss model.
//!
//! The "simulation" is a closed-form stand-in for a medium-frequency
//! transformer: core loss falls with turns, copper loss rises with turns, and
//! efficiency follows from the total loss at 1 MW.
//!
//! Usage: `paramopt-demo [campaign.json] [--seed N] [--history]`. Without a
//! file the built-in targets are used. Set `RUST_LOG=paramopt=debug` for
//! per-sample logs.

use std::path::PathBuf;

use clap::Parser;
use paramopt_rs::campaign::{Campaign, CampaignConfig};
use paramopt_rs::optimizer::{AdjustmentConfig, OutputSet};
use paramopt_rs::parameters::{ParameterSet, ParameterSpace};
use paramopt_rs::{ParamOptError, Result};
use tracing_subscriber::EnvFilter;

const RATED_POWER_W: f64 = 1.0e6;

#[derive(Parser, Debug)]
#[command(author, version, about = "Boundary-adjustment campaign on a transformer loss model", long_about = None)]
struct Cli {
    /// JSON campaign configuration; the built-in targets are used when omitted
    config: Option<PathBuf>,

    /// Base sampling seed, overriding the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Print the full history table as JSON after the summary
    #[arg(long)]
    history: bool,
}

fn transformer_model(params: &ParameterSet) -> Result<OutputSet> {
    let turns = params["turns"];
    let window_mm = params["window_width"];
    let gap_mm = params["gap"];

    if turns <= 0.0 || window_mm <= 0.0 {
        return Err(ParamOptError::SimulationFailure(format!(
            "non-physical geometry: turns={turns}, window={window_mm}"
        )));
    }

    let core_loss = 4.0e5 / (turns * turns);
    let copper_loss = 0.9 * turns * turns / window_mm;
    let leakage_loss = 15.0 * gap_mm;
    let loss = core_loss + copper_loss + leakage_loss;

    Ok([
        ("loss".to_string(), loss),
        ("efficiency".to_string(), RATED_POWER_W / (RATED_POWER_W + loss * 100.0)),
    ]
    .into_iter()
    .collect())
}

fn design_space() -> Result<ParameterSpace> {
    let mut space = ParameterSpace::new();
    space.add_parameter("turns", 5.0, 60.0, None, "")?;
    space.add_parameter("window_width", 10.0, 80.0, None, "mm")?;
    space.add_parameter("gap", 0.5, 5.0, None, "mm")?;
    Ok(space)
}

fn default_config() -> CampaignConfig {
    let adjustment = AdjustmentConfig::default()
        .with_target("loss", 80.0)
        .with_tolerance("loss", 5.0)
        .with_target("efficiency", 0.992)
        .with_tolerance("efficiency", 0.001);

    CampaignConfig::new(adjustment)
        .with_iterations(8)
        .with_samples_per_iteration(12)
        .with_parallel_evaluation(true)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paramopt=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CampaignConfig::load_json(path)?,
        None => default_config(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let mut campaign = Campaign::new(design_space()?, transformer_model, config)?;
    let report = campaign.run()?;

    println!("Iterations run: {}", report.iterations_run);
    println!("Failed evaluations: {}", report.failed_evaluations);
    match &report.achieved {
        Some(params) => {
            println!("Target achieved with:");
            for (name, value) in params {
                println!("  {name} = {value:.4}");
            }
        }
        None => println!("Target not achieved"),
    }

    println!("Final bounds:");
    for bound in report.final_space.iter() {
        println!(
            "  {:<14} [{:.4}, {:.4}] {}",
            bound.name(),
            bound.min(),
            bound.max(),
            bound.unit()
        );
    }

    if cli.history {
        println!("{}", report.history.to_json()?);
    }
    Ok(())
}
