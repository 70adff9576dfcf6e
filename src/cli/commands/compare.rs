//! Compare command - Compare multiple drivers side-by-side

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    cli::commands::WorldArgs,
    pipeline::{Driver, ProgressObserver, RandomDriver, RunResult, TrialConfig, TrialPipeline},
    q_learning::{AgentConfig, LearningAgent, SavedAgent},
    world::TrafficWorld,
};

#[derive(Parser, Debug)]
#[command(about = "Compare multiple drivers")]
pub struct CompareArgs {
    /// Drivers to compare (q-learning, random, or agent:<path>)
    #[arg(required = true)]
    pub drivers: Vec<String>,

    /// Number of trials per driver
    #[arg(long, short = 't', default_value_t = 100)]
    pub trials: usize,

    /// Export comparison results to CSV
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    #[command(flatten)]
    pub world: WorldArgs,
}

struct ComparisonRow {
    name: String,
    spec: String,
    result: RunResult,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    if args.drivers.len() < 2 {
        return Err(anyhow!("Need at least 2 drivers to compare"));
    }

    // Create drivers
    let mut drivers: Vec<Box<dyn Driver>> = Vec::new();
    for (i, spec) in args.drivers.iter().enumerate() {
        let driver = create_driver(spec, args.seed, i)?;
        drivers.push(driver);
    }

    println!("Comparing {} drivers:", drivers.len());
    for (i, driver) in drivers.iter().enumerate() {
        println!("  {}: {} ({})", i + 1, driver.name(), args.drivers[i]);
    }
    println!("\nTrials per driver: {}", args.trials);
    if let Some(seed) = args.seed {
        println!("Seed: {seed}");
    }

    // Every driver runs the same trial sequence: a fresh world with the
    // same configuration and seed for each run.
    let mut rows = Vec::new();
    for (i, driver) in drivers.iter_mut().enumerate() {
        println!("\nDriver {}: {}", i + 1, driver.name());

        let mut world = TrafficWorld::new(args.world.to_config(args.seed))?;

        let config = TrialConfig {
            trials: args.trials,
            seed: args.seed,
        };
        let mut pipeline = TrialPipeline::new(config);
        if !args.no_progress {
            pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
        }

        let result = pipeline.run(driver.as_mut(), &mut world)?;
        rows.push(ComparisonRow {
            name: driver.name().to_string(),
            spec: args.drivers[i].clone(),
            result,
        });
    }

    // Display results
    println!("\n=== Comparison Results ===");
    println!();
    for row in &rows {
        println!(
            "{} | {}/{} successes ({:.1}%) | {:.3} penalties per move | mean net reward {:.2}",
            row.name,
            row.result.successes,
            row.result.total_trials,
            row.result.success_rate * 100.0,
            row.result.penalty_rate,
            row.result.mean_net_reward
        );
    }

    if let Some(best) = rows
        .iter()
        .max_by(|a, b| a.result.success_rate.total_cmp(&b.result.success_rate))
    {
        println!(
            "\nBest success rate: {} ({:.1}%)",
            best.name,
            best.result.success_rate * 100.0
        );
    }

    // Export to CSV if requested
    if let Some(output_path) = &args.output {
        export_csv(&rows, output_path)?;
        println!("\nResults exported to: {}", output_path.display());
    }

    Ok(())
}

fn create_driver(spec: &str, seed: Option<u64>, index: usize) -> Result<Box<dyn Driver>> {
    // Saved agents are evaluated frozen, with exploration turned off
    if let Some(path) = spec.strip_prefix("agent:") {
        let saved = SavedAgent::load_from_file(Path::new(path))?;
        let mut agent = saved.to_agent()?;
        agent.set_learning(false);
        agent.set_epsilon(0.0);
        return Ok(Box::new(agent));
    }

    match spec.to_lowercase().as_str() {
        "q-learning" => {
            let agent = LearningAgent::new(AgentConfig {
                seed,
                ..AgentConfig::default()
            })?;
            Ok(Box::new(agent))
        }
        "random" => Ok(Box::new(RandomDriver::new(format!(
            "Random-{}",
            index + 1
        )))),
        _ => Err(anyhow!(
            "Unknown driver type: '{spec}'. Supported: q-learning, random, agent:<path>"
        )),
    }
}

fn export_csv(rows: &[ComparisonRow], path: &PathBuf) -> Result<()> {
    use std::{fs::File, io::Write};

    let mut file = File::create(path)?;

    // Write header
    writeln!(
        file,
        "Driver,Spec,Trials,Successes,SuccessRate,PenaltyRate,MeanNetReward"
    )?;

    for row in rows {
        writeln!(
            file,
            "{},{},{},{},{:.4},{:.4},{:.4}",
            row.name,
            row.spec,
            row.result.total_trials,
            row.result.successes,
            row.result.success_rate,
            row.result.penalty_rate,
            row.result.mean_net_reward
        )?;
    }

    Ok(())
}
