//! Evaluate command - Run a saved agent against fresh trials

use std::{fs::File, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    pipeline::{ProgressObserver, RunResult, TraceObserver, TrialConfig, TrialPipeline},
    q_learning::{LearningAgent, SavedAgent},
    world::{TrafficWorld, WorldConfig},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a saved agent")]
pub struct EvaluateArgs {
    /// Path to the saved agent file
    pub agent: PathBuf,

    /// Number of evaluation trials
    #[arg(long, short = 't', default_value_t = 100)]
    pub trials: usize,

    /// Random seed for reproducibility (defaults to training seed + 1)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the stored exploration rate
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Keep learning during evaluation instead of freezing the policy
    #[arg(long, default_value_t = false)]
    pub learn: bool,

    /// Optional JSON file for evaluation results
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Print every step of every trial
    #[arg(long, default_value_t = false)]
    pub trace: bool,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    // Load the saved agent
    let saved = SavedAgent::load_from_file(&args.agent)?;

    println!("=== Loaded Agent Info ===");
    println!("Algorithm: Q-learning");
    if let Some(trials_trained) = saved.metadata.trials_trained {
        println!("Trials trained: {}", super::format_number(trials_trained));
    }
    if let Some(seed) = saved.metadata.seed {
        println!("Training seed: {seed}");
    }
    if let Some(world) = &saved.metadata.world {
        println!(
            "Training world: {}x{} grid, {} dummy cabs",
            world.width, world.height, world.dummies
        );
    }

    let mut agent: LearningAgent = saved.to_agent()?;
    println!(
        "Stored Q-values: {}",
        super::format_number(agent.q_table_size())
    );

    // Frozen greedy evaluation unless learning was explicitly requested
    if !args.learn {
        agent.set_learning(false);
        agent.set_epsilon(0.0);
    }
    if let Some(epsilon) = args.epsilon {
        agent.set_epsilon(epsilon);
    }

    let eval_seed = args
        .seed
        .or_else(|| saved.metadata.seed.map(|s| s.wrapping_add(1)));

    // Rebuild the training world shape with a fresh seed
    let world_config = WorldConfig {
        seed: eval_seed,
        ..saved.metadata.world.unwrap_or_default()
    };
    let mut world = TrafficWorld::new(world_config)?;

    println!("\n=== Evaluation Configuration ===");
    println!("Trials: {}", args.trials);
    println!("Learning: {}", if args.learn { "on" } else { "frozen" });
    println!("Epsilon: {}", agent.epsilon());
    if let Some(seed) = eval_seed {
        println!("Seed: {seed}");
    }

    println!("\n=== Running Evaluation ===");

    let config = TrialConfig {
        trials: args.trials,
        seed: eval_seed,
    };
    let mut pipeline = TrialPipeline::new(config);
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if args.trace {
        pipeline = pipeline.with_observer(Box::new(TraceObserver::new()));
    }

    let result = pipeline.run(&mut agent, &mut world)?;

    println!("\n=== Evaluation Results ===");
    println!("Total trials: {}", result.total_trials);
    println!(
        "Successes: {} ({:.1}%)",
        result.successes,
        result.success_rate * 100.0
    );
    println!("Failures: {}", result.failures);
    println!(
        "Penalties: {} ({:.3} per move)",
        result.total_penalties, result.penalty_rate
    );
    println!("Mean net reward: {:.2}", result.mean_net_reward);

    if let Some(export_path) = &args.export {
        export_results(export_path, &args, &saved, &agent, &result)?;
        println!("\n✓ Results exported to: {}", export_path.display());
    }

    Ok(())
}

fn export_results(
    path: &PathBuf,
    args: &EvaluateArgs,
    saved: &SavedAgent,
    agent: &LearningAgent,
    result: &RunResult,
) -> Result<()> {
    #[derive(Serialize)]
    struct EvaluationExport {
        evaluation: EvaluationSection,
        agent: AgentSection,
    }

    #[derive(Serialize)]
    struct EvaluationSection {
        agent_file: String,
        total_trials: usize,
        successes: usize,
        failures: usize,
        success_rate: f64,
        penalty_rate: f64,
        mean_net_reward: f64,
    }

    #[derive(Serialize)]
    struct AgentSection {
        algorithm: String,
        q_table_size: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        trials_trained: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    }

    let export = EvaluationExport {
        evaluation: EvaluationSection {
            agent_file: args.agent.display().to_string(),
            total_trials: result.total_trials,
            successes: result.successes,
            failures: result.failures,
            success_rate: result.success_rate,
            penalty_rate: result.penalty_rate,
            mean_net_reward: result.mean_net_reward,
        },
        agent: AgentSection {
            algorithm: "Q-learning".to_string(),
            q_table_size: agent.q_table_size(),
            trials_trained: saved.metadata.trials_trained,
            seed: saved.metadata.seed,
        },
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    to_writer_pretty(file, &export)?;

    Ok(())
}
