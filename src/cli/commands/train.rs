//! Train command - Train a driving agent in the grid world

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::commands::WorldArgs,
    export::TrialCsvExporter,
    pipeline::{
        JsonlObserver, ProgressObserver, RunResult, TraceObserver, TrialConfig, TrialPipeline,
    },
    q_learning::{AgentConfig, LearningAgent, SavedAgent, TrainingMetadata},
    world::TrafficWorld,
};

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryStats {
    total_trials: usize,
    successes: usize,
    failures: usize,
    success_rate: f64,
    total_penalties: usize,
    penalty_rate: f64,
    mean_net_reward: f64,
}

impl From<&RunResult> for SummaryStats {
    fn from(result: &RunResult) -> Self {
        Self {
            total_trials: result.total_trials,
            successes: result.successes,
            failures: result.failures,
            success_rate: result.success_rate,
            total_penalties: result.total_penalties,
            penalty_rate: result.penalty_rate,
            mean_net_reward: result.mean_net_reward,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: SummaryStats,
    validation: Option<SummaryStats>,
    q_table_size: usize,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    default_q: f64,
    grid: String,
    dummies: usize,
    enforce_deadline: bool,
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
#[command(about = "Train a driving agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of training trials
    #[arg(long, short = 't', default_value_t = 100)]
    pub trials: usize,

    /// Learning rate (alpha)
    #[arg(long, default_value_t = 0.90)]
    pub learning_rate: f64,

    /// Discount factor (gamma)
    #[arg(long, default_value_t = 0.10)]
    pub discount: f64,

    /// Exploration rate (epsilon)
    #[arg(long, default_value_t = 0.05)]
    pub epsilon: f64,

    /// Initial Q-value for unseen state-action pairs
    #[arg(long, default_value_t = 0.0)]
    pub default_q: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of post-training validation trials with a frozen greedy policy
    #[arg(long, short = 'v', default_value_t = 20)]
    pub validation_trials: usize,

    /// Seed for validation trials (defaults to seed + 1)
    #[arg(long)]
    pub validation_seed: Option<u64>,

    /// Output file for the trained agent
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional CSV file for per-trial records
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Print every step of every trial
    #[arg(long, default_value_t = false)]
    pub trace: bool,

    #[command(flatten)]
    pub world: WorldArgs,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let agent_config = AgentConfig {
        learning_rate: args.learning_rate,
        discount_factor: args.discount,
        epsilon: args.epsilon,
        default_q: args.default_q,
        seed: args.seed,
    };
    let mut agent = LearningAgent::new(agent_config)?;

    let world_config = args.world.to_config(args.seed);
    let mut world = TrafficWorld::new(world_config)?;

    let summary_spec = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    println!("=== Training ===");
    println!("Trials: {}", args.trials);
    println!(
        "Hyperparameters: alpha = {}, gamma = {}, epsilon = {}, default Q = {}",
        args.learning_rate, args.discount, args.epsilon, args.default_q
    );
    println!(
        "World: {}x{} grid, {} dummy cabs, deadline {}",
        args.world.grid_width,
        args.world.grid_height,
        args.world.dummies,
        if args.world.no_enforce_deadline {
            "relaxed"
        } else {
            "enforced"
        }
    );
    if let Some(seed) = args.seed {
        println!("Seed: {seed}");
    }

    let config = TrialConfig {
        trials: args.trials,
        seed: args.seed,
    };
    let mut pipeline = TrialPipeline::new(config);

    // Add progress bar observer if requested
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    // Add trace observer if requested
    if args.trace {
        pipeline = pipeline.with_observer(Box::new(TraceObserver::new()));
    }

    // Add JSONL observer if requested
    if let Some(observations_path) = &args.observations {
        let jsonl_observer = JsonlObserver::new(observations_path)?;
        pipeline = pipeline.with_observer(Box::new(jsonl_observer));
    }

    let result = pipeline.run(&mut agent, &mut world)?;

    // Print results
    println!("\n=== Training Complete ===");
    println!("Total trials: {}", result.total_trials);
    println!(
        "Successes: {} ({:.1}%)",
        result.successes,
        result.success_rate * 100.0
    );
    println!(
        "Penalties: {} ({:.3} per move)",
        result.total_penalties, result.penalty_rate
    );
    println!("Mean net reward: {:.2}", result.mean_net_reward);
    println!(
        "Q-table size: {} state-action pairs",
        super::format_number(agent.q_table_size())
    );

    // Post-training validation with a frozen copy of the learned policy
    let validation_result = if args.validation_trials > 0 {
        println!("\n=== Post-Training Validation ===");
        println!(
            "Running {} trials with a frozen greedy policy...",
            args.validation_trials
        );

        let validation_seed = args
            .validation_seed
            .or_else(|| args.seed.map(|s| s.wrapping_add(1)));

        let mut frozen = agent.clone();
        frozen.set_learning(false);
        frozen.set_epsilon(0.0);

        let validation_config = TrialConfig {
            trials: args.validation_trials,
            seed: validation_seed,
        };
        let mut validation_pipeline = TrialPipeline::new(validation_config);
        if !args.no_progress {
            validation_pipeline =
                validation_pipeline.with_observer(Box::new(ProgressObserver::new()));
        }

        let mut validation_world = TrafficWorld::new(args.world.to_config(validation_seed))?;
        let validation_result = validation_pipeline.run(&mut frozen, &mut validation_world)?;

        println!("\n=== Validation Results ===");
        println!(
            "Successes: {} / {} ({:.1}%)",
            validation_result.successes,
            validation_result.total_trials,
            validation_result.success_rate * 100.0
        );
        println!(
            "Penalty rate: {:.3} per move",
            validation_result.penalty_rate
        );
        println!("Mean net reward: {:.2}", validation_result.mean_net_reward);

        Some(validation_result)
    } else {
        None
    };

    // Export per-trial records if requested
    if let Some(csv_path) = &args.export_csv {
        let written = TrialCsvExporter::export(&result.records, csv_path)?;
        println!("\n✓ Exported {} trial(s) to {}", written, csv_path.display());
    }

    // Save agent if output path provided
    if let Some(output_path) = &args.output {
        let metadata = TrainingMetadata {
            trials_trained: Some(result.total_trials),
            world: Some(world_config),
            seed: args.seed,
        };
        let saved = SavedAgent::from_agent(&agent, metadata);
        saved.save_to_file(output_path)?;
        println!("\n✓ Agent saved to: {}", output_path.display());
        println!("  Algorithm: Q-learning");
        println!("  Stored Q-values: {}", agent.q_table_size());
    }

    // Write summary JSON if requested
    if let Some((summary_path, normalized)) = summary_spec {
        if normalized {
            println!(
                "\n⚠️  Normalizing summary path to {}",
                summary_path.display()
            );
        }

        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: SummaryStats::from(&result),
            validation: validation_result.as_ref().map(SummaryStats::from),
            q_table_size: agent.q_table_size(),
            metadata: SummaryMetadata {
                learning_rate: args.learning_rate,
                discount_factor: args.discount,
                epsilon: args.epsilon,
                default_q: args.default_q,
                grid: format!("{}x{}", args.world.grid_width, args.world.grid_height),
                dummies: args.world.dummies,
                enforce_deadline: !args.world.no_enforce_deadline,
                seed: args.seed,
            },
        };

        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
