//! Smartcab CLI - Q-learning toolkit for the grid-city driving task
//!
//! This CLI provides a unified interface for:
//! - Training a Q-learning driving agent
//! - Evaluating saved agents on fresh trials
//! - Comparing drivers side-by-side

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "smartcab")]
#[command(version, about = "Q-learning driving agent toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning driving agent
    Train(Box<smartcab::cli::commands::train::TrainArgs>),

    /// Evaluate a saved agent on fresh trials
    Evaluate(smartcab::cli::commands::evaluate::EvaluateArgs),

    /// Compare multiple drivers side-by-side
    Compare(smartcab::cli::commands::compare::CompareArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => smartcab::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => smartcab::cli::commands::evaluate::execute(args),
        Commands::Compare(args) => smartcab::cli::commands::compare::execute(args),
    }
}
