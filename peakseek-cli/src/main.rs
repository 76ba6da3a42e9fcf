//! Peakseek CLI - Command-line interface
//!
//! This binary provides a command-line interface to the peakseek library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::ring::RingArgs;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "peakseek")]
#[command(about = "Drive an agent to a local maximum of an elevation field", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a search against a simulated elevation field
    Run(RunArgs),

    /// Print the candidate ring the search probes around a position
    Ring(RingArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Ring(args) => commands::ring::run(args),
    };

    if let Err(e) = result {
        e.exit();
    }
}
