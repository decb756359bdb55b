//! # spar_cli
//!
//! Command-line front end for `spar_core`: run a spar model into JSON and
//! CSV reports, check a model without running it, or write a sample model.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Front spar margin-of-safety checks
#[derive(Parser)]
#[command(name = "spar_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Front spar margin-of-safety calculator", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a model and write reports
    Run(commands::run::RunArgs),
    /// Validate a model file
    Check(commands::check::CheckArgs),
    /// Write a sample model file
    Sample(commands::sample::SampleArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Check(args) => commands::check::execute(args),
        Commands::Sample(args) => commands::sample::execute(args),
    }
}
