//! Scenario replay CLI
//!
//! Usage:
//!   animere-replay page.json          # Print a text report
//!   animere-replay page.json --json   # Print the report as JSON

use std::path::PathBuf;

use animere_replay::{Scenario, ScenarioRunner};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "animere-replay")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Replay Animere scenarios against a headless document", long_about = None)]
struct Cli {
    /// Scenario file
    scenario: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let scenario = Scenario::from_path(&cli.scenario)
        .with_context(|| format!("Failed to load {}", cli.scenario.display()))?;

    let report = ScenarioRunner::new(scenario)?.run()?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report);
    }
    Ok(())
}
