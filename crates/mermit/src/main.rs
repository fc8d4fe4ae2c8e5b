//! Mermit CLI - Extract and render mermaid diagrams from markdown.
//!
//! Provides commands for:
//! - `generate`: Extract diagrams and render them to image files
//! - `scan`: List diagrams without rendering anything
//! - `clean`: Remove generated artifacts

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CleanArgs, GenerateArgs, ScanArgs};
use output::Output;

/// Mermit - mermaid diagrams out of markdown.
#[derive(Parser)]
#[command(name = "mermit", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract diagrams and render them to image files.
    Generate(GenerateArgs),
    /// List diagrams without rendering anything.
    Scan(ScanArgs),
    /// Remove generated artifacts.
    Clean(CleanArgs),
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let output = Output::new();

    let result = match cli.command {
        Commands::Generate(args) => args.execute(),
        Commands::Scan(args) => args.execute(),
        Commands::Clean(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
