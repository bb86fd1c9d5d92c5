//! Waymark CLI - documentation site navigation.
//!
//! Provides commands for:
//! - `check`: Validate configuration and sidebar against the content
//! - `nav`: Print the resolved sidebar
//! - `build`: Write the site manifest for the renderer
//! - `theme init` / `theme script`: Theme preference bootstrap

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, NavArgs, ThemeCommand};
use output::Output;

/// Waymark - documentation site navigation.
#[derive(Parser)]
#[command(name = "wm", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and resolve every sidebar.
    Check(CheckArgs),
    /// Print the resolved sidebar as a tree.
    Nav(NavArgs),
    /// Write the site manifest JSON.
    Build(BuildArgs),
    /// Theme preference commands.
    #[command(subcommand)]
    Theme(ThemeCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Nav(args) => args.execute(),
        Commands::Build(args) => args.execute(),
        Commands::Theme(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
