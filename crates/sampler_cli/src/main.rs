//! rsample - Command Line Front End for the Rejection Sampling Engine
//!
//! Draws samples from built-in univariate problems through the concurrent
//! producer/consumer engine in `sampler_engine`.
//!
//! # Commands
//!
//! - `rsample sample --preset <name> -n <count>` - Draw samples
//! - `rsample presets` - List the built-in problems
//! - `rsample check` - Validate settings and smoke-test the engine
//!
//! # Settings
//!
//! Settings come from `rsample.toml` (or `--config <file>`) when present,
//! then `RSAMPLE_*` environment variables, then command-line flags.
//! Logs go to stderr; `RUST_LOG` takes precedence over `log_level` and
//! `--verbose`.

use std::path::Path;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;
mod output;
mod presets;
mod settings;

pub use error::{CliError, Result};

use commands::sample::SampleArgs;
use settings::Settings;

/// Rejection sampling CLI
#[derive(Parser)]
#[command(name = "rsample")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file path
    #[arg(short, long, global = true, default_value = "rsample.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw samples from a built-in problem
    Sample(SampleArgs),

    /// List the built-in problems
    Presets {
        /// Output format (json, csv, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Validate settings and run an engine smoke test
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = Path::new(&cli.config);
    let settings = Settings::load_or_default(config_path)?.with_env_override()?;

    // Initialise tracing
    let default_level = if cli.verbose {
        "debug"
    } else {
        settings.log_level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    debug!(?settings, "Effective settings");

    match cli.command {
        Commands::Sample(args) => commands::sample::run(settings, &args),
        Commands::Presets { format } => commands::presets::run(&format),
        Commands::Check => commands::check::run(&settings, config_path),
    }
}
