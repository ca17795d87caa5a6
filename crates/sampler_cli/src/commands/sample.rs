//! Sample command implementation
//!
//! Draws samples from a built-in problem and writes them in the requested
//! format, to stdout or a file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use sampler_engine::RejectionSampler;
use tracing::{info, warn};

use crate::output::{render_report, OutputFormat};
use crate::presets::Preset;
use crate::settings::Settings;
use crate::Result;

/// Arguments of `rsample sample`; unset flags fall back to the settings.
#[derive(Debug, Clone, Args)]
pub struct SampleArgs {
    /// Built-in problem (see `rsample presets`)
    #[arg(short, long, default_value = "uniform")]
    pub preset: String,

    /// Number of samples to draw
    #[arg(short = 'n', long, default_value = "1000")]
    pub count: usize,

    /// Proposals per queue batch
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Queue backend (condvar, spin)
    #[arg(long)]
    pub backend: Option<String>,

    /// Uniform supply (per-worker, shared)
    #[arg(long)]
    pub uniform_mode: Option<String>,

    /// Seed for reproducible output
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Per-call timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Proposal budget
    #[arg(long)]
    pub max_proposals: Option<u64>,

    /// Output format (table, json, csv)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SampleArgs {
    /// Overlays the flags that were given on top of `settings`.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(batch_size) = self.batch_size {
            settings.batch_size = batch_size;
        }
        if let Some(backend) = &self.backend {
            settings.backend = backend.clone();
        }
        if let Some(uniform_mode) = &self.uniform_mode {
            settings.uniform_mode = uniform_mode.clone();
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.timeout_ms.is_some() {
            settings.timeout_ms = self.timeout_ms;
        }
        if self.max_proposals.is_some() {
            settings.max_proposals = self.max_proposals;
        }
        if let Some(format) = &self.format {
            settings.format = format.clone();
        }
        settings
    }
}

/// Run the sample command
pub fn run(settings: Settings, args: &SampleArgs) -> Result<()> {
    let preset: Preset = args.preset.parse()?;
    let settings = args.apply(settings);
    let config = settings.to_sampler_config()?;
    let format: OutputFormat = settings.format.parse()?;

    info!("Starting sampling...");
    info!("  Preset: {} ({})", preset, preset.description());
    info!("  Samples: {}", args.count);
    info!("  Backend: {}, batch size {}", config.backend(), config.batch_size());

    let problem = preset.problem()?;
    let report = match RejectionSampler::new(config).sample(&problem, args.count) {
        Ok(report) => report,
        Err(err) => {
            if let Some(partial) = err.partial_samples() {
                warn!(
                    accepted = partial.len(),
                    requested = args.count,
                    "Discarding partial result"
                );
            }
            return Err(err.into());
        }
    };

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            render_report(&mut writer, preset, &report, format)?;
            writer.flush()?;
            info!("Output written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            render_report(&mut stdout, preset, &report, format)?;
        }
    }

    info!(
        "Sampling complete in {:.2} ms",
        report.elapsed.as_secs_f64() * 1_000.0
    );
    Ok(())
}
