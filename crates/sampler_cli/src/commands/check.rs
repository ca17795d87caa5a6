//! Check command implementation
//!
//! Validates the effective settings and runs a short smoke test through the
//! engine with them.

use std::io::{self, Write};
use std::path::Path;

use sampler_engine::RejectionSampler;
use tracing::{error, info};

use crate::output::write_table;
use crate::presets::Preset;
use crate::settings::Settings;
use crate::Result;

/// Samples drawn by the smoke test.
const SMOKE_TEST_SAMPLES: usize = 1_000;

/// Run the check command
pub fn run(settings: &Settings, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        info!("Using settings file {}", config_path.display());
    } else {
        info!("No settings file at {}; using defaults", config_path.display());
    }

    let mut stdout = io::stdout().lock();
    check(&mut stdout, settings)
}

fn check(out: &mut impl Write, settings: &Settings) -> Result<()> {
    let optional = |value: Option<u64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());
    let rows = [
        ("batch_size", settings.batch_size.to_string()),
        ("backend", settings.backend.clone()),
        ("uniform_mode", settings.uniform_mode.clone()),
        ("seed", optional(settings.seed)),
        ("timeout_ms", optional(settings.timeout_ms)),
        ("max_proposals", optional(settings.max_proposals)),
        ("check_majorization", settings.check_majorization.to_string()),
        ("log_level", settings.log_level.clone()),
        ("format", settings.format.clone()),
    ];
    write_table(out, &rows)?;

    let config = match settings.to_sampler_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Settings are invalid: {}", e);
            return Err(e.into());
        }
    };
    writeln!(out, "✓ Settings valid")?;

    let report = RejectionSampler::new(config)
        .sample(&Preset::Uniform.problem()?, SMOKE_TEST_SAMPLES)?;
    writeln!(
        out,
        "✓ Engine smoke test passed ({} samples in {:.2} ms)",
        report.samples.len(),
        report.elapsed.as_secs_f64() * 1_000.0
    )?;
    Ok(())
}
