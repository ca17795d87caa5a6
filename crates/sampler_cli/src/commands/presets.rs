//! Presets command implementation
//!
//! Lists the built-in sampling problems.

use std::io::{self, Write};

use serde::Serialize;

use crate::output::{write_table, OutputFormat};
use crate::presets::Preset;
use crate::Result;

#[derive(Serialize)]
struct PresetInfo {
    name: &'static str,
    description: &'static str,
    scale: f64,
    mean: f64,
    acceptance_probability: f64,
}

impl From<Preset> for PresetInfo {
    fn from(preset: Preset) -> Self {
        Self {
            name: preset.name(),
            description: preset.description(),
            scale: preset.scale(),
            mean: preset.mean(),
            acceptance_probability: preset.acceptance_probability(),
        }
    }
}

/// Run the presets command
pub fn run(format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let mut stdout = io::stdout().lock();
    write_presets(&mut stdout, format)
}

fn write_presets(out: &mut impl Write, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<(&str, String)> = Preset::ALL
                .iter()
                .map(|p| (p.name(), p.description().to_string()))
                .collect();
            write_table(out, &rows)?;
        }
        OutputFormat::Json => {
            let infos: Vec<PresetInfo> = Preset::ALL.into_iter().map(PresetInfo::from).collect();
            serde_json::to_writer_pretty(&mut *out, &infos)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "name,scale,mean,acceptance_probability")?;
            for info in Preset::ALL.into_iter().map(PresetInfo::from) {
                writeln!(
                    out,
                    "{},{},{},{}",
                    info.name, info.scale, info.mean, info.acceptance_probability
                )?;
            }
        }
    }
    Ok(())
}
