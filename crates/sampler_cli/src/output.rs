//! Rendering of sampling results.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use sampler_engine::SamplingReport;
use serde::Serialize;

use crate::error::{CliError, Result};
use crate::presets::Preset;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary table
    Table,
    /// Summary and samples as one JSON document
    Json,
    /// One sample per line with a header
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(CliError::invalid_argument(format!(
                "Unknown format: {}. Supported: json, csv, table",
                other
            ))),
        }
    }
}

/// Serialisable view of a completed sampling call
#[derive(Debug, Serialize)]
pub struct SampleSummary<'a> {
    /// Preset name
    pub preset: &'static str,
    /// Seed used for the call
    pub seed: u64,
    /// Number of samples returned
    pub samples_returned: usize,
    /// Proposals evaluated by the consumer
    pub proposals: u64,
    /// Accepted over evaluated proposals
    pub acceptance_rate: f64,
    /// Expected acceptance probability of the preset
    pub expected_acceptance: f64,
    /// Sample mean
    pub mean: f64,
    /// Mean of the target distribution
    pub expected_mean: f64,
    /// Largest queue length observed
    pub peak_queue_len: usize,
    /// Ratios above one seen by the majorisation check
    pub majorization_violations: u64,
    /// Wall-clock time in milliseconds
    pub elapsed_ms: f64,
    /// Accepted samples; omitted from the table view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<&'a [f64]>,
}

impl<'a> SampleSummary<'a> {
    /// Summarises `report` for `preset`, optionally including the samples.
    pub fn new(preset: Preset, report: &'a SamplingReport, include_samples: bool) -> Self {
        let n = report.samples.len();
        let mean = if n == 0 {
            0.0
        } else {
            report.samples.iter().sum::<f64>() / n as f64
        };

        Self {
            preset: preset.name(),
            seed: report.seed,
            samples_returned: n,
            proposals: report.consumer.proposals,
            acceptance_rate: report.acceptance_rate(),
            expected_acceptance: preset.acceptance_probability(),
            mean,
            expected_mean: preset.mean(),
            peak_queue_len: report.queue.peak_len,
            majorization_violations: report.consumer.majorization_violations,
            elapsed_ms: report.elapsed.as_secs_f64() * 1_000.0,
            samples: include_samples.then_some(report.samples.as_slice()),
        }
    }
}

/// Writes `report` to `out` in the requested format.
pub fn render_report(
    out: &mut impl Write,
    preset: Preset,
    report: &SamplingReport,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let summary = SampleSummary::new(preset, report, false);
            let rows = [
                ("Preset", summary.preset.to_string()),
                ("Seed", summary.seed.to_string()),
                ("Samples", summary.samples_returned.to_string()),
                ("Proposals", summary.proposals.to_string()),
                (
                    "Acceptance",
                    format!(
                        "{:.4} (expected {:.4})",
                        summary.acceptance_rate, summary.expected_acceptance
                    ),
                ),
                (
                    "Mean",
                    format!("{:.4} (expected {:.4})", summary.mean, summary.expected_mean),
                ),
                ("Peak queue", summary.peak_queue_len.to_string()),
                ("Violations", summary.majorization_violations.to_string()),
                ("Elapsed", format!("{:.2} ms", summary.elapsed_ms)),
            ];
            write_table(out, &rows)?;
        }
        OutputFormat::Json => {
            let summary = SampleSummary::new(preset, report, true);
            serde_json::to_writer_pretty(&mut *out, &summary)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "index,value")?;
            for (i, x) in report.samples.iter().enumerate() {
                writeln!(out, "{},{}", i, x)?;
            }
        }
    }
    Ok(())
}

/// Writes a two-column box table.
pub fn write_table(out: &mut impl Write, rows: &[(&str, String)]) -> Result<()> {
    let key_width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);
    let bar = |left: &str, mid: &str, right: &str| {
        format!(
            "{}{}{}{}{}",
            left,
            "─".repeat(key_width + 2),
            mid,
            "─".repeat(value_width + 2),
            right
        )
    };

    writeln!(out, "{}", bar("┌", "┬", "┐"))?;
    for (key, value) in rows {
        writeln!(
            out,
            "│ {:<kw$} │ {:<vw$} │",
            key,
            value,
            kw = key_width,
            vw = value_width
        )?;
    }
    writeln!(out, "{}", bar("└", "┴", "┘"))?;
    Ok(())
}
