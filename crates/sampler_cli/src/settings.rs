//! CLI settings management.
//!
//! Settings are read from an optional TOML file, then overridden by
//! `RSAMPLE_*` environment variables, then by command-line flags. The
//! result is validated as a whole and turned into a [`SamplerConfig`].

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sampler_engine::{
    QueueBackend, SamplerConfig, UniformMode, DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::output::OutputFormat;

/// Prefix shared by all environment overrides.
pub const ENV_PREFIX: &str = "RSAMPLE_";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Effective CLI settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Proposals per queue batch
    pub batch_size: usize,

    /// Queue backend (`condvar` or `spin`)
    pub backend: String,

    /// Uniform supply (`per-worker` or `shared`)
    pub uniform_mode: String,

    /// Fixed seed; fresh entropy per call when absent
    pub seed: Option<u64>,

    /// Per-call timeout in milliseconds
    pub timeout_ms: Option<u64>,

    /// Proposal budget per call
    pub max_proposals: Option<u64>,

    /// Count acceptance ratios above one
    pub check_majorization: bool,

    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,

    /// Output format (`table`, `json` or `csv`)
    pub format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            backend: QueueBackend::default().to_string(),
            uniform_mode: UniformMode::default().to_string(),
            seed: None,
            timeout_ms: None,
            max_proposals: None,
            check_majorization: true,
            log_level: "info".to_string(),
            format: "table".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from `path` if it exists, otherwise use defaults.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `RSAMPLE_*` environment variable overrides
    pub fn with_env_override(self) -> Result<Self, SettingsError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by the full variable name.
    ///
    /// Values that fail to parse are collected and reported together.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let mut errors = Vec::new();

        if let Some(batch_size) = parse_var(&var, "BATCH_SIZE", &mut errors) {
            self.batch_size = batch_size;
        }
        if let Some(value) = var("BACKEND") {
            self.backend = value;
        }
        if let Some(value) = var("UNIFORM_MODE") {
            self.uniform_mode = value;
        }
        if let Some(seed) = parse_var(&var, "SEED", &mut errors) {
            self.seed = Some(seed);
        }
        if let Some(timeout_ms) = parse_var(&var, "TIMEOUT_MS", &mut errors) {
            self.timeout_ms = Some(timeout_ms);
        }
        if let Some(max_proposals) = parse_var(&var, "MAX_PROPOSALS", &mut errors) {
            self.max_proposals = Some(max_proposals);
        }
        if let Some(value) = var("CHECK_MAJORIZATION") {
            match value.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.check_majorization = true,
                "0" | "false" | "no" => self.check_majorization = false,
                _ => errors.push(format!(
                    "{}CHECK_MAJORIZATION '{}' is not a boolean",
                    ENV_PREFIX, value
                )),
            }
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = var("FORMAT") {
            self.format = value;
        }

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(SettingsError::Validation(errors))
        }
    }

    /// Validate the settings, reporting every problem found
    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut errors = Vec::new();

        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            errors.push(format!(
                "batch_size {} outside range [1, {}]",
                self.batch_size, MAX_BATCH_SIZE
            ));
        }
        if let Err(e) = self.backend.parse::<QueueBackend>() {
            errors.push(e.to_string());
        }
        if let Err(e) = self.uniform_mode.parse::<UniformMode>() {
            errors.push(e.to_string());
        }
        if self.timeout_ms == Some(0) {
            errors.push("timeout_ms must be greater than 0".to_string());
        }
        if self.max_proposals == Some(0) {
            errors.push("max_proposals must be greater than 0".to_string());
        }
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }
        if let Err(e) = self.format.parse::<OutputFormat>() {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SettingsError::Validation(errors))
        }
    }

    /// Validate and convert into an engine configuration
    pub fn to_sampler_config(&self) -> Result<SamplerConfig, SettingsError> {
        self.validate()?;

        let mut builder = SamplerConfig::builder()
            .batch_size(self.batch_size)
            .check_majorization(self.check_majorization);
        // Both parses succeeded in `validate`.
        if let Ok(backend) = self.backend.parse() {
            builder = builder.backend(backend);
        }
        if let Ok(uniform_mode) = self.uniform_mode.parse() {
            builder = builder.uniform_mode(uniform_mode);
        }
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        if let Some(max_proposals) = self.max_proposals {
            builder = builder.max_proposals(max_proposals);
        }

        builder
            .build()
            .map_err(|e| SettingsError::Validation(vec![e.to_string()]))
    }
}

/// Reads and parses one override, recording a message when it does not parse.
fn parse_var<T: FromStr>(
    var: impl Fn(&str) -> Option<String>,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<T> {
    let value = var(name)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(format!("{}{} '{}' is not a valid number", ENV_PREFIX, name, value));
            None
        }
    }
}

/// Settings error type
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// Settings file path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for [`Settings`]
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// One or more settings are invalid
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
