//! Error types for the rsample CLI.

use sampler_engine::{ConfigError, SamplingError};
use thiserror::Error;

use crate::settings::SettingsError;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings file or environment override problem
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Engine configuration rejected by the builder
    #[error("Engine configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sampling call failed or returned a partial result
    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),

    /// Invalid command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialisation error
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}

impl CliError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::invalid_argument("unknown preset 'gamma'");
        assert!(err.to_string().contains("unknown preset 'gamma'"));
    }

    #[test]
    fn test_sampling_error_converts() {
        let err: CliError = SamplingError::InvalidSampleCount.into();
        assert!(matches!(err, CliError::Sampling(SamplingError::InvalidSampleCount)));
        assert!(err.to_string().starts_with("Sampling error"));
    }
}
