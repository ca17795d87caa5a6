//! Error types for the rejection sampling engine.
//!
//! [`ConfigError`] covers invalid engine configuration detected at build
//! time; [`SamplingError`] covers everything a single sampling call can
//! report, including the partial-result conditions.

use std::time::Duration;

use thiserror::Error;

/// Configuration error for the sampling engine.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Batch size outside valid range [1, 1_000_000].
    #[error("Invalid batch size {0}: must be in range [1, 1_000_000]")]
    InvalidBatchSize(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

/// Error returned by a sampling call.
///
/// Every variant that ends a call early carries the samples accepted so far,
/// so callers can still inspect or keep a partial result. A successful call
/// never returns fewer than the requested number of samples.
#[derive(Debug, Error)]
pub enum SamplingError {
    /// Invalid engine configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scale constant `k` is not a positive finite number.
    #[error("Invalid scale constant {0}: must be positive and finite")]
    InvalidScale(f64),

    /// Requested sample count is zero.
    #[error("Invalid sample count: at least one sample must be requested")]
    InvalidSampleCount,

    /// The proposal budget was spent before enough samples were accepted.
    #[error("Undersupplied: accepted {} of {requested} samples after {proposals} proposals", .partial.len())]
    Undersupplied {
        /// Requested sample count.
        requested: usize,
        /// Number of proposals evaluated.
        proposals: u64,
        /// Samples accepted before giving up.
        partial: Vec<f64>,
    },

    /// The per-call timeout elapsed before enough samples were accepted.
    #[error("Timed out after {elapsed:?}: accepted {} of {requested} samples", .partial.len())]
    TimedOut {
        /// Requested sample count.
        requested: usize,
        /// Wall-clock time spent in the call.
        elapsed: Duration,
        /// Samples accepted before the timeout.
        partial: Vec<f64>,
    },

    /// A worker thread panicked (typically inside a user callback).
    #[error("Sampling worker '{0}' panicked")]
    WorkerPanicked(&'static str),
}

impl SamplingError {
    /// Returns the partially accepted samples, if this error carries any.
    pub fn partial_samples(&self) -> Option<&[f64]> {
        match self {
            Self::Undersupplied { partial, .. } | Self::TimedOut { partial, .. } => {
                Some(partial.as_slice())
            }
            _ => None,
        }
    }

    /// Consumes the error, returning the partially accepted samples.
    pub fn into_partial_samples(self) -> Option<Vec<f64>> {
        match self {
            Self::Undersupplied { partial, .. } | Self::TimedOut { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
