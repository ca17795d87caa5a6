//! Sampling engine configuration.
//!
//! This module provides configuration types and builders for the concurrent
//! rejection sampling engine.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::error::ConfigError;

/// Default number of proposals moved through the queue per batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Maximum batch size allowed.
pub const MAX_BATCH_SIZE: usize = 1_000_000;

/// Synchronisation backend for the shared sample queue.
///
/// Both backends implement the same blocking contract; they differ only in
/// how a worker waits.
///
/// - `Condvar`: parks on a condition variable; no CPU use while waiting
/// - `Spin`: busy-waits with bounded backoff; lowest wake-up latency
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QueueBackend {
    /// Mutex + condition variable (wait/notify).
    #[default]
    Condvar,

    /// Busy-spin with exponential backoff that yields to the scheduler.
    ///
    /// Use when wait latency dominates and two cores can be dedicated.
    Spin,
}

impl fmt::Display for QueueBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Condvar => write!(f, "condvar"),
            Self::Spin => write!(f, "spin"),
        }
    }
}

impl FromStr for QueueBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "condvar" => Ok(Self::Condvar),
            "spin" => Ok(Self::Spin),
            other => Err(ConfigError::InvalidParameter {
                name: "backend",
                value: format!("unknown backend '{}', expected condvar or spin", other),
            }),
        }
    }
}

/// How uniform variates are supplied to the two workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UniformMode {
    /// One independent stream per worker, both derived from the call seed.
    #[default]
    PerWorker,

    /// One generator shared by both workers behind a lock.
    Shared,
}

impl fmt::Display for UniformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerWorker => write!(f, "per-worker"),
            Self::Shared => write!(f, "shared"),
        }
    }
}

impl FromStr for UniformMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per-worker" | "per_worker" => Ok(Self::PerWorker),
            "shared" => Ok(Self::Shared),
            other => Err(ConfigError::InvalidParameter {
                name: "uniform_mode",
                value: format!("unknown uniform mode '{}', expected per-worker or shared", other),
            }),
        }
    }
}

/// Sampling engine configuration.
///
/// Immutable configuration for one or more sampling calls.
/// Use [`SamplerConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use sampler_engine::{QueueBackend, SamplerConfig};
///
/// let config = SamplerConfig::builder()
///     .batch_size(500)
///     .backend(QueueBackend::Spin)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.batch_size(), 500);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug)]
pub struct SamplerConfig {
    /// Batch threshold `B` of the shared queue.
    batch_size: usize,
    /// Queue synchronisation backend.
    backend: QueueBackend,
    /// Uniform source arrangement.
    uniform_mode: UniformMode,
    /// Optional seed for reproducibility.
    seed: Option<u64>,
    /// Optional wall-clock limit per call.
    timeout: Option<Duration>,
    /// Optional limit on evaluated proposals per call.
    max_proposals: Option<u64>,
    /// Count acceptance ratios above one.
    check_majorization: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            backend: QueueBackend::default(),
            uniform_mode: UniformMode::default(),
            seed: None,
            timeout: None,
            max_proposals: None,
            check_majorization: cfg!(debug_assertions),
        }
    }
}

impl SamplerConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SamplerConfigBuilder {
        SamplerConfigBuilder::default()
    }

    /// Returns the queue batch threshold.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the queue synchronisation backend.
    #[inline]
    pub fn backend(&self) -> QueueBackend {
        self.backend
    }

    /// Returns the uniform source arrangement.
    #[inline]
    pub fn uniform_mode(&self) -> UniformMode {
        self.uniform_mode
    }

    /// Returns the optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the optional per-call timeout.
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the optional proposal budget.
    #[inline]
    pub fn max_proposals(&self) -> Option<u64> {
        self.max_proposals
    }

    /// Returns whether acceptance ratios above one are counted.
    #[inline]
    pub fn check_majorization(&self) -> bool {
        self.check_majorization
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `batch_size` is 0 or greater than 1,000,000
    /// - `timeout` is zero
    /// - `max_proposals` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::InvalidParameter {
                name: "timeout",
                value: "must be non-zero".to_string(),
            });
        }
        if self.max_proposals == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_proposals",
                value: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`SamplerConfig`].
///
/// Unset fields keep their defaults; validation happens in [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct SamplerConfigBuilder {
    config: SamplerConfig,
}

impl SamplerConfigBuilder {
    /// Sets the queue batch threshold.
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Batch size in [1, 1_000_000]
    #[inline]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Sets the queue synchronisation backend.
    #[inline]
    pub fn backend(mut self, backend: QueueBackend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Sets the uniform source arrangement.
    #[inline]
    pub fn uniform_mode(mut self, uniform_mode: UniformMode) -> Self {
        self.config.uniform_mode = uniform_mode;
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Sets a wall-clock limit for each call.
    ///
    /// A limit too large to add to the current time (such as
    /// `Duration::MAX`) means no limit.
    #[inline]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Sets a limit on the proposals evaluated per call.
    #[inline]
    pub fn max_proposals(mut self, max_proposals: u64) -> Self {
        self.config.max_proposals = Some(max_proposals);
        self
    }

    /// Enables or disables counting of acceptance ratios above one.
    #[inline]
    pub fn check_majorization(mut self, enabled: bool) -> Self {
        self.config.check_majorization = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any field is out of range.
    pub fn build(self) -> Result<SamplerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = SamplerConfig::builder().build().unwrap();

        assert_eq!(config.batch_size(), DEFAULT_BATCH_SIZE);
        assert_eq!(config.backend(), QueueBackend::Condvar);
        assert_eq!(config.uniform_mode(), UniformMode::PerWorker);
        assert_eq!(config.seed(), None);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.max_proposals(), None);
        assert_eq!(config.check_majorization(), cfg!(debug_assertions));
    }

    #[test]
    fn test_config_builder_all_fields() {
        let config = SamplerConfig::builder()
            .batch_size(1)
            .backend(QueueBackend::Spin)
            .uniform_mode(UniformMode::Shared)
            .seed(7)
            .timeout(Duration::from_secs(2))
            .max_proposals(10_000)
            .check_majorization(true)
            .build()
            .unwrap();

        assert_eq!(config.batch_size(), 1);
        assert_eq!(config.backend(), QueueBackend::Spin);
        assert_eq!(config.uniform_mode(), UniformMode::Shared);
        assert_eq!(config.seed(), Some(7));
        assert_eq!(config.timeout(), Some(Duration::from_secs(2)));
        assert_eq!(config.max_proposals(), Some(10_000));
        assert!(config.check_majorization());
    }

    #[test]
    fn test_config_invalid_zero_batch() {
        let result = SamplerConfig::builder().batch_size(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidBatchSize(0))));
    }

    #[test]
    fn test_config_invalid_too_large_batch() {
        let result = SamplerConfig::builder()
            .batch_size(MAX_BATCH_SIZE + 1)
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidBatchSize(_))));
    }

    #[test]
    fn test_config_invalid_zero_timeout() {
        let result = SamplerConfig::builder().timeout(Duration::ZERO).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "timeout",
                ..
            })
        ));
    }

    #[test]
    fn test_config_invalid_zero_budget() {
        let result = SamplerConfig::builder().max_proposals(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "max_proposals",
                ..
            })
        ));
    }

    #[test]
    fn test_backend_parse_and_display() {
        assert_eq!("condvar".parse::<QueueBackend>(), Ok(QueueBackend::Condvar));
        assert_eq!("SPIN".parse::<QueueBackend>(), Ok(QueueBackend::Spin));
        assert!("futex".parse::<QueueBackend>().is_err());
        assert_eq!(QueueBackend::Spin.to_string(), "spin");
    }

    #[test]
    fn test_uniform_mode_parse_and_display() {
        assert_eq!("shared".parse::<UniformMode>(), Ok(UniformMode::Shared));
        assert_eq!("per_worker".parse::<UniformMode>(), Ok(UniformMode::PerWorker));
        assert!("global".parse::<UniformMode>().is_err());
        assert_eq!(UniformMode::PerWorker.to_string(), "per-worker");
    }
}
