//! Orchestrator: one call, one context, two workers.
//!
//! ```text
//! RejectionSampler::sample
//! ├── SamplingContext   (queue + signal, gate, problem; per call)
//! ├── SamplerRng        (per-call seed → producer / consumer streams)
//! └── std::thread::scope
//!     ├── run_producer  (uniforms → proposals → push_batch)
//!     ├── run_consumer  (pop_batch → accept/reject → output)
//!     └── timeout watchdog on the calling thread (optional)
//! ```

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::{QueueBackend, SamplerConfig, UniformMode};
use crate::consumer::{run_consumer, ConsumerOutcome, ConsumerStats};
use crate::context::{SamplingContext, WorkerGuard};
use crate::error::SamplingError;
use crate::gate::{ExclusiveGate, NoopGate};
use crate::problem::{RejectionProblem, SamplingProblem};
use crate::producer::{run_producer, ProducerStats};
use crate::queue::{BatchQueue, CondvarQueue, QueueStats, SpinQueue};
use crate::rng::{SamplerRng, SharedUniform, UniformSource};
use crate::signal::TerminationReason;

/// Result of a successful sampling call.
#[derive(Clone, Debug)]
pub struct SamplingReport {
    /// Exactly the requested number of accepted samples, in acceptance order.
    pub samples: Vec<f64>,
    /// Seed the per-call generator was initialised with.
    pub seed: u64,
    /// Producer counters.
    pub producer: ProducerStats,
    /// Consumer counters.
    pub consumer: ConsumerStats,
    /// Queue traffic counters.
    pub queue: QueueStats,
    /// Wall-clock duration of the call.
    pub elapsed: Duration,
}

impl SamplingReport {
    /// Fraction of evaluated proposals that were accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.consumer.proposals == 0 {
            0.0
        } else {
            self.consumer.accepted as f64 / self.consumer.proposals as f64
        }
    }

    /// Consumes the report, returning the samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// Concurrent rejection sampler.
///
/// Every call to [`sample`](Self::sample) builds a fresh queue, termination
/// signal and random state, runs the producer and consumer on two scoped
/// threads and joins both before returning. Calls on the same sampler may
/// run concurrently; they share only the configuration and the gate.
///
/// # Examples
///
/// ```rust
/// use sampler_engine::{RejectionProblem, RejectionSampler, SamplerConfig};
///
/// let config = SamplerConfig::builder()
///     .batch_size(64)
///     .seed(42)
///     .build()
///     .unwrap();
/// let sampler = RejectionSampler::new(config);
///
/// // Beta(2, 2) under a uniform proposal.
/// let problem = RejectionProblem::new(
///     |x: f64| 6.0 * x * (1.0 - x),
///     |_x: f64| 1.0,
///     |u: f64| u,
///     1.5,
/// )
/// .unwrap();
///
/// let report = sampler.sample(&problem, 1_000).unwrap();
/// assert_eq!(report.samples.len(), 1_000);
/// assert!(report.samples.iter().all(|x| (0.0..1.0).contains(x)));
/// ```
#[derive(Debug, Default)]
pub struct RejectionSampler<Gt = NoopGate> {
    config: SamplerConfig,
    gate: Gt,
}

impl RejectionSampler<NoopGate> {
    /// Creates a sampler with the no-op gate.
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            gate: NoopGate,
        }
    }
}

impl<Gt: ExclusiveGate> RejectionSampler<Gt> {
    /// Replaces the exclusive-call gate.
    pub fn with_gate<H: ExclusiveGate>(self, gate: H) -> RejectionSampler<H> {
        RejectionSampler {
            config: self.config,
            gate,
        }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Returns the exclusive-call gate.
    #[inline]
    pub fn gate(&self) -> &Gt {
        &self.gate
    }

    /// Draws `n` samples from `problem`.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::InvalidSampleCount`] if `n` is zero
    /// - [`SamplingError::Config`] if the configuration is invalid
    /// - [`SamplingError::Undersupplied`] if the proposal budget ran out
    /// - [`SamplingError::TimedOut`] if the timeout elapsed
    /// - [`SamplingError::WorkerPanicked`] if a callback panicked
    pub fn sample<P: SamplingProblem>(
        &self,
        problem: &P,
        n: usize,
    ) -> Result<SamplingReport, SamplingError> {
        if n == 0 {
            return Err(SamplingError::InvalidSampleCount);
        }
        self.config.validate()?;

        let rng = match self.config.seed() {
            Some(seed) => SamplerRng::from_seed(seed),
            None => SamplerRng::from_entropy(),
        };
        let batch_size = self.config.batch_size();
        debug!(
            n,
            batch_size,
            backend = %self.config.backend(),
            uniform_mode = ?self.config.uniform_mode(),
            seed = rng.seed(),
            "starting rejection sampling"
        );

        match self.config.backend() {
            QueueBackend::Condvar => self.run(CondvarQueue::new(batch_size), problem, n, rng),
            QueueBackend::Spin => self.run(SpinQueue::new(batch_size), problem, n, rng),
        }
    }

    fn run<Q, P>(
        &self,
        queue: Q,
        problem: &P,
        n: usize,
        mut rng: SamplerRng,
    ) -> Result<SamplingReport, SamplingError>
    where
        Q: BatchQueue,
        P: SamplingProblem,
    {
        let seed = rng.seed();
        let ctx = SamplingContext::new(queue, &self.gate, problem, &self.config);
        let started = Instant::now();

        let (producer, consumer) = match self.config.uniform_mode() {
            UniformMode::PerWorker => {
                let producer_stream = rng.split();
                let consumer_stream = rng.split();
                self.execute(&ctx, producer_stream, consumer_stream, n, started)
            }
            UniformMode::Shared => {
                let shared = Mutex::new(rng);
                self.execute(
                    &ctx,
                    SharedUniform::new(&shared),
                    SharedUniform::new(&shared),
                    n,
                    started,
                )
            }
        };
        let elapsed = started.elapsed();

        let outcome = consumer.map_err(|_| SamplingError::WorkerPanicked("consumer"))?;
        let producer = producer.map_err(|_| SamplingError::WorkerPanicked("producer"))?;
        let ConsumerOutcome {
            samples,
            stats: consumer,
        } = outcome;

        if samples.len() == n {
            let report = SamplingReport {
                samples,
                seed,
                producer,
                consumer,
                queue: ctx.queue().stats(),
                elapsed,
            };
            debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                acceptance_rate = report.acceptance_rate(),
                "rejection sampling completed"
            );
            return Ok(report);
        }

        // Worker panics returned above; only timeout and budget remain.
        match ctx.queue().signal().reason() {
            Some(TerminationReason::TimedOut) => Err(SamplingError::TimedOut {
                requested: n,
                elapsed,
                partial: samples,
            }),
            _ => Err(SamplingError::Undersupplied {
                requested: n,
                proposals: consumer.proposals,
                partial: samples,
            }),
        }
    }

    /// Runs both workers to completion on scoped threads.
    fn execute<Q, P, U, V>(
        &self,
        ctx: &SamplingContext<'_, Q, Gt, P>,
        producer_uniforms: U,
        consumer_uniforms: V,
        n: usize,
        started: Instant,
    ) -> (thread::Result<ProducerStats>, thread::Result<ConsumerOutcome>)
    where
        Q: BatchQueue,
        P: SamplingProblem,
        U: UniformSource,
        V: UniformSource,
    {
        let orchestrator = thread::current();

        thread::scope(|s| {
            let producer = s.spawn(move || {
                let _guard = WorkerGuard::new(ctx.queue(), "producer");
                run_producer(ctx, producer_uniforms)
            });
            let consumer = s.spawn(move || {
                let _guard =
                    WorkerGuard::new(ctx.queue(), "consumer").notify_on_exit(orchestrator);
                run_consumer(ctx, consumer_uniforms, n)
            });

            // A deadline past the end of `Instant` is no deadline at all.
            let deadline = self
                .config
                .timeout()
                .and_then(|timeout| started.checked_add(timeout));
            if let Some(deadline) = deadline {
                while !consumer.is_finished() {
                    let now = Instant::now();
                    if now >= deadline {
                        if ctx.queue().terminate(TerminationReason::TimedOut) {
                            warn!(
                                elapsed_ms = now.duration_since(started).as_millis() as u64,
                                "sampling timed out"
                            );
                        }
                        break;
                    }
                    thread::park_timeout(deadline - now);
                }
            }

            let consumer = consumer.join();
            let producer = producer.join();
            (producer, consumer)
        })
    }
}

/// Draws `n` samples from the density proportional to `target`.
///
/// Uses the default configuration: batch size 100, condition-variable
/// queue, independent per-worker uniform streams seeded from entropy.
///
/// # Arguments
///
/// * `target` - Target density `f`
/// * `proposal` - Proposal density `g` with `f(x) <= k * g(x)` on its support
/// * `sampler` - Maps a uniform variate on [0, 1) to a draw from `g`
/// * `k` - Scale constant, positive and finite
/// * `n` - Number of samples, positive
///
/// # Examples
///
/// ```rust
/// use sampler_engine::rejection_sampling;
///
/// let samples = rejection_sampling(|_x| 1.0, |_x| 1.0, |u| u, 1.0, 500).unwrap();
/// assert_eq!(samples.len(), 500);
/// ```
pub fn rejection_sampling<F, G, S>(
    target: F,
    proposal: G,
    sampler: S,
    k: f64,
    n: usize,
) -> Result<Vec<f64>, SamplingError>
where
    F: Fn(f64) -> f64 + Sync,
    G: Fn(f64) -> f64 + Sync,
    S: Fn(f64) -> f64 + Sync,
{
    let problem = RejectionProblem::new(target, proposal, sampler, k)?;
    RejectionSampler::new(SamplerConfig::default())
        .sample(&problem, n)
        .map(SamplingReport::into_samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::MutexGate;

    fn uniform_problem() -> RejectionProblem<
        impl Fn(f64) -> f64 + Sync,
        impl Fn(f64) -> f64 + Sync,
        impl Fn(f64) -> f64 + Sync,
    > {
        RejectionProblem::new(|_x: f64| 1.0, |_x: f64| 1.0, |u: f64| u, 1.0).unwrap()
    }

    #[test]
    fn test_zero_samples_rejected() {
        let result = RejectionSampler::new(SamplerConfig::default()).sample(&uniform_problem(), 0);
        assert!(matches!(result, Err(SamplingError::InvalidSampleCount)));
    }

    #[test]
    fn test_invalid_scale_rejected_by_entry_point() {
        let result = rejection_sampling(|_x| 1.0, |_x| 1.0, |u| u, 0.0, 10);
        assert!(matches!(result, Err(SamplingError::InvalidScale(_))));
    }

    #[test]
    fn test_report_counts_are_consistent() {
        let config = SamplerConfig::builder().batch_size(32).seed(1).build().unwrap();
        let report = RejectionSampler::new(config)
            .sample(&uniform_problem(), 1_000)
            .unwrap();

        assert_eq!(report.samples.len(), 1_000);
        assert_eq!(report.seed, 1);
        assert_eq!(report.consumer.accepted, 1_000);
        assert_eq!(report.consumer.proposals, 1_000);
        assert!((report.acceptance_rate() - 1.0).abs() < 1e-12);
        assert!(report.queue.samples_popped >= report.consumer.proposals);
        assert!(report.producer.proposals >= report.queue.samples_pushed);
        assert!(report.queue.peak_len <= 2 * 32 - 1);
    }

    #[test]
    fn test_gate_is_entered_once_per_batch() {
        let config = SamplerConfig::builder().batch_size(50).seed(2).build().unwrap();
        let sampler = RejectionSampler::new(config).with_gate(MutexGate::new());

        let report = sampler.sample(&uniform_problem(), 1_000).unwrap();

        let producer_batches = report.producer.proposals / 50;
        assert_eq!(
            sampler.gate().acquisitions(),
            producer_batches + report.consumer.batches
        );
    }

    #[test]
    fn test_unbounded_timeout_behaves_like_no_timeout() {
        for backend in [QueueBackend::Condvar, QueueBackend::Spin] {
            let config = SamplerConfig::builder()
                .backend(backend)
                .timeout(Duration::MAX)
                .seed(4)
                .build()
                .unwrap();
            let report = RejectionSampler::new(config)
                .sample(&uniform_problem(), 10)
                .unwrap();

            assert_eq!(report.samples.len(), 10);
        }
    }

    #[test]
    fn test_acceptance_rate_empty_report() {
        let report = SamplingReport {
            samples: Vec::new(),
            seed: 0,
            producer: ProducerStats::default(),
            consumer: ConsumerStats::default(),
            queue: QueueStats::default(),
            elapsed: Duration::ZERO,
        };
        assert_eq!(report.acceptance_rate(), 0.0);
    }
}
