//! # Concurrent Rejection Sampling Engine
//!
//! Draws samples from a univariate target density `f` by rejection against
//! a proposal density `g` scaled by `k`, overlapping proposal generation
//! with accept/reject evaluation on two worker threads.
//!
//! ## Architecture
//!
//! ```text
//! Orchestrator (RejectionSampler::sample)
//! ├── Producer  uniforms → sampler(u) → push_batch ──┐
//! │                                                  ▼
//! │                                       BatchQueue (watermark B)
//! │                                                  │
//! ├── Consumer  pop_batch → f(x)/(k·g(x)) >= u → output
//! └── TerminationSignal (set once; wakes both workers)
//! ```
//!
//! - [`queue`]: the blocking batch queue, with condition-variable and spin
//!   backends behind one trait
//! - [`gate`]: the exclusive-call gate entered once per callback batch
//! - [`rng`]: per-call seeded uniform streams
//! - [`signal`]: the set-once termination signal
//!
//! ## Usage Example
//!
//! ```rust
//! use sampler_engine::rejection_sampling;
//!
//! // Half-normal target under an Exp(1) proposal.
//! let k = (2.0 * std::f64::consts::E / std::f64::consts::PI).sqrt();
//! let samples = rejection_sampling(
//!     |x: f64| (2.0 / std::f64::consts::PI).sqrt() * (-x * x / 2.0).exp(),
//!     |x: f64| (-x).exp(),
//!     |u: f64| -(1.0 - u).ln(),
//!     k,
//!     2_000,
//! )
//! .unwrap();
//!
//! assert_eq!(samples.len(), 2_000);
//! assert!(samples.iter().all(|&x| x >= 0.0));
//! ```
//!
//! ## Known Limitations
//!
//! - `f(x) <= k * g(x)` is not validated; a violation biases the output.
//!   Enable `check_majorization` to count offending evaluations.
//! - Acceptance probabilities near zero make a call run for a long time;
//!   bound it with `timeout` or `max_proposals`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod consumer;
pub mod context;
pub mod error;
pub mod gate;
pub mod problem;
pub mod producer;
pub mod queue;
pub mod rng;
pub mod sampler;
pub mod signal;

// Re-export commonly used items for convenience
pub use config::{
    QueueBackend, SamplerConfig, SamplerConfigBuilder, UniformMode, DEFAULT_BATCH_SIZE,
    MAX_BATCH_SIZE,
};
pub use error::{ConfigError, SamplingError};
pub use gate::{ExclusiveGate, MutexGate, NoopGate};
pub use problem::{RejectionProblem, SamplingProblem};
pub use sampler::{rejection_sampling, RejectionSampler, SamplingReport};
pub use signal::{TerminationReason, TerminationSignal};
