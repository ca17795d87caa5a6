//! # Uniform Random Number Infrastructure
//!
//! This module provides the uniform variates consumed by both sampling
//! workers: the producer maps them through the proposal-sample generator and
//! the consumer draws one per proposal for the accept/reject test.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: every generator is seeded; a per-call seed fully
//!   determines the per-worker streams derived from it
//! - **No shared unsynchronised state**: a generator is either owned by one
//!   worker ([`SamplerRng`]) or guarded by a lock ([`SharedUniform`])
//! - **Batch operations**: `fill_uniform` writes into caller-owned buffers
//!
//! ## Module Structure
//!
//! - `prng`: seeded PRNG wrapper with stream splitting
//! - `source`: the [`UniformSource`] trait and the lock-guarded shared source
//!
//! ## Usage Example
//!
//! ```rust
//! use sampler_engine::rng::{SamplerRng, UniformSource};
//!
//! let mut master = SamplerRng::from_seed(12345);
//! let mut producer_stream = master.split();
//! let mut consumer_stream = master.split();
//!
//! let mut buffer = vec![0.0; 100];
//! producer_stream.fill_uniform(&mut buffer);
//! assert!(consumer_stream.next_uniform() < 1.0);
//! ```

mod prng;
mod source;

// Public re-exports
pub use prng::SamplerRng;
pub use source::{SharedUniform, UniformSource};
