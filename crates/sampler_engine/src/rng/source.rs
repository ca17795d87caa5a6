//! Uniform sources usable by the sampling workers.

use std::sync::{Mutex, PoisonError};

use super::SamplerRng;

/// A source of independent uniform variates on [0, 1).
///
/// Implementations are moved into (or borrowed by) a single worker thread;
/// sharing across threads goes through [`SharedUniform`].
pub trait UniformSource: Send {
    /// Draws one uniform variate.
    fn next_uniform(&mut self) -> f64;

    /// Fills `buffer` with uniform variates.
    fn fill_uniform(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.next_uniform();
        }
    }
}

impl UniformSource for SamplerRng {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.gen_uniform()
    }

    #[inline]
    fn fill_uniform(&mut self, buffer: &mut [f64]) {
        SamplerRng::fill_uniform(self, buffer)
    }
}

/// Handle to one generator shared by several workers behind a lock.
///
/// Batch fills take the lock once per buffer rather than once per variate.
///
/// # Examples
///
/// ```rust
/// use std::sync::Mutex;
/// use sampler_engine::rng::{SamplerRng, SharedUniform, UniformSource};
///
/// let generator = Mutex::new(SamplerRng::from_seed(3));
/// let mut a = SharedUniform::new(&generator);
/// let mut b = SharedUniform::new(&generator);
///
/// std::thread::scope(|s| {
///     s.spawn(move || a.next_uniform());
///     s.spawn(move || b.next_uniform());
/// });
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SharedUniform<'a> {
    generator: &'a Mutex<SamplerRng>,
}

impl<'a> SharedUniform<'a> {
    /// Wraps a lock-guarded generator.
    pub fn new(generator: &'a Mutex<SamplerRng>) -> Self {
        Self { generator }
    }
}

impl UniformSource for SharedUniform<'_> {
    fn next_uniform(&mut self) -> f64 {
        self.generator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_uniform()
    }

    fn fill_uniform(&mut self, buffer: &mut [f64]) {
        self.generator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fill_uniform(buffer)
    }
}
