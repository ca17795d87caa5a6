//! Rejection sampling problem: the three user callbacks and the scale constant.

use crate::error::SamplingError;

/// What the sampling workers need from a problem.
///
/// Implementations are shared by reference between the producer and the
/// consumer thread and must tolerate concurrent calls.
pub trait SamplingProblem: Sync {
    /// Maps a uniform variate on [0, 1) to a draw from the proposal.
    fn propose(&self, u: f64) -> f64;

    /// Evaluates `f(x) / (k * g(x))`; may be NaN or infinite when the
    /// callbacks misbehave.
    ///
    /// The consumer accepts `x` against a uniform `u` iff the ratio is
    /// `>= u`, so a NaN ratio rejects.
    fn acceptance_ratio(&self, x: f64) -> f64;
}

/// A univariate rejection sampling problem.
///
/// Bundles the target density `f`, the proposal density `g`, the
/// proposal-sample generator (mapping a uniform variate to a draw from `g`)
/// and the scale constant `k`.
///
/// The majorisation condition `f(x) <= k * g(x)` is the caller's
/// responsibility. It is not validated; a violation silently biases the
/// output towards `g` wherever the ratio exceeds one. The engine can count
/// such evaluations (see `SamplerConfig::check_majorization`).
///
/// # Examples
///
/// ```rust
/// use sampler_engine::{RejectionProblem, SamplingProblem};
///
/// // Beta(2, 2) target under a uniform proposal on [0, 1].
/// let problem = RejectionProblem::new(
///     |x: f64| 6.0 * x * (1.0 - x),
///     |_x: f64| 1.0,
///     |u: f64| u,
///     1.5,
/// )
/// .unwrap();
///
/// assert_eq!(problem.acceptance_ratio(0.5), 1.0);
/// assert!(problem.acceptance_ratio(0.01) < 0.5);
/// ```
#[derive(Clone, Debug)]
pub struct RejectionProblem<F, G, S> {
    target: F,
    proposal: G,
    sampler: S,
    scale: f64,
}

impl<F, G, S> RejectionProblem<F, G, S>
where
    F: Fn(f64) -> f64 + Sync,
    G: Fn(f64) -> f64 + Sync,
    S: Fn(f64) -> f64 + Sync,
{
    /// Creates a problem from its callbacks and scale constant.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidScale`] unless `scale` is positive
    /// and finite.
    pub fn new(target: F, proposal: G, sampler: S, scale: f64) -> Result<Self, SamplingError> {
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(SamplingError::InvalidScale(scale));
        }
        Ok(Self {
            target,
            proposal,
            sampler,
            scale,
        })
    }

    /// Returns the scale constant `k`.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl<F, G, S> SamplingProblem for RejectionProblem<F, G, S>
where
    F: Fn(f64) -> f64 + Sync,
    G: Fn(f64) -> f64 + Sync,
    S: Fn(f64) -> f64 + Sync,
{
    #[inline]
    fn propose(&self, u: f64) -> f64 {
        (self.sampler)(u)
    }

    #[inline]
    fn acceptance_ratio(&self, x: f64) -> f64 {
        (self.target)(x) / (self.scale * (self.proposal)(x))
    }
}
