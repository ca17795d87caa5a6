//! Shared helpers for the integration tests: sample problems and
//! Kolmogorov-Smirnov statistics.

#![allow(dead_code)]

use std::f64::consts::{E, PI};

use sampler_engine::RejectionProblem;

/// Asymptotic KS critical coefficient c(alpha) for alpha = 0.01.
pub const KS_C_ALPHA_01: f64 = 1.628;

/// `f = g = 1` on [0, 1], identity sampler, `k = 1`: everything is accepted.
pub fn uniform_problem() -> RejectionProblem<
    impl Fn(f64) -> f64 + Sync,
    impl Fn(f64) -> f64 + Sync,
    impl Fn(f64) -> f64 + Sync,
> {
    RejectionProblem::new(|_x: f64| 1.0, |_x: f64| 1.0, |u: f64| u, 1.0).unwrap()
}

/// Beta(2, 2) target under a uniform proposal, `k = 1.5`.
pub fn beta22_problem() -> RejectionProblem<
    impl Fn(f64) -> f64 + Sync,
    impl Fn(f64) -> f64 + Sync,
    impl Fn(f64) -> f64 + Sync,
> {
    RejectionProblem::new(|x: f64| 6.0 * x * (1.0 - x), |_x: f64| 1.0, |u: f64| u, 1.5).unwrap()
}

/// CDF of Beta(2, 2).
pub fn beta22_cdf(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    3.0 * x * x - 2.0 * x * x * x
}

/// Half-normal target under an Exp(1) proposal, `k = sqrt(2e / pi)`.
pub fn half_normal_problem() -> RejectionProblem<
    impl Fn(f64) -> f64 + Sync,
    impl Fn(f64) -> f64 + Sync,
    impl Fn(f64) -> f64 + Sync,
> {
    RejectionProblem::new(
        |x: f64| (2.0 / PI).sqrt() * (-x * x / 2.0).exp(),
        |x: f64| (-x).exp(),
        |u: f64| -(1.0 - u).ln(),
        (2.0 * E / PI).sqrt(),
    )
    .unwrap()
}

/// CDF of the half-normal distribution with unit scale.
pub fn half_normal_cdf(x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else {
        erf(x / 2.0_f64.sqrt())
    }
}

/// Abramowitz & Stegun 7.1.26 (absolute error below 1.5e-7).
pub fn erf(x: f64) -> f64 {
    let sign = x.signum();
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * x);
    let poly = t
        * (0.254_829_592
            + t * (-0.284_496_736 + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429))));
    sign * (1.0 - poly * (-x * x).exp())
}

/// One-sample KS statistic `sup |F_n(x) - F(x)|`.
pub fn ks_statistic(samples: &[f64], cdf: impl Fn(f64) -> f64) -> f64 {
    let mut xs = samples.to_vec();
    xs.sort_by(f64::total_cmp);
    let n = xs.len() as f64;

    xs.iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            ((i + 1) as f64 / n - f).max(f - i as f64 / n)
        })
        .fold(0.0, f64::max)
}

/// Two-sample KS statistic `sup |F_a(x) - F_b(x)|`.
pub fn ks_two_sample(a: &[f64], b: &[f64]) -> f64 {
    let mut xs = a.to_vec();
    let mut ys = b.to_vec();
    xs.sort_by(f64::total_cmp);
    ys.sort_by(f64::total_cmp);

    let (n, m) = (xs.len() as f64, ys.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;

    while i < xs.len() && j < ys.len() {
        let value = xs[i].min(ys[j]);
        while i < xs.len() && xs[i] <= value {
            i += 1;
        }
        while j < ys.len() && ys[j] <= value {
            j += 1;
        }
        d = d.max((i as f64 / n - j as f64 / m).abs());
    }
    d
}

/// One-sample critical value at alpha = 0.01.
pub fn ks_critical(n: usize) -> f64 {
    KS_C_ALPHA_01 / (n as f64).sqrt()
}

/// Two-sample critical value at alpha = 0.01.
pub fn ks_critical_two_sample(n: usize, m: usize) -> f64 {
    let (n, m) = (n as f64, m as f64);
    KS_C_ALPHA_01 * ((n + m) / (n * m)).sqrt()
}
