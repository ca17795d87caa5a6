//! Built-in sampling problems.
//!
//! Each preset pairs a target density with a proposal the engine can draw
//! from by inverse transform, plus a scale constant that satisfies the
//! majorisation condition.

use std::f64::consts::{E, PI};
use std::fmt;
use std::str::FromStr;

use sampler_engine::{RejectionProblem, SamplingError};

use crate::error::CliError;

/// Problem type produced by every preset.
pub type PresetProblem = RejectionProblem<fn(f64) -> f64, fn(f64) -> f64, fn(f64) -> f64>;

/// Built-in problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Uniform target under a uniform proposal; everything is accepted
    Uniform,
    /// Unnormalised `x^3 / 3` on [0, 1] under a uniform proposal
    Cubic,
    /// Beta(2, 2) under a uniform proposal
    Beta22,
    /// Half-normal under an Exp(1) proposal
    HalfNormal,
}

impl Preset {
    /// All presets, in listing order
    pub const ALL: [Preset; 4] = [Self::Uniform, Self::Cubic, Self::Beta22, Self::HalfNormal];

    /// Command-line name
    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Cubic => "cubic",
            Self::Beta22 => "beta22",
            Self::HalfNormal => "half-normal",
        }
    }

    /// One-line description
    pub fn description(self) -> &'static str {
        match self {
            Self::Uniform => "f = 1, g = U(0, 1), k = 1",
            Self::Cubic => "f = x^3 / 3, g = U(0, 1), k = 1",
            Self::Beta22 => "f = 6x(1 - x), g = U(0, 1), k = 1.5",
            Self::HalfNormal => "f = sqrt(2/pi) exp(-x^2/2), g = Exp(1), k = sqrt(2e/pi)",
        }
    }

    /// Scale constant `k`
    pub fn scale(self) -> f64 {
        match self {
            Self::Uniform | Self::Cubic => 1.0,
            Self::Beta22 => 1.5,
            Self::HalfNormal => (2.0 * E / PI).sqrt(),
        }
    }

    /// Mean of the normalised target distribution
    pub fn mean(self) -> f64 {
        match self {
            Self::Uniform | Self::Beta22 => 0.5,
            // Normalised density 4x^3.
            Self::Cubic => 0.8,
            Self::HalfNormal => (2.0 / PI).sqrt(),
        }
    }

    /// Probability that a single proposal is accepted, `integral(f) / k`
    pub fn acceptance_probability(self) -> f64 {
        match self {
            Self::Uniform => 1.0,
            Self::Cubic => 1.0 / 12.0,
            Self::Beta22 | Self::HalfNormal => 1.0 / self.scale(),
        }
    }

    /// Builds the sampling problem
    pub fn problem(self) -> Result<PresetProblem, SamplingError> {
        let (target, proposal, sampler): (fn(f64) -> f64, fn(f64) -> f64, fn(f64) -> f64) =
            match self {
                Self::Uniform => (unit, unit, identity),
                Self::Cubic => (cubic, unit, identity),
                Self::Beta22 => (beta22, unit, identity),
                Self::HalfNormal => (half_normal, exponential, exponential_inverse_cdf),
            };
        RejectionProblem::new(target, proposal, sampler, self.scale())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == name || name == preset.name().replace('-', "_"))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                CliError::invalid_argument(format!(
                    "Unknown preset: {}. Supported: {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

fn unit(_x: f64) -> f64 {
    1.0
}

fn identity(u: f64) -> f64 {
    u
}

fn cubic(x: f64) -> f64 {
    x.powi(3) / 3.0
}

fn beta22(x: f64) -> f64 {
    6.0 * x * (1.0 - x)
}

fn half_normal(x: f64) -> f64 {
    (2.0 / PI).sqrt() * (-x * x / 2.0).exp()
}

fn exponential(x: f64) -> f64 {
    (-x).exp()
}

fn exponential_inverse_cdf(u: f64) -> f64 {
    -(1.0 - u).ln()
}
