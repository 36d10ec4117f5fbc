#![warn(missing_docs)]
//! Splitstat Statistical Primitives
//!
//! Provides the numerical machinery shared by the test procedures:
//! - Bootstrap resampling (with replacement) over an arbitrary two-sample statistic
//! - Permutation resampling (label shuffling) for null distributions
//! - Percentile confidence intervals
//! - Mann-Whitney rank statistics with tie handling
//! - Two-sample Student's t-test
//! - Power analysis (minimum sample size for a target effect)

mod power;
mod rank;
mod resample;
mod student;

pub use power::required_group_size;
pub use rank::{MannWhitney, mann_whitney, mann_whitney_u};
pub use resample::{
    bootstrap_means, bootstrap_statistic, percentile_interval, permutation_p_value,
    permutation_statistic,
};
pub use student::{TwoSampleTTest, two_sample_t};

use thiserror::Error;

/// Default number of resamples for bootstrap and permutation distributions
pub const DEFAULT_RESAMPLES: usize = 10_000;

/// Errors from statistical computations
#[derive(Debug, Clone, Error)]
pub enum StatsError {
    /// A sample is too small for the requested computation
    #[error("sample too small: got {got}, need at least {min}")]
    TooFewSamples {
        /// Observed sample size
        got: usize,
        /// Minimum size the computation needs
        min: usize,
    },

    /// A distribution could not be constructed from the derived parameters
    #[error("invalid distribution parameters: {0}")]
    Distribution(String),

    /// Standardized effect size outside the solvable range
    #[error("standardized effect size must be positive, got {0}")]
    InvalidEffectSize(f64),
}

/// Arithmetic mean. Empty input yields 0.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population standard deviation (divisor n).
pub fn population_std(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let m = mean(samples);
    (samples.iter().map(|x| (x - m).powi(2)).sum::<f64>() / samples.len() as f64).sqrt()
}

/// Sample variance (divisor n - 1). Fewer than two values yield 0.
pub fn sample_variance(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let m = mean(samples);
    samples.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (samples.len() - 1) as f64
}
