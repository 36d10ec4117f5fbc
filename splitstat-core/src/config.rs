//! Analysis Configuration

use crate::{DEFAULT_ALPHA, DEFAULT_POWER, DEFAULT_SEED};
use rand::SeedableRng;
use rand::rngs::StdRng;
use splitstat_stats::DEFAULT_RESAMPLES;

/// Shared configuration for all test procedures
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Significance level for every decision
    pub alpha: f64,
    /// Number of bootstrap / permutation resamples; must be at least 1
    pub n_resamples: usize,
    /// Target power for the t-test's required-sample-size analysis
    pub power: f64,
    /// Base seed for the per-invocation random generators
    pub seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            n_resamples: DEFAULT_RESAMPLES,
            power: DEFAULT_POWER,
            seed: DEFAULT_SEED,
        }
    }
}

impl AnalysisConfig {
    /// Fresh generator for one procedure invocation.
    ///
    /// Each call owns its generator; nothing is shared across tasks, so a
    /// cell re-run in isolation reproduces its pooled run exactly.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}
