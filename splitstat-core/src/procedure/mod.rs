//! Test Procedures
//!
//! One submodule per procedure, dispatched through the [`TestKind`] enum so
//! adding a fifth test is a compile-error checklist rather than a string
//! table lookup.

mod bootstrap;
mod mannwhitney;
mod permutation;
mod ttest;

use crate::config::AnalysisConfig;
use crate::metric::Metric;
use crate::result::{Arm, ArmSamples, TestResult};
use serde::{Deserialize, Serialize};
use splitstat_stats::StatsError;
use std::str::FromStr;
use thiserror::Error;

/// The four test procedures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    /// Permutation test on the mean difference
    Permutation,
    /// Mann-Whitney U test on stochastic superiority
    MannWhitney,
    /// Bootstrap test on the mean difference
    Bootstrap,
    /// Two-sample t-test on bootstrap means, gated by power analysis
    TTest,
}

impl TestKind {
    /// All procedures, in reporting order
    pub const ALL: [TestKind; 4] = [
        TestKind::Permutation,
        TestKind::MannWhitney,
        TestKind::Bootstrap,
        TestKind::TTest,
    ];

    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            TestKind::Permutation => "permutation",
            TestKind::MannWhitney => "mannwhitney",
            TestKind::Bootstrap => "bootstrap",
            TestKind::TTest => "ttest",
        }
    }

    /// Run this procedure on one (experiment, metric) cell.
    ///
    /// Fails fast on empty samples or a zero resample count before any
    /// resampling work begins; numerical errors propagate unchanged.
    pub fn run(
        &self,
        experiment: &str,
        metric: Metric,
        samples: &ArmSamples,
        cfg: &AnalysisConfig,
    ) -> Result<TestResult, TestError> {
        validate(samples, cfg)?;

        match self {
            TestKind::Permutation => permutation::run(experiment, metric, samples, cfg),
            TestKind::MannWhitney => mannwhitney::run(experiment, metric, samples, cfg),
            TestKind::Bootstrap => bootstrap::run(experiment, metric, samples, cfg),
            TestKind::TTest => ttest::run(experiment, metric, samples, cfg),
        }
    }
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a test name has no typed counterpart
#[derive(Debug, Clone, Error)]
#[error("unknown test: {0}")]
pub struct UnknownTest(pub String);

impl FromStr for TestKind {
    type Err = UnknownTest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permutation" => Ok(TestKind::Permutation),
            "mannwhitney" => Ok(TestKind::MannWhitney),
            "bootstrap" => Ok(TestKind::Bootstrap),
            "ttest" => Ok(TestKind::TTest),
            other => Err(UnknownTest(other.to_string())),
        }
    }
}

/// Errors from a test procedure
#[derive(Debug, Clone, Error)]
pub enum TestError {
    /// An arm has no users left after preparation
    #[error("{arm} sample is empty after preparation")]
    EmptySample {
        /// Which arm came up empty
        arm: Arm,
    },

    /// Resample count of zero can produce no distribution
    #[error("resample count must be at least 1")]
    ZeroResamples,

    /// Numerical failure inside the statistics layer
    #[error(transparent)]
    Stats(#[from] StatsError),
}

fn validate(samples: &ArmSamples, cfg: &AnalysisConfig) -> Result<(), TestError> {
    if samples.control.is_empty() {
        return Err(TestError::EmptySample { arm: Arm::Control });
    }
    if samples.treatment.is_empty() {
        return Err(TestError::EmptySample { arm: Arm::Treatment });
    }
    if cfg.n_resamples == 0 {
        return Err(TestError::ZeroResamples);
    }
    Ok(())
}
