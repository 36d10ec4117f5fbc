#![warn(missing_docs)]
//! # Splitstat
//!
//! A/B experiment analysis over raw event logs.
//!
//! Given dated `users` / `messages` / `payments` CSV drops partitioned by an
//! experiment flag, splitstat computes per-metric statistical decisions
//! (ACCEPT / REJECT / KEEP_RUNNING) using four hypothesis-testing methods:
//! - **Permutation test**: two-sided permutation p-value on the mean
//!   difference with a percentile bootstrap confidence interval
//! - **Mann-Whitney U**: rank-based stochastic superiority (a12) with a
//!   bootstrap interval around the 0.5 null
//! - **Bootstrap test**: tail fraction of the bootstrap mean-difference
//!   distribution
//! - **T-test with power analysis**: required-sample-size gate, then a
//!   two-sample t-test on bootstrap-mean distributions
//!
//! Every cell of the tests × metrics × experiments cross-product runs as an
//! independent, deterministic task; results aggregate into per-experiment
//! verdicts with human-readable and JSON rendering.
//!
//! ## Quick Start
//!
//! ```no_run
//! use splitstat::{AnalysisConfig, ArmSamples, Metric, TestKind};
//!
//! let samples = ArmSamples::new(vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0]);
//! let result = TestKind::Permutation
//!     .run("exp_fancy_button", Metric::Arpu, &samples, &AnalysisConfig::default())
//!     .unwrap();
//! println!("{}: {}", result.decision, result.reason);
//! ```

// Re-export core types
pub use splitstat_core::{
    AnalysisConfig, Arm, ArmSamples, Decision, Direction, Metric, TestError, TestKind,
    TestResult, UnknownMetric, UnknownTest, VisInfo, mean_difference_decision,
    stochastic_superiority_decision,
};

// Re-export data preparation
pub use splitstat_data::{
    Assignment, EventFrame, EventRow, IngestError, PrepError, ab_samples, discover_datasets,
    load_frame, prepare_for_experiment,
};

// Re-export reporting
pub use splitstat_report::{
    AnalysisReport, CellFailure, CellReport, ExperimentReport, ExperimentVerdict, OutputFormat,
    ReportMeta, SCHEMA_VERSION, generate_json_report, render_human, summarize_experiment,
};

// Re-export stats primitives
pub use splitstat_stats::{
    bootstrap_means, bootstrap_statistic, mann_whitney, percentile_interval,
    permutation_statistic, required_group_size, two_sample_t,
};

/// Run the splitstat CLI harness.
///
/// Call this from your binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     splitstat::run()
/// }
/// ```
pub use splitstat_cli::run;

/// Parallel cross-product analysis over a loaded event frame.
pub use splitstat_cli::run_analysis;
