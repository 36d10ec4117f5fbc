//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use splitstat_core::{Decision, Direction, Metric, TestKind, TestResult};

/// Complete analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Run metadata
    pub meta: ReportMeta,
    /// One entry per analyzed experiment
    pub experiments: Vec<ExperimentReport>,
}

/// Run metadata captured alongside the verdicts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report schema version
    pub schema_version: u32,
    /// splitstat version that produced the report
    pub version: String,
    /// When the analysis ran
    pub timestamp: DateTime<Utc>,
    /// Significance level used by every cell
    pub alpha: f64,
    /// Configured resample count
    pub n_resamples: usize,
    /// Base random seed
    pub seed: u64,
}

/// All results for one experiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// Experiment identifier (flag name)
    pub experiment: String,
    /// Experiment-level verdict aggregated over all cells
    pub verdict: ExperimentVerdict,
    /// Per-(test, metric) decision rows, sorted by test then metric
    pub cells: Vec<CellReport>,
    /// Cells that failed instead of producing a decision
    pub failures: Vec<CellFailure>,
}

/// Experiment-level verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ExperimentVerdict {
    /// Every cell rejected: no detectable effect anywhere
    Rejected,
    /// No cell accepted: the experiment needs more data
    KeepRunning,
    /// Accepted with a uniform effect direction
    Accepted {
        /// Whether the uniform direction is negative
        negative_effect: bool,
    },
    /// Accepted, but cells disagree on the effect direction
    AcceptedMixed,
}

/// One (test, metric) decision row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellReport {
    /// Procedure that produced the row
    pub test: TestKind,
    /// Metric under test
    pub metric: Metric,
    /// p-value
    pub p_value: f64,
    /// Three-way verdict
    pub decision: Decision,
    /// Effect direction, when resolved (or hinted, for Mann-Whitney)
    pub direction: Option<Direction>,
    /// Confidence interval for the effect
    pub ci: Option<(f64, f64)>,
    /// Point estimate of the effect
    pub effect: f64,
    /// Justification string
    pub reason: String,
}

impl From<&TestResult> for CellReport {
    fn from(result: &TestResult) -> Self {
        Self {
            test: result.test,
            metric: result.metric,
            p_value: result.p_value,
            decision: result.decision,
            direction: result.direction,
            ci: result.ci,
            effect: result.vis.effect,
            reason: result.reason.clone(),
        }
    }
}

/// A cell that errored instead of deciding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellFailure {
    /// Procedure that failed
    pub test: TestKind,
    /// Metric it ran on
    pub metric: Metric,
    /// Rendered error
    pub error: String,
}
