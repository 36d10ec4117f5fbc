//! Experiment Verdicts
//!
//! Folds the per-cell decisions of one experiment into a single
//! recommendation.

use crate::report::{CellFailure, CellReport, ExperimentReport, ExperimentVerdict};
use splitstat_core::{Decision, Direction};

/// Aggregate one experiment's cells into a report entry.
///
/// Cells sort by test then metric name. The verdict ladder: everything
/// rejected → Rejected; nothing accepted → KeepRunning; accepted with one
/// direction across accepting cells → Accepted; otherwise AcceptedMixed.
pub fn summarize_experiment(
    experiment: &str,
    mut cells: Vec<CellReport>,
    failures: Vec<CellFailure>,
) -> ExperimentReport {
    cells.sort_by(|a, b| {
        (a.test.as_str(), a.metric.as_str()).cmp(&(b.test.as_str(), b.metric.as_str()))
    });

    let verdict = fold_verdict(&cells);

    ExperimentReport {
        experiment: experiment.to_string(),
        verdict,
        cells,
        failures,
    }
}

fn fold_verdict(cells: &[CellReport]) -> ExperimentVerdict {
    let all_rejected =
        !cells.is_empty() && cells.iter().all(|c| c.decision == Decision::Reject);
    if all_rejected {
        return ExperimentVerdict::Rejected;
    }

    let accepted: Vec<&CellReport> = cells
        .iter()
        .filter(|c| c.decision == Decision::Accept)
        .collect();
    if accepted.is_empty() {
        return ExperimentVerdict::KeepRunning;
    }

    let has_negative = accepted
        .iter()
        .any(|c| c.direction == Some(Direction::Negative));
    let has_positive = accepted
        .iter()
        .any(|c| c.direction == Some(Direction::Positive));

    if has_negative && has_positive {
        ExperimentVerdict::AcceptedMixed
    } else {
        ExperimentVerdict::Accepted {
            negative_effect: has_negative,
        }
    }
}
