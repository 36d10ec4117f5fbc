//! Human-Readable Summary

use crate::report::{AnalysisReport, CellReport, ExperimentReport, ExperimentVerdict};
use splitstat_core::{Decision, Direction};
use std::fmt::Write;

/// Render the full report for the terminal.
pub fn render_human(report: &AnalysisReport) -> String {
    let mut out = String::new();
    for experiment in &report.experiments {
        render_experiment(&mut out, experiment);
    }
    out
}

fn render_experiment(out: &mut String, report: &ExperimentReport) {
    let _ = writeln!(out, "####### {} #######", report.experiment);

    match report.verdict {
        ExperimentVerdict::Rejected => {
            let _ = writeln!(
                out,
                "Experiment `{}` should be REJECTED; all metrics are rejected",
                report.experiment
            );
        }
        ExperimentVerdict::KeepRunning => {
            let _ = writeln!(
                out,
                "Experiment `{}` should KEEP RUNNING:",
                report.experiment
            );
            for cell in cells_with(report, Decision::KeepRunning) {
                let _ = writeln!(
                    out,
                    "Test {} for metric {} should KEEP RUNNING because\n- {}",
                    cell.test, cell.metric, cell.reason
                );
            }
        }
        ExperimentVerdict::Accepted { negative_effect } => {
            for cell in cells_with(report, Decision::Accept) {
                if negative_effect {
                    let _ = writeln!(
                        out,
                        "Test {} for metric {} is negative\n- {}",
                        cell.test, cell.metric, cell.reason
                    );
                } else {
                    let _ = writeln!(
                        out,
                        "Test {} for metric {} has positive effect\n- {}",
                        cell.test, cell.metric, cell.reason
                    );
                }
            }
            if negative_effect {
                let _ = writeln!(
                    out,
                    "Experiment `{}` should be ACCEPTED, even if effect is negative",
                    report.experiment
                );
            } else {
                let _ = writeln!(
                    out,
                    "Experiment `{}` should be ACCEPTED",
                    report.experiment
                );
            }
        }
        ExperimentVerdict::AcceptedMixed => {
            let _ = writeln!(
                out,
                "Experiment `{}` should be ACCEPTED, but there are negative and positive effects",
                report.experiment
            );
            for cell in cells_with(report, Decision::Accept) {
                let direction = match cell.direction {
                    Some(Direction::Negative) => "negative",
                    _ => "positive",
                };
                let _ = writeln!(
                    out,
                    "Test {} for metric {} is {}\n- {}",
                    cell.test, cell.metric, direction, cell.reason
                );
            }
            let _ = writeln!(
                out,
                "Ask the product owner how the conflicting effects net out on revenue \
                 before rolling out"
            );
        }
    }

    for failure in &report.failures {
        let _ = writeln!(
            out,
            "Test {} for metric {} failed: {}",
            failure.test, failure.metric, failure.error
        );
    }
}

fn cells_with(report: &ExperimentReport, decision: Decision) -> impl Iterator<Item = &CellReport> {
    report.cells.iter().filter(move |c| c.decision == decision)
}
