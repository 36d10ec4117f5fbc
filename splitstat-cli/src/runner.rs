//! Parallel Analysis Runner
//!
//! Runs the cross-product of tests × metrics × experiments as independent
//! tasks on a worker pool. Tasks share nothing mutable; each procedure
//! seeds its own generator, so a cell's result does not depend on pool
//! scheduling. A failing cell is logged and reported, and aborts only
//! itself.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use splitstat_core::{AnalysisConfig, Metric, TestKind, TestResult};
use splitstat_data::{EventFrame, ab_samples};
use splitstat_report::{CellFailure, CellReport, ExperimentReport, summarize_experiment};
use std::collections::BTreeMap;

/// One analysis cell
#[derive(Debug, Clone)]
struct Task {
    test: TestKind,
    metric: Metric,
    experiment: String,
}

/// Run every (test, metric, experiment) cell and fold the outcomes into
/// per-experiment reports.
pub fn run_analysis(
    frame: &EventFrame,
    experiments: &[String],
    tests: &[TestKind],
    metrics: &[Metric],
    cfg: &AnalysisConfig,
    jobs: usize,
) -> anyhow::Result<Vec<ExperimentReport>> {
    let tasks: Vec<Task> = tests
        .iter()
        .flat_map(|&test| {
            metrics.iter().flat_map(move |&metric| {
                experiments.iter().map(move |experiment| Task {
                    test,
                    metric,
                    experiment: experiment.clone(),
                })
            })
        })
        .collect();

    if tasks.is_empty() {
        return Ok(Vec::new());
    }

    let workers = if jobs == 0 {
        num_cpus().min(tasks.len())
    } else {
        jobs.min(tasks.len())
    }
    .max(1);

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build worker pool: {}", e))?;

    let progress = ProgressBar::new(tasks.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} cells")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let outcomes: Vec<(Task, Result<TestResult, String>)> = pool.install(|| {
        tasks
            .into_par_iter()
            .map(|task| {
                let outcome = run_cell(frame, &task, cfg);
                if let Err(ref error) = outcome {
                    tracing::error!(
                        test = task.test.as_str(),
                        metric = task.metric.as_str(),
                        experiment = task.experiment.as_str(),
                        "error in {}: {}",
                        task.test,
                        error
                    );
                }
                progress.inc(1);
                (task, outcome)
            })
            .collect()
    });
    progress.finish_and_clear();

    let mut by_experiment: BTreeMap<String, (Vec<CellReport>, Vec<CellFailure>)> =
        BTreeMap::new();
    for (task, outcome) in outcomes {
        let entry = by_experiment.entry(task.experiment.clone()).or_default();
        match outcome {
            Ok(result) => entry.0.push(CellReport::from(&result)),
            Err(error) => entry.1.push(CellFailure {
                test: task.test,
                metric: task.metric,
                error,
            }),
        }
    }

    Ok(by_experiment
        .into_iter()
        .map(|(experiment, (cells, failures))| summarize_experiment(&experiment, cells, failures))
        .collect())
}

fn run_cell(frame: &EventFrame, task: &Task, cfg: &AnalysisConfig) -> Result<TestResult, String> {
    let samples = ab_samples(frame, &task.experiment, task.metric).map_err(|e| e.to_string())?;
    task.test
        .run(&task.experiment, task.metric, &samples, cfg)
        .map_err(|e| e.to_string())
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fxhash::FxHashMap;
    use splitstat_data::EventRow;

    fn frame() -> EventFrame {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut rows = Vec::new();
        for i in 0..40 {
            let mut flags = FxHashMap::default();
            flags.insert("exp_btn".to_string(), Some(i % 2 == 0));
            rows.push(EventRow {
                user_id: format!("u{i}"),
                date,
                flags,
                messages_count: (i % 5) as f64,
                price_usd: (i % 3) as f64,
            });
        }
        EventFrame {
            rows,
            experiments: vec!["exp_btn".to_string()],
        }
    }

    fn cfg() -> AnalysisConfig {
        AnalysisConfig {
            n_resamples: 100,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_cross_product_produces_all_cells() {
        let reports = run_analysis(
            &frame(),
            &["exp_btn".to_string()],
            &[TestKind::Permutation, TestKind::Bootstrap],
            &[Metric::Arpu, Metric::Messages],
            &cfg(),
            2,
        )
        .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].cells.len(), 4);
        assert!(reports[0].failures.is_empty());
    }

    #[test]
    fn test_unknown_experiment_fails_only_its_cells() {
        let reports = run_analysis(
            &frame(),
            &["exp_btn".to_string(), "exp_ghost".to_string()],
            &[TestKind::Permutation],
            &[Metric::Arpu],
            &cfg(),
            1,
        )
        .unwrap();

        assert_eq!(reports.len(), 2);
        let ghost = reports.iter().find(|r| r.experiment == "exp_ghost").unwrap();
        assert_eq!(ghost.cells.len(), 0);
        assert_eq!(ghost.failures.len(), 1);
        assert!(ghost.failures[0].error.contains("unknown experiment"));

        let real = reports.iter().find(|r| r.experiment == "exp_btn").unwrap();
        assert_eq!(real.cells.len(), 1);
    }

    #[test]
    fn test_pool_and_serial_agree() {
        let serial = run_analysis(
            &frame(),
            &["exp_btn".to_string()],
            &TestKind::ALL,
            &[Metric::Arpu],
            &cfg(),
            1,
        )
        .unwrap();
        let pooled = run_analysis(
            &frame(),
            &["exp_btn".to_string()],
            &TestKind::ALL,
            &[Metric::Arpu],
            &cfg(),
            4,
        )
        .unwrap();

        let serial_rows: Vec<_> = serial[0]
            .cells
            .iter()
            .map(|c| (c.test, c.p_value, c.decision))
            .collect();
        let pooled_rows: Vec<_> = pooled[0]
            .cells
            .iter()
            .map(|c| (c.test, c.p_value, c.decision))
            .collect();
        assert_eq!(serial_rows, pooled_rows);
    }

    #[test]
    fn test_empty_task_list() {
        let reports = run_analysis(&frame(), &[], &TestKind::ALL, &[Metric::Arpu], &cfg(), 1)
            .unwrap();
        assert!(reports.is_empty());
    }
}
