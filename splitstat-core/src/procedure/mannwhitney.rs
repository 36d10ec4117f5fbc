//! Mann-Whitney U Test
//!
//! Rank-based comparison. The effect measure is the common-language effect
//! size a12 = U / (n_a * n_b), estimating P(treatment > control) with null
//! value 0.5; its confidence interval comes from bootstrap resampling of
//! both arms.

use crate::config::AnalysisConfig;
use crate::decision::stochastic_superiority_decision;
use crate::metric::Metric;
use crate::procedure::{TestError, TestKind};
use crate::result::{ArmSamples, TestResult, VisInfo};
use splitstat_stats::{bootstrap_statistic, mann_whitney, mann_whitney_u, percentile_interval};

pub(super) fn run(
    experiment: &str,
    metric: Metric,
    samples: &ArmSamples,
    cfg: &AnalysisConfig,
) -> Result<TestResult, TestError> {
    let a = &samples.control;
    let b = &samples.treatment;
    let mut rng = cfg.rng();

    let mw = mann_whitney(a, b)?;
    let p_value = mw.p_value;

    let pair_count = (a.len() * b.len()) as f64;
    let a12 = mw.u_statistic / pair_count;

    let boots = bootstrap_statistic(&mut rng, a, b, cfg.n_resamples, |x, y| {
        mann_whitney_u(x, y) / pair_count
    });
    let ci = percentile_interval(&boots, 1.0 - cfg.alpha);

    let (decision, direction, reason) =
        stochastic_superiority_decision(p_value, cfg.alpha, ci, a12);

    Ok(TestResult {
        experiment: experiment.to_string(),
        test: TestKind::MannWhitney,
        metric,
        p_value,
        decision,
        direction,
        ci: Some(ci),
        reason,
        vis: VisInfo {
            resample_distribution: boots,
            effect: a12,
            null_distribution: None,
        },
    })
}
