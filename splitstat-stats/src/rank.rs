//! Rank Statistics
//!
//! Mann-Whitney U with tie-aware ranking and the asymptotic normal
//! approximation for the two-sided p-value.

use crate::StatsError;
use statrs::distribution::{ContinuousCDF, Normal};

/// Mann-Whitney test outcome
#[derive(Debug, Clone, Copy)]
pub struct MannWhitney {
    /// U statistic of the treatment sample: number of (control, treatment)
    /// pairs where the treatment value is larger, ties counted half
    pub u_statistic: f64,
    /// Two-sided asymptotic p-value
    pub p_value: f64,
}

/// Rank-sum of the treatment group over the pooled samples, plus the tie
/// correction term Σ(t³ − t) over tie groups of size t.
fn rank_stats(control: &[f64], treatment: &[f64]) -> (f64, f64) {
    let mut combined: Vec<(f64, bool)> = control
        .iter()
        .map(|&x| (x, false))
        .chain(treatment.iter().map(|&x| (x, true)))
        .collect();

    combined.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut rank_sum = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;

    while i < combined.len() {
        let mut j = i;
        while j < combined.len() && combined[j].0 == combined[i].0 {
            j += 1;
        }

        // Tied values share the average of ranks i+1..=j
        let avg_rank = (i + j + 1) as f64 / 2.0;
        let t = (j - i) as f64;
        if t > 1.0 {
            tie_term += t * t * t - t;
        }

        for entry in &combined[i..j] {
            if entry.1 {
                rank_sum += avg_rank;
            }
        }

        i = j;
    }

    (rank_sum, tie_term)
}

/// U statistic of the treatment sample.
///
/// Dividing by `control.len() * treatment.len()` yields the common-language
/// effect size a12, an estimate of P(treatment > control).
pub fn mann_whitney_u(control: &[f64], treatment: &[f64]) -> f64 {
    let (rank_sum, _) = rank_stats(control, treatment);
    let n_b = treatment.len() as f64;
    rank_sum - n_b * (n_b + 1.0) / 2.0
}

/// Mann-Whitney U test with the asymptotic two-sided p-value.
///
/// The normal approximation applies the tie-corrected variance and a 0.5
/// continuity correction. A fully tied pool has zero variance; the p-value
/// is then 1.
pub fn mann_whitney(control: &[f64], treatment: &[f64]) -> Result<MannWhitney, StatsError> {
    if control.is_empty() || treatment.is_empty() {
        return Err(StatsError::TooFewSamples {
            got: control.len().min(treatment.len()),
            min: 1,
        });
    }

    let n_a = control.len() as f64;
    let n_b = treatment.len() as f64;
    let n = n_a + n_b;

    let (rank_sum, tie_term) = rank_stats(control, treatment);
    let u = rank_sum - n_b * (n_b + 1.0) / 2.0;

    let mu = n_a * n_b / 2.0;
    let tie_adjustment = if n > 1.0 { tie_term / (n * (n - 1.0)) } else { 0.0 };
    let sigma_sq = n_a * n_b / 12.0 * ((n + 1.0) - tie_adjustment);

    let p_value = if sigma_sq <= 0.0 {
        1.0
    } else {
        let sigma = sigma_sq.sqrt();
        let z = ((u - mu).abs() - 0.5).max(0.0) / sigma;
        let normal =
            Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
        (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0)
    };

    Ok(MannWhitney {
        u_statistic: u,
        p_value,
    })
}
