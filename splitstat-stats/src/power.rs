//! Power Analysis
//!
//! Minimum per-group sample size for a two-sample t-test to detect a
//! standardized effect at a given significance level and power, allowing
//! unequal group sizes.

use crate::StatsError;
use statrs::distribution::{ContinuousCDF, Normal};

/// Minimum per-group sample size (normal approximation).
///
/// `effect_size` is the standardized (Cohen's d) effect, `ratio` is
/// n_treatment / n_control. Solves
///
/// ```text
/// n = (1 + 1/ratio) * ((z_{1-alpha/2} + z_{power}) / d)^2
/// ```
///
/// rounded up, never below the two observations a t-test needs. An infinite
/// effect (zero control variance) therefore resolves to 2.
pub fn required_group_size(
    effect_size: f64,
    alpha: f64,
    power: f64,
    ratio: f64,
) -> Result<f64, StatsError> {
    if effect_size <= 0.0 || effect_size.is_nan() {
        return Err(StatsError::InvalidEffectSize(effect_size));
    }
    if ratio <= 0.0 || !ratio.is_finite() {
        return Err(StatsError::Distribution(format!(
            "group size ratio must be positive and finite, got {ratio}"
        )));
    }

    let normal = Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let z_alpha = normal.inverse_cdf(1.0 - alpha / 2.0);
    let z_beta = normal.inverse_cdf(power);

    let n = (1.0 + 1.0 / ratio) * ((z_alpha + z_beta) / effect_size).powi(2);

    Ok(n.ceil().max(2.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_effect_needs_large_groups() {
        // d = 0.2, alpha = 0.05, power = 0.8, equal groups: classic ~393/group
        let n = required_group_size(0.2, 0.05, 0.8, 1.0).unwrap();
        assert!(n > 350.0 && n < 450.0);
    }

    #[test]
    fn test_large_effect_needs_small_groups() {
        let n_small = required_group_size(0.2, 0.05, 0.8, 1.0).unwrap();
        let n_large = required_group_size(0.8, 0.05, 0.8, 1.0).unwrap();
        assert!(n_large < n_small);
        assert!(n_large >= 2.0);
    }

    #[test]
    fn test_unequal_ratio_raises_requirement() {
        let equal = required_group_size(0.5, 0.12, 0.8, 1.0).unwrap();
        let skewed = required_group_size(0.5, 0.12, 0.8, 0.25).unwrap();
        assert!(skewed > equal);
    }

    #[test]
    fn test_infinite_effect_floors_at_two() {
        let n = required_group_size(f64::INFINITY, 0.12, 0.8, 1.0).unwrap();
        assert_eq!(n, 2.0);
    }

    #[test]
    fn test_invalid_effect_rejected() {
        assert!(required_group_size(0.0, 0.05, 0.8, 1.0).is_err());
        assert!(required_group_size(-0.5, 0.05, 0.8, 1.0).is_err());
        assert!(required_group_size(f64::NAN, 0.05, 0.8, 1.0).is_err());
    }

    #[test]
    fn test_higher_power_raises_requirement() {
        let p80 = required_group_size(0.5, 0.05, 0.8, 1.0).unwrap();
        let p95 = required_group_size(0.5, 0.05, 0.95, 1.0).unwrap();
        assert!(p95 > p80);
    }
}
