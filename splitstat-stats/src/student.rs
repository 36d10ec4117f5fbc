//! Two-Sample Student's t-Test
//!
//! Pooled-variance (equal variance assumed) t-test with a confidence
//! interval for the mean difference.

use crate::{StatsError, mean, sample_variance};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Outcome of a two-sample t-test of `x` against `y`
#[derive(Debug, Clone, Copy)]
pub struct TwoSampleTTest {
    /// t statistic
    pub statistic: f64,
    /// Degrees of freedom (n_x + n_y - 2)
    pub degrees_of_freedom: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// mean(x) - mean(y)
    pub mean_difference: f64,
    /// Pooled standard error of the mean difference
    pub standard_error: f64,
}

impl TwoSampleTTest {
    /// Confidence interval for the mean difference at the given level.
    ///
    /// With zero pooled variance the interval collapses to the observed
    /// difference.
    pub fn confidence_interval(&self, confidence: f64) -> Result<(f64, f64), StatsError> {
        if self.standard_error == 0.0 {
            return Ok((self.mean_difference, self.mean_difference));
        }

        let t_dist = StudentsT::new(0.0, 1.0, self.degrees_of_freedom)
            .map_err(|e| StatsError::Distribution(e.to_string()))?;
        let t_critical = t_dist.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
        let margin = t_critical * self.standard_error;

        Ok((
            self.mean_difference - margin,
            self.mean_difference + margin,
        ))
    }
}

/// Pooled-variance two-sample t-test.
///
/// The reported difference is mean(x) − mean(y). Both samples need at least
/// two values. Identical zero-variance samples short-circuit to t = 0,
/// p = 1 rather than dividing by a zero standard error.
pub fn two_sample_t(x: &[f64], y: &[f64]) -> Result<TwoSampleTTest, StatsError> {
    let n_x = x.len();
    let n_y = y.len();

    if n_x < 2 || n_y < 2 {
        return Err(StatsError::TooFewSamples {
            got: n_x.min(n_y),
            min: 2,
        });
    }

    let mean_difference = mean(x) - mean(y);
    let df = (n_x + n_y - 2) as f64;

    let pooled_variance = ((n_x - 1) as f64 * sample_variance(x)
        + (n_y - 1) as f64 * sample_variance(y))
        / df;
    let standard_error = (pooled_variance * (1.0 / n_x as f64 + 1.0 / n_y as f64)).sqrt();

    if standard_error == 0.0 {
        return Ok(TwoSampleTTest {
            statistic: 0.0,
            degrees_of_freedom: df,
            p_value: 1.0,
            mean_difference,
            standard_error,
        });
    }

    let statistic = mean_difference / standard_error;

    let t_dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = (2.0 * (1.0 - t_dist.cdf(statistic.abs()))).clamp(0.0, 1.0);

    Ok(TwoSampleTTest {
        statistic,
        degrees_of_freedom: df,
        p_value,
        mean_difference,
        standard_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_samples() {
        let sample: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let result = two_sample_t(&sample, &sample).unwrap();

        assert_relative_eq!(result.statistic, 0.0);
        assert_relative_eq!(result.mean_difference, 0.0);
        assert!(result.p_value > 0.99);
    }

    #[test]
    fn test_zero_variance_samples() {
        let x = vec![3.0; 5];
        let y = vec![3.0; 5];
        let result = two_sample_t(&x, &y).unwrap();

        assert_relative_eq!(result.p_value, 1.0);
        let ci = result.confidence_interval(0.88).unwrap();
        assert_eq!(ci, (0.0, 0.0));
    }

    #[test]
    fn test_clear_difference() {
        let x: Vec<f64> = (0..50).map(|i| 8.0 + (i % 3) as f64 * 0.1).collect();
        let y: Vec<f64> = (0..50).map(|i| 2.0 + (i % 3) as f64 * 0.1).collect();

        let result = two_sample_t(&x, &y).unwrap();
        assert!((result.mean_difference - 6.0).abs() < 0.1);
        assert!(result.p_value < 0.001);

        let ci = result.confidence_interval(0.95).unwrap();
        assert!(ci.0 > 0.0);
        assert!(ci.1 > ci.0);
    }

    #[test]
    fn test_ci_sign_flips_with_order() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![5.0, 6.0, 7.0, 8.0];

        let forward = two_sample_t(&x, &y).unwrap();
        let reverse = two_sample_t(&y, &x).unwrap();

        assert_relative_eq!(forward.mean_difference, -reverse.mean_difference);
        assert_relative_eq!(forward.p_value, reverse.p_value);

        let ci_f = forward.confidence_interval(0.9).unwrap();
        let ci_r = reverse.confidence_interval(0.9).unwrap();
        assert_relative_eq!(ci_f.0, -ci_r.1, epsilon = 1e-12);
        assert_relative_eq!(ci_f.1, -ci_r.0, epsilon = 1e-12);
    }

    #[test]
    fn test_too_few_samples() {
        assert!(two_sample_t(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_wider_interval_at_higher_confidence() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 3.0, 4.0, 5.0, 6.0];
        let result = two_sample_t(&x, &y).unwrap();

        let ci_90 = result.confidence_interval(0.90).unwrap();
        let ci_99 = result.confidence_interval(0.99).unwrap();
        assert!(ci_99.1 - ci_99.0 > ci_90.1 - ci_90.0);
    }
}
