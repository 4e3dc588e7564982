//! Weighted summary statistics.
//!
//! All functions validate their inputs the same way: values and weights must
//! have equal length, values must be finite, weights must be finite and
//! non-negative, and the total weight must be positive.

use crate::types::StatsError;

/// Validate paired values and weights, returning the total weight.
fn check_inputs(values: &[f64], weights: &[f64]) -> Result<f64, StatsError> {
    if values.len() != weights.len() {
        return Err(StatsError::LengthMismatch {
            values: values.len(),
            weights: weights.len(),
        });
    }
    if values.is_empty() {
        return Err(StatsError::EmptyDistribution(
            "no observations".to_string(),
        ));
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(StatsError::NonFiniteValue { index, value });
    }
    let total = check_weights(weights)?;
    Ok(total)
}

fn check_weights(weights: &[f64]) -> Result<f64, StatsError> {
    if let Some((index, &value)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(StatsError::InvalidWeight { index, value });
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(StatsError::EmptyDistribution(
            "total weight is zero".to_string(),
        ));
    }
    Ok(total)
}

/// Weighted median.
///
/// Pairs are sorted by value with a stable sort, so tied values keep their
/// input order. The cumulative weight is compared against half the total
/// weight and the first value reaching it is returned. With equal weights and
/// an even number of observations this is the lower median.
///
/// # Errors
///
/// * `StatsError::EmptyDistribution` - No observations or zero total weight
/// * `StatsError::LengthMismatch` - Values and weights differ in length
/// * `StatsError::InvalidWeight` / `StatsError::NonFiniteValue` - Bad inputs
///
/// # Examples
///
/// ```
/// use incidence_core::math::weighted::weighted_median;
///
/// // The heavy observation pulls the median to 300
/// let median = weighted_median(&[100.0, 200.0, 300.0], &[1.0, 1.0, 5.0]).unwrap();
/// assert_eq!(median, 300.0);
///
/// assert!(weighted_median(&[], &[]).is_err());
/// ```
pub fn weighted_median(values: &[f64], weights: &[f64]) -> Result<f64, StatsError> {
    let total = check_inputs(values, weights)?;

    let mut pairs: Vec<(f64, f64)> = values.iter().copied().zip(weights.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let cutoff = total / 2.0;
    let mut cumulative = 0.0;
    for &(value, weight) in &pairs {
        cumulative += weight;
        if cumulative >= cutoff {
            return Ok(value);
        }
    }

    // Rounding in the running sum can leave it a hair below the cutoff.
    Ok(pairs[pairs.len() - 1].0)
}

/// Weighted arithmetic mean.
///
/// # Examples
///
/// ```
/// use incidence_core::math::weighted::weighted_mean;
///
/// let mean = weighted_mean(&[10.0, 20.0], &[3.0, 1.0]).unwrap();
/// assert!((mean - 12.5).abs() < 1e-12);
/// ```
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Result<f64, StatsError> {
    let total = check_inputs(values, weights)?;
    let weighted_sum: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    Ok(weighted_sum / total)
}

/// Unbiased weighted variance with reliability weights.
///
/// Uses the correction `V1 - V2 / V1` for the denominator, where `V1` is the
/// sum of weights and `V2` the sum of squared weights. This matches
/// `numpy.cov(x, aweights=w)`.
///
/// # Errors
///
/// Returns `StatsError::DegenerateBandwidth` when the correction vanishes,
/// i.e. all weight sits on a single observation.
pub fn weighted_variance(values: &[f64], weights: &[f64]) -> Result<f64, StatsError> {
    let total = check_inputs(values, weights)?;
    let mean = values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / total;
    let sum_sq_weights: f64 = weights.iter().map(|w| w * w).sum();
    let correction = total - sum_sq_weights / total;
    if correction <= 0.0 {
        return Err(StatsError::DegenerateBandwidth(
            "variance undefined for a single effective observation".to_string(),
        ));
    }
    let squared_deviations: f64 = values
        .iter()
        .zip(weights)
        .map(|(v, w)| w * (v - mean) * (v - mean))
        .sum();
    Ok(squared_deviations / correction)
}

/// Kish effective sample size, `(Σw)² / Σw²`.
///
/// Equals the observation count for uniform weights and shrinks as weights
/// become more unequal.
///
/// # Examples
///
/// ```
/// use incidence_core::math::weighted::effective_sample_size;
///
/// assert!((effective_sample_size(&[2.0; 8]).unwrap() - 8.0).abs() < 1e-12);
/// assert!(effective_sample_size(&[1.0, 9.0]).unwrap() < 2.0);
/// ```
pub fn effective_sample_size(weights: &[f64]) -> Result<f64, StatsError> {
    if weights.is_empty() {
        return Err(StatsError::EmptyDistribution(
            "no observations".to_string(),
        ));
    }
    let total = check_weights(weights)?;
    let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
    Ok(total * total / sum_sq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weighted_median_single() {
        assert_eq!(weighted_median(&[42.0], &[3.0]).unwrap(), 42.0);
    }

    #[test]
    fn test_weighted_median_unsorted_input() {
        let values = [500.0, 100.0, 300.0, 200.0, 400.0];
        let weights = [1.0; 5];
        assert_eq!(weighted_median(&values, &weights).unwrap(), 300.0);
    }

    #[test]
    fn test_weighted_median_even_count_is_lower_median() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(weighted_median(&values, &[1.0; 4]).unwrap(), 2.0);
    }

    #[test]
    fn test_weighted_median_cutoff_is_inclusive() {
        // cumulative weights 5, 10, 20; cutoff 10 is reached exactly at 2.0
        let median = weighted_median(&[1.0, 2.0, 3.0], &[5.0, 5.0, 10.0]).unwrap();
        assert_eq!(median, 2.0);
    }

    #[test]
    fn test_weighted_median_ignores_zero_weight_observations() {
        let median = weighted_median(&[1.0, 1000.0, 2.0], &[1.0, 0.0, 1.0]).unwrap();
        assert_eq!(median, 1.0);
    }

    #[test]
    fn test_weighted_median_empty() {
        assert!(matches!(
            weighted_median(&[], &[]),
            Err(StatsError::EmptyDistribution(_))
        ));
    }

    #[test]
    fn test_weighted_median_zero_total_weight() {
        assert!(matches!(
            weighted_median(&[1.0, 2.0], &[0.0, 0.0]),
            Err(StatsError::EmptyDistribution(_))
        ));
    }

    #[test]
    fn test_weighted_median_length_mismatch() {
        assert_eq!(
            weighted_median(&[1.0, 2.0], &[1.0]),
            Err(StatsError::LengthMismatch {
                values: 2,
                weights: 1
            })
        );
    }

    #[test]
    fn test_weighted_median_rejects_negative_weight() {
        assert!(matches!(
            weighted_median(&[1.0, 2.0], &[1.0, -1.0]),
            Err(StatsError::InvalidWeight { index: 1, .. })
        ));
    }

    #[test]
    fn test_weighted_median_rejects_nan_value() {
        assert!(matches!(
            weighted_median(&[1.0, f64::NAN], &[1.0, 1.0]),
            Err(StatsError::NonFiniteValue { index: 1, .. })
        ));
    }

    #[test]
    fn test_weighted_median_scale_invariant_non_power_of_two() {
        let values = [10.0, 20.0, 30.0, 40.0];
        let weights = [1.0, 4.0, 2.0, 2.0];
        let base = weighted_median(&values, &weights).unwrap();
        let scaled: Vec<f64> = weights.iter().map(|w| w * 3.7).collect();
        assert_eq!(weighted_median(&values, &scaled).unwrap(), base);
    }

    #[test]
    fn test_weighted_mean() {
        assert_relative_eq!(
            weighted_mean(&[1.0, 2.0, 3.0], &[1.0, 1.0, 2.0]).unwrap(),
            2.25,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_weighted_variance_matches_unbiased_for_uniform_weights() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // unbiased sample variance of this classic set is 32/7
        let var = weighted_variance(&values, &[1.0; 8]).unwrap();
        assert_relative_eq!(var, 32.0 / 7.0, epsilon = 1e-12);

        // and is unchanged by scaling the weights
        let var_scaled = weighted_variance(&values, &[5.0; 8]).unwrap();
        assert_relative_eq!(var_scaled, 32.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_variance_single_observation() {
        assert!(matches!(
            weighted_variance(&[3.0], &[2.0]),
            Err(StatsError::DegenerateBandwidth(_))
        ));
    }

    #[test]
    fn test_effective_sample_size() {
        assert_relative_eq!(
            effective_sample_size(&[1.0, 1.0, 1.0, 1.0]).unwrap(),
            4.0,
            epsilon = 1e-12
        );
        // (1 + 3)^2 / (1 + 9) = 1.6
        assert_relative_eq!(
            effective_sample_size(&[1.0, 3.0]).unwrap(),
            1.6,
            epsilon = 1e-12
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn sample_strategy() -> impl Strategy<Value = Vec<f64>> {
            prop::collection::vec(0.0..1_000_000.0_f64, 1..60)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn test_equal_weights_match_unweighted_lower_median(values in sample_strategy()) {
                let weights = vec![1.0; values.len()];
                let mut sorted = values.clone();
                sorted.sort_by(|a, b| a.total_cmp(b));
                let lower_median = sorted[(sorted.len() - 1) / 2];

                prop_assert_eq!(weighted_median(&values, &weights).unwrap(), lower_median);
            }

            #[test]
            fn test_median_invariant_to_weight_scaling(
                values in sample_strategy(),
                exponent in -8i32..8,
                seed_weight in 0.5..50.0_f64,
            ) {
                // Powers of two scale exactly, so cumulative sums compare identically.
                let scale = 2.0_f64.powi(exponent);
                let weights: Vec<f64> = (0..values.len())
                    .map(|i| seed_weight + i as f64)
                    .collect();
                let scaled: Vec<f64> = weights.iter().map(|w| w * scale).collect();

                prop_assert_eq!(
                    weighted_median(&values, &weights).unwrap(),
                    weighted_median(&values, &scaled).unwrap()
                );
            }

            #[test]
            fn test_median_within_range(values in sample_strategy()) {
                let weights: Vec<f64> = (0..values.len()).map(|i| 1.0 + i as f64).collect();
                let median = weighted_median(&values, &weights).unwrap();
                let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(median >= min && median <= max);
            }
        }
    }
}
