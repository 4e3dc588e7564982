//! Weighted Gaussian kernel density estimation.
//!
//! Each observation contributes a Gaussian bump scaled by its normalised
//! expansion factor, so the estimate describes the represented population
//! rather than the sample.
//!
//! ## Bandwidth
//!
//! The bandwidth is `σ = factor × s`, where `s` is the weighted standard
//! deviation (reliability weights, unbiased) and `factor` depends on the
//! Kish effective sample size `n_eff = (Σw)² / Σw²`:
//!
//! | Rule | factor |
//! |------|--------|
//! | Scott | `n_eff^(-1/5)` |
//! | Silverman | `(3 n_eff / 4)^(-1/5)` |
//!
//! With Scott's rule this reproduces `scipy.stats.gaussian_kde(x, weights=w)`.
//!
//! ## Truncation
//!
//! Observations further than [`KERNEL_SUPPORT`] bandwidths from an evaluation
//! point are skipped. Their combined contribution is below `exp(-32)` of the
//! kernel peak.

use serde::{Deserialize, Serialize};

use super::weighted::{effective_sample_size, weighted_variance};
use crate::types::StatsError;

/// Half-width of the evaluated kernel support, in bandwidths.
pub const KERNEL_SUPPORT: f64 = 8.0;

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Bandwidth selection rule.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandwidthRule {
    /// Scott's rule, `n_eff^(-1/5)`
    #[default]
    Scott,
    /// Silverman's rule, `(3 n_eff / 4)^(-1/5)`
    Silverman,
}

impl BandwidthRule {
    /// Bandwidth factor for a given effective sample size.
    pub fn factor(&self, n_eff: f64) -> f64 {
        match self {
            BandwidthRule::Scott => n_eff.powf(-0.2),
            BandwidthRule::Silverman => (n_eff * 3.0 / 4.0).powf(-0.2),
        }
    }

    /// Rule name.
    pub fn name(&self) -> &'static str {
        match self {
            BandwidthRule::Scott => "scott",
            BandwidthRule::Silverman => "silverman",
        }
    }
}

/// Fitted weighted Gaussian KDE.
///
/// # Examples
///
/// ```
/// use incidence_core::math::kde::{BandwidthRule, WeightedKde};
///
/// let incomes = [100.0, 150.0, 180.0, 220.0, 400.0];
/// let weights = [50.0, 20.0, 35.0, 10.0, 5.0];
///
/// let kde = WeightedKde::with_rule(&incomes, &weights, BandwidthRule::Silverman).unwrap();
/// assert!(kde.bandwidth() > 0.0);
/// assert!(kde.density(150.0) > kde.density(1_000.0));
/// ```
#[derive(Clone, Debug)]
pub struct WeightedKde {
    /// Observations sorted ascending
    points: Vec<f64>,
    /// Normalised weights aligned with `points`
    weights: Vec<f64>,
    bandwidth: f64,
    effective_sample_size: f64,
    rule: BandwidthRule,
}

impl WeightedKde {
    /// Fit with Scott's rule.
    pub fn new(values: &[f64], weights: &[f64]) -> Result<Self, StatsError> {
        Self::with_rule(values, weights, BandwidthRule::Scott)
    }

    /// Fit with an explicit bandwidth rule.
    ///
    /// # Errors
    ///
    /// * Input validation errors as for [`weighted_variance`]
    /// * `StatsError::DegenerateBandwidth` - Zero variance or a single
    ///   effective observation
    pub fn with_rule(
        values: &[f64],
        weights: &[f64],
        rule: BandwidthRule,
    ) -> Result<Self, StatsError> {
        let variance = weighted_variance(values, weights)?;
        let n_eff = effective_sample_size(weights)?;
        let bandwidth = variance.sqrt() * rule.factor(n_eff);
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return Err(StatsError::DegenerateBandwidth(format!(
                "bandwidth {} from variance {} and n_eff {}",
                bandwidth, variance, n_eff
            )));
        }

        let total: f64 = weights.iter().sum();
        let mut pairs: Vec<(f64, f64)> = values
            .iter()
            .copied()
            .zip(weights.iter().map(|w| w / total))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (points, weights): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();

        Ok(Self {
            points,
            weights,
            bandwidth,
            effective_sample_size: n_eff,
            rule,
        })
    }

    /// Kernel standard deviation.
    #[inline]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Kish effective sample size of the fitted weights.
    #[inline]
    pub fn effective_sample_size(&self) -> f64 {
        self.effective_sample_size
    }

    /// Rule used to select the bandwidth.
    #[inline]
    pub fn rule(&self) -> BandwidthRule {
        self.rule
    }

    /// Density at a single point.
    pub fn density(&self, x: f64) -> f64 {
        let reach = KERNEL_SUPPORT * self.bandwidth;
        let lo = self.points.partition_point(|&p| p < x - reach);
        let hi = self.points.partition_point(|&p| p <= x + reach);

        let inv_h = 1.0 / self.bandwidth;
        let sum: f64 = self.points[lo..hi]
            .iter()
            .zip(&self.weights[lo..hi])
            .map(|(&p, &w)| {
                let z = (x - p) * inv_h;
                w * (-0.5 * z * z).exp()
            })
            .sum();
        sum * INV_SQRT_2PI * inv_h
    }

    /// Densities at each of `points`.
    pub fn evaluate(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.density(x)).collect()
    }
}

/// Fit a weighted KDE with Scott's rule and evaluate it at `eval_points`.
///
/// # Examples
///
/// ```
/// use incidence_core::math::kde::weighted_kde;
///
/// let density = weighted_kde(&[1.0, 2.0, 3.0], &[1.0, 2.0, 1.0], &[2.0]).unwrap();
/// assert!(density[0] > 0.0);
/// ```
pub fn weighted_kde(
    values: &[f64],
    weights: &[f64],
    eval_points: &[f64],
) -> Result<Vec<f64>, StatsError> {
    Ok(WeightedKde::new(values, weights)?.evaluate(eval_points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Untruncated reference implementation.
    fn brute_force_density(values: &[f64], weights: &[f64], h: f64, x: f64) -> f64 {
        let total: f64 = weights.iter().sum();
        values
            .iter()
            .zip(weights)
            .map(|(&v, &w)| {
                let z = (x - v) / h;
                (w / total) * (-0.5 * z * z).exp() / (h * (2.0 * std::f64::consts::PI).sqrt())
            })
            .sum()
    }

    #[test]
    fn test_scott_bandwidth_uniform_weights() {
        // Uniform weights: n_eff = n, variance is the unbiased sample variance
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let kde = WeightedKde::new(&values, &[1.0; 5]).unwrap();
        let expected = 2.5_f64.sqrt() * 5.0_f64.powf(-0.2);
        assert_relative_eq!(kde.bandwidth(), expected, epsilon = 1e-12);
        assert_relative_eq!(kde.effective_sample_size(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_silverman_wider_than_scott() {
        // (3/4)^(-1/5) > 1
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let scott = WeightedKde::new(&values, &[1.0; 5]).unwrap();
        let silverman =
            WeightedKde::with_rule(&values, &[1.0; 5], BandwidthRule::Silverman).unwrap();
        assert!(silverman.bandwidth() > scott.bandwidth());
        assert_eq!(silverman.rule(), BandwidthRule::Silverman);
    }

    #[test]
    fn test_density_matches_brute_force() {
        let values = [120.0, 250.0, 250.0, 310.0, 480.0, 900.0, 75.0];
        let weights = [10.0, 12.5, 3.0, 8.0, 20.0, 3.5, 40.0];
        let kde = WeightedKde::new(&values, &weights).unwrap();

        for x in [0.0, 100.0, 250.0, 333.3, 899.0, 2000.0] {
            let expected = brute_force_density(&values, &weights, kde.bandwidth(), x);
            assert_relative_eq!(kde.density(x), expected, epsilon = 1e-15, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_density_integrates_to_one() {
        let values = [10.0, 11.0, 13.0, 20.0, 21.0];
        let weights = [1.0, 2.0, 1.0, 3.0, 1.0];
        let kde = WeightedKde::new(&values, &weights).unwrap();

        let (lo, hi, n) = (-100.0, 150.0, 25_001);
        let dx = (hi - lo) / (n - 1) as f64;
        let integral: f64 = (0..n).map(|i| kde.density(lo + dx * i as f64) * dx).sum();
        assert_relative_eq!(integral, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_weights_shift_mass() {
        let values = [0.0, 100.0];
        let left = WeightedKde::new(&values, &[9.0, 1.0]).unwrap();
        let right = WeightedKde::new(&values, &[1.0, 9.0]).unwrap();
        assert!(left.density(0.0) > left.density(100.0));
        assert!(right.density(100.0) > right.density(0.0));
    }

    #[test]
    fn test_zero_variance_is_degenerate() {
        let result = WeightedKde::new(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(StatsError::DegenerateBandwidth(_))));
    }

    #[test]
    fn test_empty_is_empty_distribution() {
        assert!(matches!(
            weighted_kde(&[], &[], &[0.0]),
            Err(StatsError::EmptyDistribution(_))
        ));
    }

    #[test]
    fn test_zero_weights_is_empty_distribution() {
        assert!(matches!(
            weighted_kde(&[1.0, 2.0], &[0.0, 0.0], &[0.0]),
            Err(StatsError::EmptyDistribution(_))
        ));
    }

    #[test]
    fn test_evaluate_length() {
        let density = weighted_kde(&[1.0, 2.0, 4.0], &[1.0, 1.0, 1.0], &[0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(density.len(), 4);
        assert!(density.iter().all(|d| *d >= 0.0));
    }

    #[test]
    fn test_bandwidth_rule_names() {
        assert_eq!(BandwidthRule::Scott.name(), "scott");
        assert_eq!(BandwidthRule::Silverman.name(), "silverman");
        assert_eq!(BandwidthRule::default(), BandwidthRule::Scott);
    }
}
