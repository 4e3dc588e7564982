//! Lorenz curve and Gini coefficient.
//!
//! Curves are unweighted: every observation counts as one person regardless
//! of its expansion factor.

use incidence_core::rng::SampleRng;
use incidence_core::types::StatsError;
use serde::Serialize;

use crate::error::MetricsError;

/// Maximum number of points kept when sampling a curve for rendering.
pub const DEFAULT_LORENZ_POINTS: usize = 10_000;

/// Lorenz curve of an income distribution.
///
/// Holds `n + 1` points for `n` observations, starting at (0, 0) and ending
/// at (1, 1).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LorenzCurve {
    /// Cumulative population share
    population: Vec<f64>,
    /// Cumulative income share
    income: Vec<f64>,
}

impl LorenzCurve {
    /// Cumulative population shares.
    pub fn population(&self) -> &[f64] {
        &self.population
    }

    /// Cumulative income shares.
    pub fn income(&self) -> &[f64] {
        &self.income
    }

    /// Number of points, including the origin.
    #[inline]
    pub fn len(&self) -> usize {
        self.population.len()
    }

    /// Returns true if the curve has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Gini coefficient: one minus twice the area under the curve.
    ///
    /// The area is integrated with the trapezoid rule over every point.
    pub fn gini(&self) -> f64 {
        let area: f64 = self
            .population
            .windows(2)
            .zip(self.income.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
            .sum();
        1.0 - 2.0 * area
    }

    /// The points selected by `sample`, in curve order.
    ///
    /// # Errors
    ///
    /// `MetricsError::SampleMismatch` if the sample was drawn for a curve of
    /// another length.
    pub fn sampled(&self, sample: &LorenzSample) -> Result<LorenzCurve, MetricsError> {
        if sample.source_len != self.len() {
            return Err(MetricsError::SampleMismatch {
                expected: sample.source_len,
                actual: self.len(),
            });
        }
        Ok(LorenzCurve {
            population: sample.indices.iter().map(|&i| self.population[i]).collect(),
            income: sample.indices.iter().map(|&i| self.income[i]).collect(),
        })
    }
}

/// Compute the Lorenz curve of `values`.
///
/// # Errors
///
/// - `EmptyDistribution` if `values` is empty or sums to zero
/// - `NonFiniteValue` if a value is NaN or infinite
///
/// # Examples
///
/// ```
/// use incidence_metrics::lorenz_curve;
///
/// let curve = lorenz_curve(&[3.0, 1.0, 2.0, 4.0]).unwrap();
/// assert_eq!(curve.population(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(curve.income(), &[0.0, 0.1, 0.3, 0.6, 1.0]);
/// ```
pub fn lorenz_curve(values: &[f64]) -> Result<LorenzCurve, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyDistribution(
            "no observations for Lorenz curve".to_string(),
        ));
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(StatsError::NonFiniteValue { index, value });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mut cumulative = Vec::with_capacity(n + 1);
    cumulative.push(0.0);
    let mut running = 0.0;
    for value in &sorted {
        running += value;
        cumulative.push(running);
    }

    let total = running;
    if total == 0.0 {
        return Err(StatsError::EmptyDistribution(
            "total income is zero".to_string(),
        ));
    }

    let population = (0..=n).map(|i| i as f64 / n as f64).collect();
    let income = cumulative.iter().map(|c| c / total).collect();

    Ok(LorenzCurve { population, income })
}

/// Sorted subset of curve point indices used for rendering.
///
/// One sample is drawn per evaluation and applied to both the original and
/// the shocked curve, so their points line up.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LorenzSample {
    indices: Vec<usize>,
    source_len: usize,
}

impl LorenzSample {
    /// Draw up to `max_points` indices for a curve with `len` points.
    ///
    /// The first and last points are always kept. The remaining budget is
    /// filled with interior indices drawn uniformly without replacement.
    /// Curves no longer than the budget keep every point.
    pub fn draw(len: usize, max_points: usize, rng: &mut SampleRng) -> Self {
        let budget = max_points.max(2);
        let indices = if len <= budget {
            (0..len).collect()
        } else {
            let mut indices: Vec<usize> = rng
                .sample_indices(len - 2, budget - 2)
                .into_iter()
                .map(|i| i + 1)
                .collect();
            indices.push(0);
            indices.push(len - 1);
            indices.sort_unstable();
            indices
        };
        Self {
            indices,
            source_len: len,
        }
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Length of the curve the sample was drawn for.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Number of selected points.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no points are selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
