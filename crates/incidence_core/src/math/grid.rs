//! Evaluation grids for density curves.
//!
//! The density of a shocked distribution is only comparable with the original
//! one when both are evaluated at the same points, so the grid is built once
//! from the original distribution and reused for every scenario.

use serde::Serialize;

use crate::types::StatsError;

/// Default number of grid points for density curves.
pub const DEFAULT_GRID_POINTS: usize = 1000;

/// Equally spaced evaluation points over a closed interval.
///
/// # Examples
///
/// ```
/// use incidence_core::math::grid::EvaluationGrid;
///
/// let grid = EvaluationGrid::linspace(0.0, 10.0, 5).unwrap();
/// assert_eq!(grid.points(), &[0.0, 2.5, 5.0, 7.5, 10.0]);
/// assert_eq!(grid.step(), 2.5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluationGrid {
    points: Vec<f64>,
}

impl EvaluationGrid {
    /// Build `n` equally spaced points from `start` to `end`, both included.
    ///
    /// A single-point grid contains only `start`.
    ///
    /// # Errors
    ///
    /// `StatsError::InvalidGrid` when `n` is zero, a bound is not finite, or
    /// `end < start`.
    pub fn linspace(start: f64, end: f64, n: usize) -> Result<Self, StatsError> {
        if n == 0 {
            return Err(StatsError::InvalidGrid(
                "grid needs at least one point".to_string(),
            ));
        }
        if !start.is_finite() || !end.is_finite() {
            return Err(StatsError::InvalidGrid(format!(
                "bounds must be finite: [{}, {}]",
                start, end
            )));
        }
        if end < start {
            return Err(StatsError::InvalidGrid(format!(
                "end {} is below start {}",
                end, start
            )));
        }
        if n == 1 {
            return Ok(Self {
                points: vec![start],
            });
        }

        let step = (end - start) / (n - 1) as f64;
        let mut points: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
        points[n - 1] = end;
        Ok(Self { points })
    }

    /// Grid from zero to the largest of `values`, as used for income densities.
    ///
    /// # Errors
    ///
    /// `StatsError::EmptyDistribution` when `values` is empty; grid errors as
    /// for [`EvaluationGrid::linspace`].
    pub fn from_max(values: &[f64], n: usize) -> Result<Self, StatsError> {
        let max = values
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .ok_or_else(|| StatsError::EmptyDistribution("no observations".to_string()))?;
        Self::linspace(0.0, max.max(0.0), n)
    }

    /// The grid points.
    #[inline]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed grid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point.
    pub fn start(&self) -> f64 {
        self.points[0]
    }

    /// Last point.
    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Spacing between consecutive points (zero for a single-point grid).
    pub fn step(&self) -> f64 {
        if self.points.len() < 2 {
            0.0
        } else {
            self.points[1] - self.points[0]
        }
    }
}
