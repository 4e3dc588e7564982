//! Weighted statistics over survey observations.
//!
//! Every estimator here treats weights as survey expansion factors: an
//! observation with weight 80 stands for 80 people, not one.
//!
//! - [`weighted`]: weighted median, mean, variance and effective sample size
//! - [`kde`]: weighted Gaussian kernel density estimation
//! - [`grid`]: fixed evaluation grids for density curves

pub mod grid;
pub mod kde;
pub mod weighted;

pub use grid::{EvaluationGrid, DEFAULT_GRID_POINTS};
pub use kde::{weighted_kde, BandwidthRule, WeightedKde};
pub use weighted::{effective_sample_size, weighted_mean, weighted_median, weighted_variance};
