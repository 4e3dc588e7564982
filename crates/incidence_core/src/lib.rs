//! # incidence_core: Data Model and Weighted Statistics for Incidence Analysis
//!
//! ## Layer 1 (Foundation) Role
//!
//! incidence_core is the bottom layer of the incidence workspace, providing:
//! - Household survey member records and the immutable member table (`types::member`)
//! - Survey code enumerations: area, person class, sector, employer size (`types::codes`)
//! - Weighted median, mean and variance (`math::weighted`)
//! - Weighted Gaussian kernel density estimation (`math::kde`)
//! - Fixed evaluation grids for density curves (`math::grid`)
//! - A seeded sampling RNG for reproducible subsampling (`rng`)
//! - Error types: `StatsError` (`types::error`)
//!
//! ## Minimal Dependency Principle
//!
//! Layer 1 has no dependencies on other incidence_* crates:
//! - rand: Seeded index sampling
//! - serde: Serialisation of codes and records
//! - thiserror: Error derivation
//!
//! ## Usage Examples
//!
//! ```rust
//! use incidence_core::math::weighted::weighted_median;
//! use incidence_core::math::grid::EvaluationGrid;
//! use incidence_core::math::kde::WeightedKde;
//!
//! let incomes = [120_000.0, 250_000.0, 310_000.0, 480_000.0, 900_000.0];
//! let weights = [10.0, 12.5, 8.0, 20.0, 3.5];
//!
//! let median = weighted_median(&incomes, &weights).unwrap();
//! assert_eq!(median, 310_000.0);
//!
//! let grid = EvaluationGrid::linspace(0.0, 900_000.0, 1000).unwrap();
//! let kde = WeightedKde::new(&incomes, &weights).unwrap();
//! let density = kde.evaluate(grid.points());
//! assert_eq!(density.len(), 1000);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod rng;
pub mod types;
