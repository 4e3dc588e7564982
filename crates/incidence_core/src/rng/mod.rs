//! # Sampling Random Number Generation
//!
//! Lorenz curves over survey-scale data have tens of thousands of points, so
//! a uniform subsample of point indices is drawn for rendering. This module
//! provides the seeded generator that draws it.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: generators are always seeded; a generator created
//!   from entropy still records the seed it drew
//! - **Injectability**: callers pass the generator in, so tests fix the seed
//!   while interactive use may reseed per evaluation
//!
//! ## Usage Example
//!
//! ```rust
//! use incidence_core::rng::SampleRng;
//!
//! let mut rng = SampleRng::from_seed(12345);
//! let indices = rng.sample_indices(50_000, 10_000);
//! assert_eq!(indices.len(), 10_000);
//! ```

mod sample;

pub use sample::{SampleRng, DEFAULT_SAMPLE_SEED};
