//! # Incidence Metrics (L3: Distribution Analysis)
//!
//! Compares the per-capita income distribution before and after a sector
//! income shock.
//!
//! This crate provides:
//! - Lorenz curves, rendering samples and the Gini coefficient
//! - Weighted poverty rates with a breakdown by survey domain
//! - Income reference lines for density plots
//! - [`ScenarioEngine`]: evaluates scenarios against a precomputed [`Baseline`]
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          incidence_metrics (L3)         │
//! ├─────────────────────────────────────────┤
//! │  lorenz     - LorenzCurve, Gini         │
//! │  poverty    - PovertyProfile            │
//! │  reference  - reference lines           │
//! │  engine     - Baseline, ScenarioEngine  │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │          incidence_shock (L2)           │
//! │  Scenario application, ShockedTable     │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │          incidence_core (L1)            │
//! │  Member table, weighted KDE and median  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//!
//! Evaluation is single-threaded and synchronous. The member table and the
//! baseline are shared behind `Arc` and never mutated after construction;
//! each evaluation returns a fresh [`ScenarioOutcome`].

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod lorenz;
pub mod poverty;
pub mod reference;

pub use engine::{
    reconcile_baseline, Baseline, BaselineReconciliation, Comparison, DensityOverlay,
    EngineSettings, ScenarioEngine, ScenarioOutcome, ScenarioView,
};
pub use error::MetricsError;
pub use lorenz::{lorenz_curve, LorenzCurve, LorenzSample, DEFAULT_LORENZ_POINTS};
pub use poverty::{
    classify_poverty, is_poor, poverty_line, DomainPoverty, PovertyProfile, PovertyRule,
    NON_CITY_LINE, RURAL_CITY_LINE, URBAN_CITY_LINE,
};
pub use reference::{reference_markers, ReferenceLine, ReferenceMarker};
