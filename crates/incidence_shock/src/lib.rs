//! # Incidence Shock (L2: Scenario Application)
//!
//! Applies counterfactual sector income shocks to a household survey and
//! rebuilds per-capita household income.
//!
//! This crate provides:
//! - [`ShockScenario`]: which workers are exposed and how much income they lose
//! - Risk classification of members against a scenario
//! - Ordered total-income and zero-income rules
//! - [`IncomeAggregator`]: household aggregation and per-capita income
//! - [`ShockedTable`]: structure-of-arrays result aligned with the member table
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          incidence_shock (L2)           │
//! ├─────────────────────────────────────────┤
//! │  scenario    - ShockScenario            │
//! │  risk        - at-risk predicate        │
//! │  income      - ordered income rules     │
//! │  aggregator  - household join, pc inc.  │
//! │  table       - ShockedTable (SoA)       │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │          incidence_core (L1)            │
//! │  Member table, weighted statistics      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use incidence_core::types::{EmployerSize, HouseholdKey, Member, MemberTable, Sector};
//! use incidence_shock::{IncomeAggregator, ShockScenario};
//!
//! let members = MemberTable::new(vec![
//!     Member::new(HouseholdKey::new(1, 1, 1))
//!         .with_sector(Sector::Hospitality)
//!         .with_employer_size(EmployerSize::Small)
//!         .with_contract(1)
//!         .with_first_activity(900_000.0),
//! ])
//! .unwrap();
//!
//! let scenario = ShockScenario::new(100.0)
//!     .with_sectors([Sector::Hospitality])
//!     .with_employer_size(EmployerSize::Small)
//!     .with_contract([1]);
//!
//! let shocked = IncomeAggregator::apply_shock(&members, &scenario).unwrap();
//! assert_eq!(shocked.at_risk_count(), 1);
//! assert_eq!(shocked.per_capita_income()[0], 0.0);
//! ```

#![warn(missing_docs)]

pub mod aggregator;
pub mod error;
pub mod income;
pub mod risk;
pub mod scenario;
pub mod table;

pub use aggregator::{join_household_totals, IncomeAggregator};
pub use error::ShockError;
pub use income::{individual_income, ComponentSet, TotalIncomeRule, ZeroIncomeRule};
pub use risk::{classify_risk, is_at_risk};
pub use scenario::ShockScenario;
pub use table::ShockedTable;
