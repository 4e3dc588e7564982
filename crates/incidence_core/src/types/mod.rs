//! Survey record types, code enumerations and error types.
//!
//! This module provides:
//! - `member`: Household member records, household keys and the member table
//! - `codes`: Survey code enumerations (area, class, sector, employer size)
//! - `error`: Structured error types for statistics operations
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Member`], [`MemberTable`], [`HouseholdKey`], [`IncomeComponents`] from `member`
//! - [`Area`], [`PersonClass`], [`Sector`], [`EmployerSize`] from `codes`
//! - [`StatsError`] from `error`

pub mod codes;
pub mod error;
pub mod member;

pub use codes::{Area, EmployerSize, PersonClass, Sector, CITY_AREA_CODE};
pub use error::StatsError;
pub use member::{HouseholdKey, IncomeComponents, Member, MemberTable};
