//! # Adapter Survey (A: Adapter)
//!
//! Loads household survey extracts into the immutable member table used by
//! the incidence pipeline.
//!
//! The extract is a CSV with one row per surveyed individual and the
//! survey's own column names (`DIRECTORIO`, `P6430`, `IMPA_y`, ...). The
//! sector column may be named `seccion_2d` or `sector`.
//!
//! ## Leniency
//!
//! - Blank, single-space or unparsable optional fields load as missing
//! - Integral codes written as floats (`4.0`) are accepted
//! - An empty estimated rent loads as zero
//! - Required fields (household key, age, household size, expansion factor,
//!   baseline per-capita income) fail with the offending line
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use adapter_survey::load_members;
//!
//! let members = load_members("data/sample_survey.csv").unwrap();
//! println!("{} members in {} households", members.len(), members.household_count());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod record;

pub use error::LoadError;
pub use loader::{load_members, read_members};
pub use record::{parse_amount, parse_code, RawMemberRecord};
