//! Shock scenario definition.
//!
//! A [`ShockScenario`] names which workers lose income and by how much:
//! - sectors whose workers are exposed
//! - the employer size those workers must have
//! - informality and fragile-contract flag values that mark vulnerability
//! - the percentage of main activity income that is lost

use incidence_core::types::{EmployerSize, Sector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ShockError;

/// Counterfactual shock to sector-specific income.
///
/// Empty sets match nobody: a scenario with no sectors shocks no one rather
/// than everyone. A scenario without an employer size also shocks no one,
/// because the risk predicate requires an exact size match.
///
/// # Examples
///
/// ```
/// use incidence_core::types::{EmployerSize, Sector};
/// use incidence_shock::ShockScenario;
///
/// let scenario = ShockScenario::new(50.0)
///     .with_sectors([Sector::Manufacturing, Sector::Hospitality])
///     .with_employer_size(EmployerSize::Small)
///     .with_informality([1]);
///
/// assert!(scenario.validate().is_ok());
/// assert_eq!(scenario.retention_factor(), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShockScenario {
    /// Sectors whose workers are exposed
    #[serde(default)]
    pub selected_sectors: BTreeSet<Sector>,
    /// Employer size exposed workers must have
    #[serde(default)]
    pub employer_size: Option<EmployerSize>,
    /// Informality flag values that mark a worker as vulnerable
    #[serde(default)]
    pub informality_values: BTreeSet<u32>,
    /// Contract flag values that mark a worker as vulnerable
    #[serde(default)]
    pub contract_values: BTreeSet<u32>,
    /// Percentage of main activity income lost, in [0, 100]
    pub shock_pct: f64,
}

impl ShockScenario {
    /// Create a scenario with the given magnitude and empty predicates.
    pub fn new(shock_pct: f64) -> Self {
        Self {
            selected_sectors: BTreeSet::new(),
            employer_size: None,
            informality_values: BTreeSet::new(),
            contract_values: BTreeSet::new(),
            shock_pct,
        }
    }

    /// A scenario that shocks no one.
    pub fn none() -> Self {
        Self::new(0.0)
    }

    /// Add exposed sectors.
    pub fn with_sectors(mut self, sectors: impl IntoIterator<Item = Sector>) -> Self {
        self.selected_sectors.extend(sectors);
        self
    }

    /// Set the employer size.
    pub fn with_employer_size(mut self, size: EmployerSize) -> Self {
        self.employer_size = Some(size);
        self
    }

    /// Add informality flag values.
    pub fn with_informality(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.informality_values.extend(values);
        self
    }

    /// Add contract flag values.
    pub fn with_contract(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.contract_values.extend(values);
        self
    }

    /// Check the shock magnitude.
    ///
    /// # Errors
    ///
    /// `ShockError::InvalidScenario` when `shock_pct` is not a finite value
    /// in [0, 100].
    pub fn validate(&self) -> Result<(), ShockError> {
        if !self.shock_pct.is_finite() || !(0.0..=100.0).contains(&self.shock_pct) {
            return Err(ShockError::InvalidScenario(format!(
                "shock_pct {} outside [0, 100]",
                self.shock_pct
            )));
        }
        Ok(())
    }

    /// Share of main activity income kept by exposed workers.
    #[inline]
    pub fn retention_factor(&self) -> f64 {
        1.0 - self.shock_pct / 100.0
    }

    /// Returns true when no member can match the risk predicate.
    pub fn is_vacuous(&self) -> bool {
        self.selected_sectors.is_empty()
            || self.employer_size.is_none()
            || (self.informality_values.is_empty() && self.contract_values.is_empty())
    }
}

impl Default for ShockScenario {
    fn default() -> Self {
        Self::none()
    }
}
