//! Structure-of-arrays result of applying a shock.

use incidence_core::types::{HouseholdKey, MemberTable};
use serde::Serialize;
use std::collections::BTreeSet;

/// Columns derived from a member table by one shock evaluation.
///
/// Every column is aligned by row index with the member table it was derived
/// from. The member table itself is never modified.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShockedTable {
    /// Shock magnitude applied, in percent
    pub(crate) shock_pct: f64,
    /// Household key per row
    pub(crate) households: Vec<HouseholdKey>,
    /// Risk flag per row
    pub(crate) at_risk: Vec<bool>,
    /// Main activity income after the shock
    pub(crate) first_activity: Vec<Option<f64>>,
    /// Individual total income after the shock
    pub(crate) individual_income: Vec<f64>,
    /// Household total income, joined onto each member
    pub(crate) household_income: Vec<f64>,
    /// Per-capita household income including estimated rent
    pub(crate) per_capita_income: Vec<f64>,
    /// Expansion factor per row
    pub(crate) weights: Vec<f64>,
}

impl ShockedTable {
    /// Shock magnitude applied, in percent.
    #[inline]
    pub fn shock_pct(&self) -> f64 {
        self.shock_pct
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.at_risk.len()
    }

    /// Returns true if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.at_risk.is_empty()
    }

    /// Household key per row.
    pub fn households(&self) -> &[HouseholdKey] {
        &self.households
    }

    /// Risk flag per row.
    pub fn at_risk(&self) -> &[bool] {
        &self.at_risk
    }

    /// Main activity income after the shock, per row.
    pub fn first_activity(&self) -> &[Option<f64>] {
        &self.first_activity
    }

    /// Individual total income after the shock, per row.
    pub fn individual_income(&self) -> &[f64] {
        &self.individual_income
    }

    /// Household total income, per row.
    pub fn household_income(&self) -> &[f64] {
        &self.household_income
    }

    /// Per-capita household income, per row.
    pub fn per_capita_income(&self) -> &[f64] {
        &self.per_capita_income
    }

    /// Expansion factor per row.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of members at risk.
    pub fn at_risk_count(&self) -> usize {
        self.at_risk.iter().filter(|&&flag| flag).count()
    }

    /// Number of households with at least one member at risk.
    pub fn at_risk_household_count(&self) -> usize {
        self.households
            .iter()
            .zip(&self.at_risk)
            .filter(|(_, &flag)| flag)
            .map(|(key, _)| *key)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Represented population at risk (sum of expansion factors).
    pub fn at_risk_weight(&self) -> f64 {
        self.weights
            .iter()
            .zip(&self.at_risk)
            .filter(|(_, &flag)| flag)
            .map(|(w, _)| w)
            .sum()
    }

    /// Returns true if the table was derived from `members`.
    pub fn is_aligned_with(&self, members: &MemberTable) -> bool {
        self.len() == members.len()
            && members
                .iter()
                .zip(&self.households)
                .all(|(member, key)| member.household == *key)
    }
}
