//! Household member records and the immutable member table.
//!
//! One [`Member`] is one surveyed individual. Members of the same household
//! share a [`HouseholdKey`] and the household-level attributes (persons in
//! household, estimated rent). The [`MemberTable`] is loaded once and shared
//! read-only; scenario evaluations derive new columns from it and never
//! mutate it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::codes::{Area, EmployerSize, PersonClass, Sector};
use super::error::StatsError;

/// Composite household identifier (`DIRECTORIO`, `SECUENCIA_P`, `HOGAR`).
///
/// Unique per household, shared by all of its members.
///
/// # Examples
///
/// ```
/// use incidence_core::types::HouseholdKey;
///
/// let key = HouseholdKey::new(5_012_345, 1, 1);
/// assert_eq!(key.to_string(), "5012345-1-1");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HouseholdKey {
    /// Dwelling directory number (`DIRECTORIO`)
    pub directory: u64,
    /// Sequence within the dwelling (`SECUENCIA_P`)
    pub sequence: u32,
    /// Household within the sequence (`HOGAR`)
    pub household: u32,
}

impl HouseholdKey {
    /// Create a household key.
    pub fn new(directory: u64, sequence: u32, household: u32) -> Self {
        Self {
            directory,
            sequence,
            household,
        }
    }
}

impl fmt::Display for HouseholdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.directory, self.sequence, self.household)
    }
}

/// Individual income components, each possibly missing.
///
/// A missing component contributes nothing to a total; it never poisons it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeComponents {
    /// Monetary income of the main activity (`IMPA_y`); the component a shock scales
    pub first_activity: Option<f64>,
    /// In-kind income (`IE_y`)
    pub in_kind: Option<f64>,
    /// Income of the secondary activity (`ISA_y`)
    pub second_activity: Option<f64>,
    /// Income from other sources (`IOF_y`)
    pub other_sources: Option<f64>,
    /// Monetary income of unemployed and inactive persons (`IMDI_y`)
    pub non_employed: Option<f64>,
}

/// One surveyed individual.
///
/// Fields mirror the survey columns the incidence pipeline reads. Codes that
/// only feed branching rules (`employment_position`, `relationship`) stay raw.
///
/// # Examples
///
/// ```
/// use incidence_core::types::{HouseholdKey, Member, Sector, EmployerSize};
///
/// let member = Member::new(HouseholdKey::new(1, 1, 1))
///     .with_sector(Sector::Manufacturing)
///     .with_employer_size(EmployerSize::Medium)
///     .with_first_activity(1_200_000.0)
///     .with_expansion_factor(85.3);
///
/// assert_eq!(member.sector, Some(Sector::Manufacturing));
/// assert_eq!(member.income.first_activity, Some(1_200_000.0));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Household the member belongs to
    pub household: HouseholdKey,
    /// Age in years (`edad`)
    pub age: u32,
    /// Area classification (`AREA_per`)
    pub area: Area,
    /// Urban/rural classification (`CLASE_per`)
    pub class: Option<PersonClass>,
    /// Sector of the main activity (`seccion_2d`)
    pub sector: Option<Sector>,
    /// Employer size (`tipo_empresa`)
    pub employer_size: Option<EmployerSize>,
    /// Informality flag (`informales`)
    pub informality: Option<u32>,
    /// Own-account / fragile contract flag (`cuenta_propia`)
    pub contract: Option<u32>,
    /// Position in the main occupation (`P6430`)
    pub employment_position: Option<u32>,
    /// Relationship to the household head (`P6050`)
    pub relationship: Option<u32>,
    /// Unemployed flag (`DSI == 1`)
    pub unemployed: bool,
    /// Inactive flag (`INI == 1`)
    pub inactive: bool,
    /// Income components
    pub income: IncomeComponents,
    /// Persons in household (`personas_hogar`)
    pub persons_in_household: u32,
    /// Survey expansion factor (`fac_exp_ind_12m`)
    pub expansion_factor: f64,
    /// Estimated rent imputed to the household (`arriendo_estimado`)
    pub estimated_rent: f64,
    /// Per-capita income of the unshocked distribution (`ING_pc_bl_def_arriendo`)
    pub baseline_per_capita: f64,
    /// Survey domain category (`cat_dom`)
    pub domain: Option<String>,
}

impl Member {
    /// Create a member with neutral defaults: a 30-year-old urban city
    /// resident in a one-person household with no income, unit weight and no
    /// employment attributes.
    pub fn new(household: HouseholdKey) -> Self {
        Self {
            household,
            age: 30,
            area: Area::City,
            class: Some(PersonClass::Urban),
            sector: None,
            employer_size: None,
            informality: None,
            contract: None,
            employment_position: None,
            relationship: None,
            unemployed: false,
            inactive: false,
            income: IncomeComponents::default(),
            persons_in_household: 1,
            expansion_factor: 1.0,
            estimated_rent: 0.0,
            baseline_per_capita: 0.0,
            domain: None,
        }
    }

    /// Set the age.
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    /// Set the area.
    pub fn with_area(mut self, area: Area) -> Self {
        self.area = area;
        self
    }

    /// Set the person class.
    pub fn with_class(mut self, class: Option<PersonClass>) -> Self {
        self.class = class;
        self
    }

    /// Set the sector.
    pub fn with_sector(mut self, sector: Sector) -> Self {
        self.sector = Some(sector);
        self
    }

    /// Set the employer size.
    pub fn with_employer_size(mut self, size: EmployerSize) -> Self {
        self.employer_size = Some(size);
        self
    }

    /// Set the informality flag.
    pub fn with_informality(mut self, flag: u32) -> Self {
        self.informality = Some(flag);
        self
    }

    /// Set the own-account / fragile contract flag.
    pub fn with_contract(mut self, flag: u32) -> Self {
        self.contract = Some(flag);
        self
    }

    /// Set the employment position code (`P6430`).
    pub fn with_employment_position(mut self, code: u32) -> Self {
        self.employment_position = Some(code);
        self
    }

    /// Set the relationship-to-head code (`P6050`).
    pub fn with_relationship(mut self, code: u32) -> Self {
        self.relationship = Some(code);
        self
    }

    /// Set the unemployed and inactive flags.
    pub fn with_non_employment(mut self, unemployed: bool, inactive: bool) -> Self {
        self.unemployed = unemployed;
        self.inactive = inactive;
        self
    }

    /// Replace all income components.
    pub fn with_income(mut self, income: IncomeComponents) -> Self {
        self.income = income;
        self
    }

    /// Set the main activity income.
    pub fn with_first_activity(mut self, amount: f64) -> Self {
        self.income.first_activity = Some(amount);
        self
    }

    /// Set persons in household.
    pub fn with_persons_in_household(mut self, persons: u32) -> Self {
        self.persons_in_household = persons;
        self
    }

    /// Set the expansion factor.
    pub fn with_expansion_factor(mut self, factor: f64) -> Self {
        self.expansion_factor = factor;
        self
    }

    /// Set the estimated household rent.
    pub fn with_estimated_rent(mut self, rent: f64) -> Self {
        self.estimated_rent = rent;
        self
    }

    /// Set the baseline per-capita income.
    pub fn with_baseline_per_capita(mut self, income: f64) -> Self {
        self.baseline_per_capita = income;
        self
    }

    /// Set the survey domain category.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Immutable table of household members.
///
/// Construction checks the two attributes every downstream statistic relies
/// on: expansion factors are positive and finite, and every household has at
/// least one person.
///
/// # Examples
///
/// ```
/// use incidence_core::types::{HouseholdKey, Member, MemberTable};
///
/// let table = MemberTable::new(vec![
///     Member::new(HouseholdKey::new(1, 1, 1)).with_expansion_factor(10.0),
///     Member::new(HouseholdKey::new(1, 1, 1)).with_expansion_factor(5.0),
///     Member::new(HouseholdKey::new(2, 1, 1)).with_expansion_factor(7.5),
/// ])
/// .unwrap();
///
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.household_count(), 2);
/// assert_eq!(table.total_weight(), 22.5);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MemberTable {
    members: Vec<Member>,
}

impl MemberTable {
    /// Build a table, validating expansion factors and household sizes.
    pub fn new(members: Vec<Member>) -> Result<Self, StatsError> {
        for (index, member) in members.iter().enumerate() {
            let factor = member.expansion_factor;
            if !factor.is_finite() || factor <= 0.0 {
                return Err(StatsError::InvalidWeight {
                    index,
                    value: factor,
                });
            }
            if member.persons_in_household == 0 {
                return Err(StatsError::InvalidHouseholdSize {
                    index,
                    value: member.persons_in_household,
                });
            }
        }
        Ok(Self { members })
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the table has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// All members in load order.
    #[inline]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Iterate over members in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, Member> {
        self.members.iter()
    }

    /// Member at `index`.
    pub fn get(&self, index: usize) -> Option<&Member> {
        self.members.get(index)
    }

    /// Expansion factors column.
    pub fn expansion_factors(&self) -> Vec<f64> {
        self.members.iter().map(|m| m.expansion_factor).collect()
    }

    /// Baseline per-capita income column.
    pub fn baseline_per_capita(&self) -> Vec<f64> {
        self.members.iter().map(|m| m.baseline_per_capita).collect()
    }

    /// Sum of expansion factors (the represented population).
    pub fn total_weight(&self) -> f64 {
        self.members.iter().map(|m| m.expansion_factor).sum()
    }

    /// Number of distinct households.
    pub fn household_count(&self) -> usize {
        self.members
            .iter()
            .map(|m| m.household)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

impl<'a> IntoIterator for &'a MemberTable {
    type Item = &'a Member;
    type IntoIter = std::slice::Iter<'a, Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
