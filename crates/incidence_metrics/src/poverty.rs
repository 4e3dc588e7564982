//! Monetary poverty classification.
//!
//! A member is poor when the per-capita income of their household falls
//! below the poverty line for where they live. Lines are selected by an
//! ordered list of rules; the last matching rule wins. A member no rule
//! matches has no line and is never poor.

use incidence_core::types::{Member, MemberTable, PersonClass, StatsError};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::MetricsError;

/// Poverty line for rural members of the city stratum.
pub const RURAL_CITY_LINE: f64 = 175_783.22;
/// Poverty line for urban members of the city stratum.
pub const URBAN_CITY_LINE: f64 = 294_285.32;
/// Poverty line outside the city stratum.
pub const NON_CITY_LINE: f64 = 294_897.29;

/// Rule selecting a member's poverty line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PovertyRule {
    /// Rural class inside the city stratum
    RuralCity,
    /// Urban class inside the city stratum
    UrbanCity,
    /// Outside the city stratum
    NonCity,
}

impl PovertyRule {
    /// Rules in application order.
    pub const ORDERED: [PovertyRule; 3] = [
        PovertyRule::RuralCity,
        PovertyRule::UrbanCity,
        PovertyRule::NonCity,
    ];

    /// Returns true if the rule applies to the member.
    pub fn matches(&self, member: &Member) -> bool {
        match self {
            // NOTE: the rural line is applied inside the city stratum, where
            // the lower "rest of country" line would normally sit outside it.
            // Kept as recorded in the survey processing it reproduces.
            PovertyRule::RuralCity => {
                member.class == Some(PersonClass::Rural) && member.area.is_city()
            }
            PovertyRule::UrbanCity => {
                member.class == Some(PersonClass::Urban) && member.area.is_city()
            }
            PovertyRule::NonCity => !member.area.is_city(),
        }
    }

    /// Poverty line of the rule.
    pub fn line(&self) -> f64 {
        match self {
            PovertyRule::RuralCity => RURAL_CITY_LINE,
            PovertyRule::UrbanCity => URBAN_CITY_LINE,
            PovertyRule::NonCity => NON_CITY_LINE,
        }
    }
}

/// Poverty line applying to a member, if any rule matches.
pub fn poverty_line(member: &Member) -> Option<f64> {
    PovertyRule::ORDERED
        .iter()
        .rev()
        .find(|rule| rule.matches(member))
        .map(PovertyRule::line)
}

/// Returns true if `income` is below the member's poverty line.
pub fn is_poor(member: &Member, income: f64) -> bool {
    poverty_line(member).is_some_and(|line| income < line)
}

/// Weighted poverty rate, in percent.
///
/// `income` is a per-capita income column aligned with `members`.
///
/// # Errors
///
/// - `MisalignedColumns` if `income` has a different length than `members`
/// - `EmptyDistribution` if the table is empty
///
/// # Examples
///
/// ```
/// use incidence_core::types::{HouseholdKey, Member, MemberTable};
/// use incidence_metrics::classify_poverty;
///
/// let members = MemberTable::new(vec![
///     Member::new(HouseholdKey::new(1, 1, 1)).with_expansion_factor(1.0),
///     Member::new(HouseholdKey::new(2, 1, 1)).with_expansion_factor(3.0),
/// ])
/// .unwrap();
///
/// let rate = classify_poverty(&members, &[100_000.0, 900_000.0]).unwrap();
/// assert_eq!(rate, 25.0);
/// ```
pub fn classify_poverty(members: &MemberTable, income: &[f64]) -> Result<f64, MetricsError> {
    Ok(PovertyProfile::compute(members, income)?.rate_pct)
}

/// Poverty among members of one survey domain.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DomainPoverty {
    /// Weighted poverty rate, in percent
    pub rate_pct: f64,
    /// Represented population below the line
    pub poor_population: f64,
    /// Represented population
    pub population: f64,
}

impl DomainPoverty {
    fn add(&mut self, weight: f64, poor: bool) {
        self.population += weight;
        if poor {
            self.poor_population += weight;
        }
    }

    fn finish(&mut self) {
        self.rate_pct = self.poor_population / self.population * 100.0;
    }
}

/// Poverty rate with its weighted population and a breakdown by domain.
///
/// Members without a domain count towards the overall rate only.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PovertyProfile {
    /// Weighted poverty rate, in percent
    pub rate_pct: f64,
    /// Represented population below the line
    pub poor_population: f64,
    /// Represented population
    pub population: f64,
    /// Poverty by survey domain (`cat_dom`)
    pub by_domain: BTreeMap<String, DomainPoverty>,
}

impl PovertyProfile {
    /// Classify every member and aggregate by expansion factor.
    ///
    /// # Errors
    ///
    /// See [`classify_poverty`].
    pub fn compute(members: &MemberTable, income: &[f64]) -> Result<Self, MetricsError> {
        if income.len() != members.len() {
            return Err(MetricsError::MisalignedColumns {
                expected: members.len(),
                actual: income.len(),
            });
        }
        if members.is_empty() {
            return Err(StatsError::EmptyDistribution(
                "no members to classify".to_string(),
            )
            .into());
        }

        let mut overall = DomainPoverty::default();
        let mut by_domain: BTreeMap<String, DomainPoverty> = BTreeMap::new();

        for (member, &value) in members.iter().zip(income) {
            let poor = is_poor(member, value);
            overall.add(member.expansion_factor, poor);
            if let Some(domain) = &member.domain {
                by_domain
                    .entry(domain.clone())
                    .or_default()
                    .add(member.expansion_factor, poor);
            }
        }

        overall.finish();
        by_domain.values_mut().for_each(DomainPoverty::finish);

        Ok(Self {
            rate_pct: overall.rate_pct,
            poor_population: overall.poor_population,
            population: overall.population,
            by_domain,
        })
    }
}
