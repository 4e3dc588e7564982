//! Individual total income reconstruction.
//!
//! The total income of a member is rebuilt from its components by an ordered
//! list of rules keyed on employment position and non-employment status. The
//! last matching rule wins. Zero-income overrides for dependants and young
//! members are applied afterwards, also in order.

use incidence_core::types::{IncomeComponents, Member, PersonClass};

/// Employment position codes (`P6430`) for own-account workers and employers.
const SELF_EMPLOYED_POSITIONS: [u32; 2] = [4, 5];
/// Employment position code (`P6430`) for unpaid family workers.
const UNPAID_FAMILY_POSITION: u32 = 6;
/// Relationship codes (`P6050`) whose income is not counted in the household.
const EXCLUDED_RELATIONSHIPS: [u32; 3] = [6, 7, 8];

/// Income components summed into a member's total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentSet {
    /// Main activity, in-kind, secondary activity and other sources
    Employee,
    /// Main activity, secondary activity and other sources
    SelfEmployed,
    /// Secondary activity and other sources
    UnpaidFamily,
    /// Non-employed income and other sources
    NonEmployed,
}

impl ComponentSet {
    /// Sum the components in the set. Missing components contribute zero.
    ///
    /// `first_activity` is passed separately so that a shocked value can
    /// replace the recorded one.
    pub fn total(&self, income: &IncomeComponents, first_activity: f64) -> f64 {
        let part = |value: Option<f64>| value.unwrap_or(0.0);
        match self {
            ComponentSet::Employee => {
                first_activity
                    + part(income.in_kind)
                    + part(income.second_activity)
                    + part(income.other_sources)
            }
            ComponentSet::SelfEmployed => {
                first_activity + part(income.second_activity) + part(income.other_sources)
            }
            ComponentSet::UnpaidFamily => {
                part(income.second_activity) + part(income.other_sources)
            }
            ComponentSet::NonEmployed => part(income.non_employed) + part(income.other_sources),
        }
    }
}

/// A rule selecting which components form a member's total income.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TotalIncomeRule {
    /// Employment position outside {4, 5, 6}, including a missing one
    Employee,
    /// Employment position 4 or 5
    SelfEmployed,
    /// Employment position 6
    UnpaidFamily,
    /// Unemployed or inactive member
    NonEmployed,
}

impl TotalIncomeRule {
    /// Rules in application order.
    pub const ORDERED: [TotalIncomeRule; 4] = [
        TotalIncomeRule::Employee,
        TotalIncomeRule::SelfEmployed,
        TotalIncomeRule::UnpaidFamily,
        TotalIncomeRule::NonEmployed,
    ];

    /// Returns true if the rule applies to the member.
    pub fn matches(&self, member: &Member) -> bool {
        let position = member.employment_position;
        match self {
            TotalIncomeRule::Employee => !position.is_some_and(|code| {
                SELF_EMPLOYED_POSITIONS.contains(&code) || code == UNPAID_FAMILY_POSITION
            }),
            TotalIncomeRule::SelfEmployed => {
                position.is_some_and(|code| SELF_EMPLOYED_POSITIONS.contains(&code))
            }
            TotalIncomeRule::UnpaidFamily => position == Some(UNPAID_FAMILY_POSITION),
            TotalIncomeRule::NonEmployed => member.unemployed || member.inactive,
        }
    }

    /// Components summed when the rule applies.
    pub fn components(&self) -> ComponentSet {
        match self {
            TotalIncomeRule::Employee => ComponentSet::Employee,
            TotalIncomeRule::SelfEmployed => ComponentSet::SelfEmployed,
            TotalIncomeRule::UnpaidFamily => ComponentSet::UnpaidFamily,
            TotalIncomeRule::NonEmployed => ComponentSet::NonEmployed,
        }
    }

    /// The last rule in [`Self::ORDERED`] that matches the member.
    pub fn select(member: &Member) -> TotalIncomeRule {
        Self::ORDERED
            .iter()
            .rev()
            .copied()
            .find(|rule| rule.matches(member))
            .unwrap_or(TotalIncomeRule::Employee)
    }
}

/// A rule forcing a member's total income to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZeroIncomeRule {
    /// Domestic staff, their relatives and boarders (`P6050` in {6, 7, 8})
    ExcludedRelationship,
    /// Rural members younger than 10
    RuralUnderTen,
    /// Members outside the city younger than 12
    NonCityUnderTwelve,
}

impl ZeroIncomeRule {
    /// Rules in application order.
    pub const ORDERED: [ZeroIncomeRule; 3] = [
        ZeroIncomeRule::ExcludedRelationship,
        ZeroIncomeRule::RuralUnderTen,
        ZeroIncomeRule::NonCityUnderTwelve,
    ];

    /// Returns true if the rule applies to the member.
    pub fn matches(&self, member: &Member) -> bool {
        match self {
            ZeroIncomeRule::ExcludedRelationship => member
                .relationship
                .is_some_and(|code| EXCLUDED_RELATIONSHIPS.contains(&code)),
            ZeroIncomeRule::RuralUnderTen => {
                member.age < 10 && member.class == Some(PersonClass::Rural)
            }
            ZeroIncomeRule::NonCityUnderTwelve => member.age < 12 && !member.area.is_city(),
        }
    }

    /// Returns true if any zero-income rule applies to the member.
    pub fn any_matches(member: &Member) -> bool {
        Self::ORDERED.iter().any(|rule| rule.matches(member))
    }
}

/// Total income of a member, given a (possibly shocked) main activity income.
///
/// # Examples
///
/// ```
/// use incidence_core::types::{HouseholdKey, IncomeComponents, Member};
/// use incidence_shock::individual_income;
///
/// let member = Member::new(HouseholdKey::new(1, 1, 1))
///     .with_employment_position(1)
///     .with_income(IncomeComponents {
///         first_activity: Some(100.0),
///         in_kind: Some(10.0),
///         second_activity: None,
///         other_sources: Some(5.0),
///         non_employed: None,
///     });
///
/// assert_eq!(individual_income(&member, 50.0), 65.0);
/// ```
pub fn individual_income(member: &Member, first_activity: f64) -> f64 {
    if ZeroIncomeRule::any_matches(member) {
        return 0.0;
    }
    TotalIncomeRule::select(member)
        .components()
        .total(&member.income, first_activity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use incidence_core::types::{Area, HouseholdKey};

    fn income() -> IncomeComponents {
        IncomeComponents {
            first_activity: Some(100.0),
            in_kind: Some(20.0),
            second_activity: Some(30.0),
            other_sources: Some(40.0),
            non_employed: Some(50.0),
        }
    }

    fn member() -> Member {
        Member::new(HouseholdKey::new(1, 1, 1)).with_income(income())
    }

    #[test]
    fn test_employee_total() {
        let m = member().with_employment_position(1);
        assert_eq!(individual_income(&m, 100.0), 190.0);
    }

    #[test]
    fn test_missing_position_is_employee() {
        assert_eq!(TotalIncomeRule::select(&member()), TotalIncomeRule::Employee);
        assert_eq!(individual_income(&member(), 100.0), 190.0);
    }

    #[test]
    fn test_self_employed_excludes_in_kind() {
        for code in [4, 5] {
            let m = member().with_employment_position(code);
            assert_eq!(TotalIncomeRule::select(&m), TotalIncomeRule::SelfEmployed);
            assert_eq!(individual_income(&m, 100.0), 170.0);
        }
    }

    #[test]
    fn test_unpaid_family_excludes_main_activity() {
        let m = member().with_employment_position(6);
        assert_eq!(individual_income(&m, 100.0), 70.0);
        // A shock to the main activity cannot reach this member
        assert_eq!(individual_income(&m, 0.0), 70.0);
    }

    #[test]
    fn test_non_employed_overrides_position() {
        let m = member()
            .with_employment_position(4)
            .with_non_employment(true, false);
        assert_eq!(TotalIncomeRule::select(&m), TotalIncomeRule::NonEmployed);
        assert_eq!(individual_income(&m, 100.0), 90.0);

        let m = member().with_non_employment(false, true);
        assert_eq!(individual_income(&m, 100.0), 90.0);
    }

    #[test]
    fn test_missing_components_contribute_zero() {
        let m = Member::new(HouseholdKey::new(1, 1, 1))
            .with_employment_position(1)
            .with_income(IncomeComponents {
                other_sources: Some(12.5),
                ..IncomeComponents::default()
            });
        assert_eq!(individual_income(&m, 0.0), 12.5);
    }

    #[test]
    fn test_excluded_relationships_zeroed() {
        for code in [6, 7, 8] {
            let m = member().with_relationship(code);
            assert_eq!(individual_income(&m, 100.0), 0.0);
        }
        let head = member().with_relationship(1);
        assert_eq!(individual_income(&head, 100.0), 190.0);
    }

    #[test]
    fn test_rural_child_zeroed() {
        let m = member()
            .with_age(9)
            .with_class(Some(PersonClass::Rural))
            .with_area(Area::City);
        assert_eq!(individual_income(&m, 100.0), 0.0);

        let older = member()
            .with_age(10)
            .with_class(Some(PersonClass::Rural))
            .with_area(Area::City);
        assert_eq!(individual_income(&older, 100.0), 190.0);
    }

    #[test]
    fn test_non_city_child_zeroed() {
        let m = member().with_age(11).with_area(Area::Other);
        assert_eq!(individual_income(&m, 100.0), 0.0);

        let city = member().with_age(11).with_area(Area::City);
        assert_eq!(individual_income(&city, 100.0), 190.0);
    }
}
