//! Risk classification of members against a shock scenario.

use incidence_core::types::{Member, MemberTable};

use crate::scenario::ShockScenario;

/// Returns true if the member is exposed to the scenario's shock.
///
/// A member is at risk when all three hold:
/// - their sector is one of the selected sectors
/// - their employer size equals the scenario's employer size
/// - their informality flag or their contract flag is one of the listed values
///
/// A missing attribute never matches, so missing data classifies as not at
/// risk.
///
/// # Examples
///
/// ```
/// use incidence_core::types::{EmployerSize, HouseholdKey, Member, Sector};
/// use incidence_shock::{is_at_risk, ShockScenario};
///
/// let scenario = ShockScenario::new(50.0)
///     .with_sectors([Sector::Manufacturing])
///     .with_employer_size(EmployerSize::Medium)
///     .with_informality([1]);
///
/// let worker = Member::new(HouseholdKey::new(1, 1, 1))
///     .with_sector(Sector::Manufacturing)
///     .with_employer_size(EmployerSize::Medium)
///     .with_informality(1);
///
/// assert!(is_at_risk(&worker, &scenario));
/// ```
pub fn is_at_risk(member: &Member, scenario: &ShockScenario) -> bool {
    let in_sector = member
        .sector
        .is_some_and(|sector| scenario.selected_sectors.contains(&sector));

    let size_matches = match (member.employer_size, scenario.employer_size) {
        (Some(size), Some(target)) => size == target,
        _ => false,
    };

    let informal = member
        .informality
        .is_some_and(|flag| scenario.informality_values.contains(&flag));
    let fragile = member
        .contract
        .is_some_and(|flag| scenario.contract_values.contains(&flag));

    in_sector && size_matches && (informal || fragile)
}

/// Classify every member of the table, in row order.
pub fn classify_risk(members: &MemberTable, scenario: &ShockScenario) -> Vec<bool> {
    if scenario.is_vacuous() {
        return vec![false; members.len()];
    }
    members
        .iter()
        .map(|member| is_at_risk(member, scenario))
        .collect()
}
