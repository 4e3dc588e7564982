//! Shock pipeline error types.

use incidence_core::types::{HouseholdKey, StatsError};
use thiserror::Error;

/// Errors that can occur while applying a shock scenario.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShockError {
    /// Scenario parameters are out of range.
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    /// The household totals joined onto members contain a key more than once.
    #[error("Join cardinality violation: household {household} has {count} totals")]
    JoinCardinalityViolation {
        /// Household with duplicate totals.
        household: HouseholdKey,
        /// Number of totals found.
        count: usize,
    },

    /// A member's household has no total to join.
    #[error("Missing household total for {0}")]
    MissingHouseholdTotal(HouseholdKey),

    /// Members of one household disagree on a household-level attribute.
    #[error("Inconsistent household {household}: members disagree on {field}")]
    InconsistentHousehold {
        /// Household with conflicting members.
        household: HouseholdKey,
        /// Name of the conflicting attribute.
        field: &'static str,
    },

    /// Underlying statistics error.
    #[error(transparent)]
    Stats(#[from] StatsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_scenario() {
        let err = ShockError::InvalidScenario("shock_pct 120 outside [0, 100]".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid scenario: shock_pct 120 outside [0, 100]"
        );
    }

    #[test]
    fn test_error_display_join_cardinality() {
        let err = ShockError::JoinCardinalityViolation {
            household: HouseholdKey::new(10, 1, 2),
            count: 2,
        };
        assert_eq!(
            format!("{}", err),
            "Join cardinality violation: household 10-1-2 has 2 totals"
        );
    }

    #[test]
    fn test_error_display_inconsistent_household() {
        let err = ShockError::InconsistentHousehold {
            household: HouseholdKey::new(3, 1, 1),
            field: "persons_in_household",
        };
        assert_eq!(
            format!("{}", err),
            "Inconsistent household 3-1-1: members disagree on persons_in_household"
        );
    }

    #[test]
    fn test_error_from_stats() {
        let err: ShockError = StatsError::EmptyDistribution("no observations".to_string()).into();
        assert_eq!(format!("{}", err), "Empty distribution: no observations");
    }
}
