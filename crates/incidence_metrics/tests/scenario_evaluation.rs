//! Integration tests for scenario evaluation.
//!
//! Run the engine over a small multi-member survey and check the outcome as
//! a caller would consume it, including its JSON form.

use approx::assert_relative_eq;
use incidence_core::rng::SampleRng;
use incidence_core::types::{
    Area, EmployerSize, HouseholdKey, IncomeComponents, Member, MemberTable, PersonClass, Sector,
};
use incidence_metrics::{
    Baseline, EngineSettings, MetricsError, ReferenceLine, ScenarioEngine, ScenarioView,
};
use incidence_shock::{IncomeAggregator, ShockScenario};
use std::sync::Arc;

/// Forty households of two: an exposed earner and a dependant.
fn survey() -> Arc<MemberTable> {
    let mut rows = Vec::new();
    for h in 0..40u32 {
        let key = HouseholdKey::new(u64::from(h), 1, 1);
        let earnings = 300_000.0 + 45_000.0 * f64::from(h);
        let rent = 80_000.0;
        let per_capita = (earnings + 20_000.0 + rent) / 2.0;
        let area = if h % 4 == 0 { Area::Other } else { Area::City };
        let domain = if area.is_city() { "Cabecera" } else { "Resto" };

        rows.push(
            Member::new(key)
                .with_area(area)
                .with_sector(if h % 2 == 0 { Sector::Commerce } else { Sector::Finance })
                .with_employer_size(EmployerSize::Small)
                .with_contract(1)
                .with_employment_position(1)
                .with_first_activity(earnings)
                .with_persons_in_household(2)
                .with_estimated_rent(rent)
                .with_baseline_per_capita(per_capita)
                .with_expansion_factor(100.0 + f64::from(h))
                .with_domain(domain),
        );
        rows.push(
            Member::new(key)
                .with_age(40)
                .with_area(area)
                .with_class(Some(PersonClass::Urban))
                .with_income(IncomeComponents {
                    other_sources: Some(20_000.0),
                    ..IncomeComponents::default()
                })
                .with_non_employment(false, true)
                .with_persons_in_household(2)
                .with_estimated_rent(rent)
                .with_baseline_per_capita(per_capita)
                .with_expansion_factor(90.0)
                .with_domain(domain),
        );
    }
    Arc::new(MemberTable::new(rows).unwrap())
}

fn engine() -> ScenarioEngine {
    let baseline = Baseline::compute(survey(), EngineSettings::default()).unwrap();
    ScenarioEngine::new(Arc::new(baseline))
}

fn commerce(shock_pct: f64) -> ShockScenario {
    ShockScenario::new(shock_pct)
        .with_sectors([Sector::Commerce])
        .with_employer_size(EmployerSize::Small)
        .with_contract([1])
}

#[test]
fn test_loaded_baseline_matches_recomputation() {
    let members = survey();
    let recomputed = IncomeAggregator::baseline(&members).unwrap();
    for (member, value) in members.iter().zip(recomputed.per_capita_income()) {
        assert_relative_eq!(member.baseline_per_capita, *value);
    }
}

#[test]
fn test_commerce_shock_outcome() {
    let outcome = engine()
        .evaluate(&commerce(60.0), &mut SampleRng::from_seed(8))
        .unwrap();

    assert_eq!(outcome.at_risk_members, 20);
    assert_eq!(outcome.at_risk_households, 20);
    assert_relative_eq!(
        outcome.at_risk_population,
        (0..40).step_by(2).map(|h| 100.0 + h as f64).sum::<f64>()
    );
    assert!(outcome.median.shocked <= outcome.median.original);
    assert!(outcome.poverty_rate().shocked >= outcome.poverty_rate().original);
    assert!((0.0..=100.0).contains(&outcome.poverty_rate().shocked));
    assert_eq!(outcome.poverty.shocked.by_domain.len(), 2);
    let density = outcome.density.as_ref().unwrap();
    assert_eq!(density.grid.len(), density.shocked.len());
    assert!(outcome.gini.is_some());
}

#[test]
fn test_full_shock_of_every_earner_keeps_median_and_poverty() {
    let rows = (0..5u32)
        .map(|h| {
            let income = 200_000.0 + 50_000.0 * f64::from(h);
            Member::new(HouseholdKey::new(u64::from(h), 1, 1))
                .with_sector(Sector::Commerce)
                .with_employer_size(EmployerSize::Small)
                .with_informality(1)
                .with_employment_position(1)
                .with_first_activity(income)
                .with_baseline_per_capita(income)
                .with_expansion_factor(100.0)
                .with_domain("Cabecera")
        })
        .collect();
    let members = Arc::new(MemberTable::new(rows).unwrap());
    let baseline = Baseline::compute(members, EngineSettings::default()).unwrap();
    let engine = ScenarioEngine::new(Arc::new(baseline));

    let scenario = ShockScenario::new(100.0)
        .with_sectors([Sector::Commerce])
        .with_employer_size(EmployerSize::Small)
        .with_informality([1]);
    let outcome = engine
        .evaluate(&scenario, &mut SampleRng::default())
        .unwrap();

    assert_eq!(outcome.at_risk_members, 5);
    assert_eq!(outcome.median.shocked, 0.0);
    assert_relative_eq!(outcome.poverty_rate().shocked, 100.0);
    assert!(outcome.density.is_none());
    assert!(outcome.lorenz.is_none());
    assert!(outcome.gini.is_none());

    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json["density"].is_null());
    assert!(json["median"]["shocked"].is_number());
}

#[test]
fn test_outcome_serialises_to_json() {
    let outcome = engine()
        .evaluate(&commerce(25.0), &mut SampleRng::default())
        .unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["scenario"]["selected_sectors"], serde_json::json!([7]));
    assert_eq!(json["scenario"]["employer_size"], serde_json::json!(1));
    assert!(json["median"]["shocked"].is_number());
    assert!(json["poverty"]["original"]["by_domain"]["Cabecera"].is_object());
    assert!(json.get("shocked").is_none());
}

#[test]
fn test_reference_markers_use_original_peak() {
    let engine = engine();
    let baseline = engine.baseline();
    let markers = baseline.reference_markers(&ReferenceLine::ALL);
    assert_eq!(markers.len(), 3);
    assert!(markers.iter().all(|m| m.height == baseline.peak_density()));
}

#[test]
fn test_view_before_and_after() {
    let mut view = ScenarioView::NotApplied;
    assert!(view.shocked_poverty_rate().is_none());

    let outcome = engine()
        .evaluate(&commerce(100.0), &mut SampleRng::default())
        .unwrap();
    view = ScenarioView::applied(outcome);
    assert!(view.shocked_poverty_rate().is_some());
}

#[test]
fn test_inconsistent_household_is_reported() {
    let mut rows = survey().members().to_vec();
    rows[1].persons_in_household = 3;
    let members = Arc::new(MemberTable::new(rows).unwrap());
    let baseline = Baseline::compute(members, EngineSettings::default()).unwrap();
    let engine = ScenarioEngine::new(Arc::new(baseline));

    let result = engine.evaluate(&commerce(10.0), &mut SampleRng::default());
    assert!(matches!(result, Err(MetricsError::Shock(_))));
}
