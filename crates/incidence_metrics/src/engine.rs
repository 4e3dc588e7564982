//! Scenario evaluation engine.
//!
//! The original distribution is computed once into a [`Baseline`]. Each
//! evaluation applies a scenario, recomputes the same statistics on the
//! shocked per-capita income, and returns them side by side in a new
//! [`ScenarioOutcome`]. Nothing is mutated between evaluations.

use incidence_core::math::{
    weighted_median, BandwidthRule, EvaluationGrid, WeightedKde, DEFAULT_GRID_POINTS,
};
use incidence_core::rng::SampleRng;
use incidence_core::types::{MemberTable, StatsError};
use incidence_shock::{IncomeAggregator, ShockScenario, ShockedTable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::MetricsError;
use crate::lorenz::{lorenz_curve, LorenzCurve, LorenzSample, DEFAULT_LORENZ_POINTS};
use crate::poverty::PovertyProfile;
use crate::reference::{reference_markers, ReferenceLine, ReferenceMarker};

/// Tunable parameters of distribution metrics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Number of density evaluation points
    pub grid_points: usize,
    /// Maximum Lorenz points kept for rendering
    pub lorenz_points: usize,
    /// Kernel bandwidth rule
    pub bandwidth: BandwidthRule,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            grid_points: DEFAULT_GRID_POINTS,
            lorenz_points: DEFAULT_LORENZ_POINTS,
            bandwidth: BandwidthRule::Scott,
        }
    }
}

impl EngineSettings {
    /// Every reason the settings are unusable, empty if none.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.grid_points < 2 {
            problems.push(format!("grid_points must be at least 2, got {}", self.grid_points));
        }
        if self.lorenz_points < 2 {
            problems.push(format!(
                "lorenz_points must be at least 2, got {}",
                self.lorenz_points
            ));
        }
        problems
    }

    /// Check settings are usable.
    ///
    /// # Errors
    ///
    /// `MetricsError::InvalidSettings` listing every problem found.
    pub fn validate(&self) -> Result<(), MetricsError> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(MetricsError::InvalidSettings(problems.join("; ")))
        }
    }
}

/// A statistic before and after a shock.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comparison<T> {
    /// Value for the original distribution
    pub original: T,
    /// Value for the shocked distribution
    pub shocked: T,
}

impl<T> Comparison<T> {
    /// Pair an original and a shocked value.
    pub fn new(original: T, shocked: T) -> Self {
        Self { original, shocked }
    }
}

impl Comparison<f64> {
    /// Shocked minus original.
    pub fn change(&self) -> f64 {
        self.shocked - self.original
    }

    /// Change relative to the original, in percent (zero for a zero original).
    pub fn change_pct(&self) -> f64 {
        if self.original != 0.0 {
            self.change() / self.original.abs() * 100.0
        } else {
            0.0
        }
    }
}

/// Precomputed statistics of the original distribution.
///
/// Computed from the loaded baseline per-capita column and shared read-only
/// by every evaluation.
#[derive(Clone, Debug)]
pub struct Baseline {
    members: Arc<MemberTable>,
    settings: EngineSettings,
    grid: EvaluationGrid,
    density: Vec<f64>,
    median: f64,
    lorenz: LorenzCurve,
    poverty: PovertyProfile,
}

impl Baseline {
    /// Compute the original distribution statistics.
    ///
    /// # Errors
    ///
    /// - `InvalidSettings` for unusable settings
    /// - statistics errors for an empty or degenerate distribution
    pub fn compute(members: Arc<MemberTable>, settings: EngineSettings) -> Result<Self, MetricsError> {
        settings.validate()?;
        let started = Instant::now();

        let income = members.baseline_per_capita();
        let weights = members.expansion_factors();

        let grid = EvaluationGrid::from_max(&income, settings.grid_points)?;
        let density =
            WeightedKde::with_rule(&income, &weights, settings.bandwidth)?.evaluate(grid.points());
        let median = weighted_median(&income, &weights)?;
        let lorenz = lorenz_curve(&income)?;
        let poverty = PovertyProfile::compute(&members, &income)?;

        info!(
            members = members.len(),
            households = members.household_count(),
            median,
            poverty_rate = poverty.rate_pct,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Computed baseline distribution"
        );

        Ok(Self {
            members,
            settings,
            grid,
            density,
            median,
            lorenz,
            poverty,
        })
    }

    /// The member table the baseline describes.
    pub fn members(&self) -> &Arc<MemberTable> {
        &self.members
    }

    /// Settings used for every evaluation.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Density evaluation grid, fixed across evaluations.
    pub fn grid(&self) -> &EvaluationGrid {
        &self.grid
    }

    /// Original density on the grid.
    pub fn density(&self) -> &[f64] {
        &self.density
    }

    /// Highest original density value.
    pub fn peak_density(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }

    /// Weighted median of the original per-capita income.
    pub fn median(&self) -> f64 {
        self.median
    }

    /// Full original Lorenz curve.
    pub fn lorenz(&self) -> &LorenzCurve {
        &self.lorenz
    }

    /// Gini coefficient of the original distribution.
    pub fn gini(&self) -> f64 {
        self.lorenz.gini()
    }

    /// Original poverty profile.
    pub fn poverty(&self) -> &PovertyProfile {
        &self.poverty
    }

    /// Reference line markers annotated at the original density peak.
    pub fn reference_markers(&self, selected: &[ReferenceLine]) -> Vec<ReferenceMarker> {
        reference_markers(selected, self.peak_density())
    }
}

/// Original and shocked densities on a shared grid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DensityOverlay {
    /// Evaluation points
    pub grid: Vec<f64>,
    /// Original density
    pub original: Vec<f64>,
    /// Shocked density
    pub shocked: Vec<f64>,
}

/// Everything one scenario evaluation produces.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioOutcome {
    /// The scenario evaluated
    pub scenario: ShockScenario,
    /// Shocked income columns
    #[serde(skip)]
    pub shocked: ShockedTable,
    /// Members at risk
    pub at_risk_members: usize,
    /// Households with a member at risk
    pub at_risk_households: usize,
    /// Represented population at risk
    pub at_risk_population: f64,
    /// Income densities; `None` when the shocked income has no spread
    pub density: Option<DensityOverlay>,
    /// Weighted median per-capita income
    pub median: Comparison<f64>,
    /// Lorenz curves, sampled with one shared index set; `None` when the
    /// shocked income sums to zero
    pub lorenz: Option<Comparison<LorenzCurve>>,
    /// Gini coefficients from the full curves, available with `lorenz`
    pub gini: Option<Comparison<f64>>,
    /// Poverty profiles
    pub poverty: Comparison<PovertyProfile>,
    /// Seed that replays the Lorenz sample with `SampleRng::from_seed`
    pub sample_seed: u64,
}

impl ScenarioOutcome {
    /// Poverty rates, in percent.
    pub fn poverty_rate(&self) -> Comparison<f64> {
        Comparison::new(self.poverty.original.rate_pct, self.poverty.shocked.rate_pct)
    }
}

/// Evaluates scenarios against a shared baseline.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use incidence_core::rng::SampleRng;
/// use incidence_core::types::{EmployerSize, HouseholdKey, Member, MemberTable, Sector};
/// use incidence_metrics::{Baseline, EngineSettings, ScenarioEngine};
/// use incidence_shock::ShockScenario;
///
/// let members: Vec<Member> = (0..20u32)
///     .map(|i| {
///         let income = 200_000.0 + 50_000.0 * f64::from(i);
///         Member::new(HouseholdKey::new(u64::from(i), 1, 1))
///             .with_sector(Sector::Commerce)
///             .with_employer_size(EmployerSize::Small)
///             .with_informality(i % 2)
///             .with_first_activity(income)
///             .with_baseline_per_capita(income)
///             .with_expansion_factor(100.0)
///     })
///     .collect();
/// let members = Arc::new(MemberTable::new(members).unwrap());
///
/// let baseline = Arc::new(Baseline::compute(members, EngineSettings::default()).unwrap());
/// let engine = ScenarioEngine::new(baseline);
///
/// let scenario = ShockScenario::new(50.0)
///     .with_sectors([Sector::Commerce])
///     .with_employer_size(EmployerSize::Small)
///     .with_informality([1]);
/// let outcome = engine.evaluate(&scenario, &mut SampleRng::default()).unwrap();
///
/// assert_eq!(outcome.at_risk_members, 10);
/// assert!(outcome.median.shocked < outcome.median.original);
/// ```
#[derive(Clone, Debug)]
pub struct ScenarioEngine {
    baseline: Arc<Baseline>,
}

impl ScenarioEngine {
    /// Create an engine over a precomputed baseline.
    pub fn new(baseline: Arc<Baseline>) -> Self {
        Self { baseline }
    }

    /// The shared baseline.
    pub fn baseline(&self) -> &Arc<Baseline> {
        &self.baseline
    }

    /// Apply a scenario and compare the shocked distribution to the original.
    ///
    /// The Lorenz sample is drawn from a generator forked off `rng`, whose
    /// seed is recorded in the outcome. A shocked distribution that cannot
    /// support a density or a Lorenz curve (every income equal, or all zero)
    /// leaves those parts `None`; the median and poverty profile are always
    /// computed.
    ///
    /// # Errors
    ///
    /// - `Shock` errors for an invalid scenario or inconsistent households
    /// - statistics errors for invalid income values
    pub fn evaluate(
        &self,
        scenario: &ShockScenario,
        rng: &mut SampleRng,
    ) -> Result<ScenarioOutcome, MetricsError> {
        let started = Instant::now();
        let baseline = &self.baseline;
        let members = baseline.members();
        let settings = baseline.settings();

        let shocked = IncomeAggregator::apply_shock(members, scenario)?;
        let income = shocked.per_capita_income();
        let weights = shocked.weights();

        let density = unless_degenerate(
            "density",
            WeightedKde::with_rule(income, weights, settings.bandwidth),
        )?
        .map(|kde| DensityOverlay {
            grid: baseline.grid().points().to_vec(),
            original: baseline.density().to_vec(),
            shocked: kde.evaluate(baseline.grid().points()),
        });
        let median = weighted_median(income, weights)?;

        let mut sample_rng = rng.fork();
        let sample = LorenzSample::draw(
            baseline.lorenz().len(),
            settings.lorenz_points,
            &mut sample_rng,
        );
        debug!(
            seed = sample_rng.seed(),
            points = sample.len(),
            "Drew Lorenz sample"
        );

        let (lorenz, gini) = match unless_degenerate("lorenz", lorenz_curve(income))? {
            Some(curve) => (
                Some(Comparison::new(
                    baseline.lorenz().sampled(&sample)?,
                    curve.sampled(&sample)?,
                )),
                Some(Comparison::new(baseline.gini(), curve.gini())),
            ),
            None => (None, None),
        };

        let poverty = PovertyProfile::compute(members, income)?;

        let outcome = ScenarioOutcome {
            scenario: scenario.clone(),
            at_risk_members: shocked.at_risk_count(),
            at_risk_households: shocked.at_risk_household_count(),
            at_risk_population: shocked.at_risk_weight(),
            density,
            median: Comparison::new(baseline.median(), median),
            lorenz,
            gini,
            poverty: Comparison::new(baseline.poverty().clone(), poverty),
            sample_seed: sample_rng.seed(),
            shocked,
        };

        info!(
            shock_pct = scenario.shock_pct,
            at_risk_members = outcome.at_risk_members,
            median = outcome.median.shocked,
            poverty_rate = outcome.poverty.shocked.rate_pct,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Evaluated scenario"
        );

        Ok(outcome)
    }
}

/// A statistic the shocked distribution cannot support becomes `None`.
fn unless_degenerate<T>(
    statistic: &'static str,
    result: Result<T, StatsError>,
) -> Result<Option<T>, MetricsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err @ (StatsError::DegenerateBandwidth(_) | StatsError::EmptyDistribution(_))) => {
            warn!(statistic, error = %err, "Shocked distribution does not support statistic");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// State of the shocked side of a comparison.
///
/// Separates "no scenario applied yet" from an evaluation that failed, which
/// callers receive as an error instead.
#[derive(Clone, Debug, Default)]
pub enum ScenarioView {
    /// No scenario has been applied
    #[default]
    NotApplied,
    /// A scenario was applied
    Applied(Box<ScenarioOutcome>),
}

impl ScenarioView {
    /// Wrap an outcome.
    pub fn applied(outcome: ScenarioOutcome) -> Self {
        ScenarioView::Applied(Box::new(outcome))
    }

    /// The outcome, if a scenario was applied.
    pub fn outcome(&self) -> Option<&ScenarioOutcome> {
        match self {
            ScenarioView::NotApplied => None,
            ScenarioView::Applied(outcome) => Some(outcome),
        }
    }

    /// Shocked weighted median, if a scenario was applied.
    pub fn shocked_median(&self) -> Option<f64> {
        self.outcome().map(|o| o.median.shocked)
    }

    /// Shocked poverty rate, if a scenario was applied.
    pub fn shocked_poverty_rate(&self) -> Option<f64> {
        self.outcome().map(|o| o.poverty.shocked.rate_pct)
    }
}

/// Agreement between the loaded baseline column and a recomputation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BaselineReconciliation {
    /// Members compared
    pub members: usize,
    /// Members whose values differ beyond the tolerance
    pub mismatches: usize,
    /// Largest absolute difference
    pub max_abs_diff: f64,
}

impl BaselineReconciliation {
    /// Returns true if every member agrees within the tolerance.
    pub fn is_consistent(&self) -> bool {
        self.mismatches == 0
    }
}

/// Compare the loaded baseline per-capita column with the income pipeline's
/// own unshocked recomputation.
///
/// Values agree when they differ by at most `tolerance` relative to the
/// larger magnitude, or by at most `tolerance` in absolute terms near zero.
pub fn reconcile_baseline(
    members: &MemberTable,
    tolerance: f64,
) -> Result<BaselineReconciliation, MetricsError> {
    let recomputed = IncomeAggregator::baseline(members)?;
    let mut mismatches = 0;
    let mut max_abs_diff: f64 = 0.0;

    for (member, &value) in members.iter().zip(recomputed.per_capita_income()) {
        let diff = (member.baseline_per_capita - value).abs();
        let scale = member.baseline_per_capita.abs().max(value.abs()).max(1.0);
        if diff > tolerance * scale {
            mismatches += 1;
        }
        max_abs_diff = max_abs_diff.max(diff);
    }

    debug!(mismatches, max_abs_diff, "Reconciled baseline column");

    Ok(BaselineReconciliation {
        members: members.len(),
        mismatches,
        max_abs_diff,
    })
}
