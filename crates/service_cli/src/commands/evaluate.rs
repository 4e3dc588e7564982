//! Evaluate command implementation
//!
//! Applies a shock scenario to the survey and compares the shocked income
//! distribution with the original.

use clap::Args;
use incidence_core::rng::SampleRng;
use incidence_core::types::{EmployerSize, Sector};
use incidence_metrics::{
    Comparison, DensityOverlay, LorenzCurve, PovertyProfile, ReferenceLine, ReferenceMarker,
    ScenarioEngine, ScenarioOutcome, ScenarioView,
};
use incidence_shock::ShockScenario;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use super::{load_baseline, print_comparison, resolve_format};
use crate::config::IncidenceConfig;
use crate::output::{print_json, OutputFormat};
use crate::{CliError, Result};

/// Arguments of the evaluate command
#[derive(Debug, Clone, Default, Args)]
pub struct EvaluateArgs {
    /// Exposed sector codes, comma separated (e.g. 7,8)
    #[arg(short, long, value_delimiter = ',', conflicts_with = "scenario")]
    pub sectors: Vec<u32>,

    /// Employer size code of exposed workers (1-4)
    #[arg(short, long, conflicts_with = "scenario")]
    pub employer_size: Option<u32>,

    /// Informality flag values marking vulnerable workers, comma separated
    #[arg(short, long, value_delimiter = ',', conflicts_with = "scenario")]
    pub informality: Vec<u32>,

    /// Contract flag values marking vulnerable workers, comma separated
    #[arg(long, value_delimiter = ',', conflicts_with = "scenario")]
    pub contract: Vec<u32>,

    /// Percentage of main activity income lost (0-100)
    #[arg(long, default_value = "0", conflicts_with = "scenario")]
    pub shock: f64,

    /// Scenario TOML file, instead of the flags above
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Seed for the Lorenz rendering sample
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reference lines to annotate (minimum-wage, poverty-line, vulnerability-line)
    #[arg(short, long, value_delimiter = ',')]
    pub reference_lines: Vec<ReferenceLine>,

    /// Output format (table, json)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Include density and Lorenz arrays in JSON output
    #[arg(long)]
    pub full: bool,
}

impl EvaluateArgs {
    /// Build the scenario from the file or the flags.
    pub fn scenario(&self) -> Result<ShockScenario> {
        if let Some(path) = &self.scenario {
            return load_scenario(path);
        }

        let sectors = self
            .sectors
            .iter()
            .map(|&code| {
                Sector::from_code(code).ok_or_else(|| {
                    CliError::InvalidArgument(format!(
                        "Unknown sector code: {}. Run `incidence sectors` for valid codes",
                        code
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut scenario = ShockScenario::new(self.shock)
            .with_sectors(sectors)
            .with_informality(self.informality.iter().copied())
            .with_contract(self.contract.iter().copied());

        if let Some(code) = self.employer_size {
            let size = EmployerSize::from_code(code).ok_or_else(|| {
                CliError::InvalidArgument(format!(
                    "Unknown employer size code: {}. Supported: 1-4",
                    code
                ))
            })?;
            scenario = scenario.with_employer_size(size);
        }

        scenario.validate()?;
        Ok(scenario)
    }

    /// Sample generator: an explicit seed wins, then `reseed`, then the
    /// configured seed.
    pub fn rng(&self, config: &IncidenceConfig) -> SampleRng {
        match self.seed {
            Some(seed) => SampleRng::from_seed(seed),
            None if config.reseed => SampleRng::from_entropy(),
            None => SampleRng::from_seed(config.sample_seed),
        }
    }
}

/// Read a scenario from a TOML file.
pub fn load_scenario(path: &std::path::Path) -> Result<ShockScenario> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let scenario: ShockScenario = toml::from_str(&content).map_err(|e| {
        CliError::InvalidArgument(format!("Invalid scenario file {}: {}", path.display(), e))
    })?;
    scenario.validate()?;
    Ok(scenario)
}

/// JSON view of a scenario evaluation.
#[derive(Debug, Serialize)]
pub struct EvaluationReport<'a> {
    /// The scenario evaluated
    pub scenario: &'a ShockScenario,
    /// Members at risk
    pub at_risk_members: usize,
    /// Households with a member at risk
    pub at_risk_households: usize,
    /// Expanded population at risk
    pub at_risk_population: f64,
    /// Weighted median per-capita income
    pub median: &'a Comparison<f64>,
    /// Median change in percent
    pub median_change_pct: f64,
    /// Gini coefficients, absent when the shocked income sums to zero
    pub gini: Option<&'a Comparison<f64>>,
    /// Poverty rates in percent
    pub poverty_rate: Comparison<f64>,
    /// Poverty profiles
    pub poverty: &'a Comparison<PovertyProfile>,
    /// Selected reference lines
    pub reference_markers: Vec<ReferenceMarker>,
    /// Seed replaying the Lorenz sample
    pub sample_seed: u64,
    /// Density overlay, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<&'a DensityOverlay>,
    /// Sampled Lorenz curves, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lorenz: Option<&'a Comparison<LorenzCurve>>,
}

impl<'a> EvaluationReport<'a> {
    /// Build the report; `full` includes the density and Lorenz arrays.
    pub fn new(outcome: &'a ScenarioOutcome, markers: Vec<ReferenceMarker>, full: bool) -> Self {
        Self {
            scenario: &outcome.scenario,
            at_risk_members: outcome.at_risk_members,
            at_risk_households: outcome.at_risk_households,
            at_risk_population: outcome.at_risk_population,
            median: &outcome.median,
            median_change_pct: outcome.median.change_pct(),
            gini: outcome.gini.as_ref(),
            poverty_rate: outcome.poverty_rate(),
            poverty: &outcome.poverty,
            reference_markers: markers,
            sample_seed: outcome.sample_seed,
            density: outcome.density.as_ref().filter(|_| full),
            lorenz: outcome.lorenz.as_ref().filter(|_| full),
        }
    }
}

/// Run the evaluate command
pub fn run(config: &IncidenceConfig, args: &EvaluateArgs) -> Result<()> {
    let format = resolve_format(args.format.as_deref(), config)?;
    let scenario = args.scenario()?;

    info!("Starting scenario evaluation...");
    info!("  Data: {}", config.data_path.display());
    info!(
        "  Sectors: {:?}",
        scenario.selected_sectors.iter().map(Sector::code).collect::<Vec<_>>()
    );
    info!("  Employer size: {:?}", scenario.employer_size.map(|s| s.code()));
    info!("  Shock: {}%", scenario.shock_pct);
    info!("  Output format: {}", format);

    let baseline = load_baseline(config)?;
    let engine = ScenarioEngine::new(baseline);
    let mut rng = args.rng(config);
    let view = ScenarioView::applied(engine.evaluate(&scenario, &mut rng)?);
    let markers = engine.baseline().reference_markers(&args.reference_lines);

    match (format, view.outcome()) {
        (OutputFormat::Json, Some(outcome)) => {
            print_json(&EvaluationReport::new(outcome, markers, args.full))?
        }
        _ => print_comparison(engine.baseline(), &view, &markers),
    }

    info!("Evaluation complete");
    Ok(())
}
