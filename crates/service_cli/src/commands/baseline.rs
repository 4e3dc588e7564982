//! Baseline command implementation
//!
//! Reports the original income distribution without applying any shock.

use incidence_metrics::{
    Baseline, LorenzCurve, PovertyProfile, ReferenceLine, ReferenceMarker, ScenarioView,
};
use serde::Serialize;
use tracing::info;

use super::{load_baseline, print_comparison, resolve_format};
use crate::config::IncidenceConfig;
use crate::output::{print_json, OutputFormat};
use crate::Result;

/// Density of the original distribution on the evaluation grid.
#[derive(Debug, Serialize)]
pub struct DensityCurve<'a> {
    /// Evaluation points
    pub grid: &'a [f64],
    /// Density values
    pub density: &'a [f64],
}

/// JSON view of the original distribution.
#[derive(Debug, Serialize)]
pub struct BaselineReport<'a> {
    /// Members loaded
    pub members: usize,
    /// Distinct households
    pub households: usize,
    /// Expanded population
    pub population: f64,
    /// Weighted median per-capita income
    pub median: f64,
    /// Gini coefficient
    pub gini: f64,
    /// Poverty profile
    pub poverty: &'a PovertyProfile,
    /// Selected reference lines
    pub reference_markers: Vec<ReferenceMarker>,
    /// Density curve, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<DensityCurve<'a>>,
    /// Full Lorenz curve, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lorenz: Option<&'a LorenzCurve>,
}

impl<'a> BaselineReport<'a> {
    /// Build the report; `full` includes the density and Lorenz arrays.
    pub fn new(baseline: &'a Baseline, lines: &[ReferenceLine], full: bool) -> Self {
        let members = baseline.members();
        Self {
            members: members.len(),
            households: members.household_count(),
            population: members.total_weight(),
            median: baseline.median(),
            gini: baseline.gini(),
            poverty: baseline.poverty(),
            reference_markers: baseline.reference_markers(lines),
            density: full.then(|| DensityCurve {
                grid: baseline.grid().points(),
                density: baseline.density(),
            }),
            lorenz: full.then(|| baseline.lorenz()),
        }
    }
}

/// Run the baseline command
pub fn run(
    config: &IncidenceConfig,
    lines: &[ReferenceLine],
    format: Option<&str>,
    full: bool,
) -> Result<()> {
    let format = resolve_format(format, config)?;
    info!("Reporting baseline distribution");
    info!("  Data: {}", config.data_path.display());
    info!("  Bandwidth rule: {}", config.engine.bandwidth.name());
    info!("  Output format: {}", format);

    let baseline = load_baseline(config)?;

    match format {
        OutputFormat::Json => print_json(&BaselineReport::new(&baseline, lines, full))?,
        OutputFormat::Table => {
            let members = baseline.members();
            println!(
                "\n{} members in {} households, expanded population {:.0}",
                members.len(),
                members.household_count(),
                members.total_weight()
            );
            print_comparison(
                &baseline,
                &ScenarioView::NotApplied,
                &baseline.reference_markers(lines),
            );
        }
    }

    info!("Baseline complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_config() -> IncidenceConfig {
        IncidenceConfig {
            data_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/sample_survey.csv"),
            ..IncidenceConfig::default()
        }
    }

    #[test]
    fn test_report_omits_arrays_by_default() {
        let baseline = load_baseline(&sample_config()).unwrap();
        let report = BaselineReport::new(&baseline, &[ReferenceLine::PovertyLine], false);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["members"], 104);
        assert_eq!(json["households"], 36);
        assert!(json.get("density").is_none());
        assert!(json.get("lorenz").is_none());
        assert_eq!(json["reference_markers"][0]["line"], "poverty-line");
    }

    #[test]
    fn test_full_report_includes_arrays() {
        let baseline = load_baseline(&sample_config()).unwrap();
        let report = BaselineReport::new(&baseline, &[], true);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["density"]["grid"].as_array().unwrap().len(), 1000);
        assert_eq!(json["lorenz"]["population"].as_array().unwrap().len(), 105);
        assert!(json["reference_markers"].as_array().unwrap().is_empty());
    }
}
