//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Shared loading and
//! rendering lives here.

pub mod baseline;
pub mod check;
pub mod evaluate;
pub mod sectors;

use incidence_core::types::MemberTable;
use incidence_metrics::{Baseline, ReferenceMarker, ScenarioView};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config::IncidenceConfig;
use crate::output::{format_amount, format_change_pct, format_pct, OutputFormat, Table};
use crate::{CliError, Result};

/// Load the survey extract named by the configuration.
pub fn load_members(path: &Path) -> Result<Arc<MemberTable>> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }

    info!("Loading survey extract from {}", path.display());
    let members = adapter_survey::load_members(path)?;
    Ok(Arc::new(members))
}

/// Load the survey extract and precompute the original distribution.
pub fn load_baseline(config: &IncidenceConfig) -> Result<Arc<Baseline>> {
    let members = load_members(&config.data_path)?;
    info!(
        "Computing baseline over {} members ({} households)",
        members.len(),
        members.household_count()
    );
    let baseline = Baseline::compute(members, config.engine.clone())?;
    Ok(Arc::new(baseline))
}

/// Resolve the output format: an explicit flag wins over the configuration.
pub fn resolve_format(flag: Option<&str>, config: &IncidenceConfig) -> Result<OutputFormat> {
    match flag {
        Some(format) => format.parse(),
        None => Ok(config.format),
    }
}

fn or_blank(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

/// Print the distribution comparison tables.
///
/// The shocked columns are blank when no scenario has been applied, or when
/// the shocked distribution cannot support the statistic.
pub fn print_comparison(baseline: &Baseline, view: &ScenarioView, markers: &[ReferenceMarker]) {
    let outcome = view.outcome();

    let mut summary = Table::new(["Metric", "Original", "Shocked", "Change"])
        .with_title("Distribution of per-capita household income");
    summary.row([
        "Weighted median (COP)".to_string(),
        format_amount(baseline.median()),
        or_blank(view.shocked_median().map(format_amount)),
        or_blank(outcome.map(|o| format_change_pct(o.median.change_pct()))),
    ]);
    summary.row([
        "Gini coefficient".to_string(),
        format!("{:.4}", baseline.gini()),
        or_blank(outcome.and_then(|o| o.gini.as_ref()).map(|g| format!("{:.4}", g.shocked))),
        or_blank(outcome.and_then(|o| o.gini.as_ref()).map(|g| format!("{:+.4}", g.change()))),
    ]);
    summary.row([
        "Poverty rate".to_string(),
        format_pct(baseline.poverty().rate_pct),
        or_blank(view.shocked_poverty_rate().map(format_pct)),
        or_blank(outcome.map(|o| format!("{:+.2} pp", o.poverty_rate().change()))),
    ]);
    summary.row([
        "Poor population".to_string(),
        format_amount(baseline.poverty().poor_population),
        or_blank(outcome.map(|o| format_amount(o.poverty.shocked.poor_population))),
        or_blank(outcome.map(|o| {
            format_amount(o.poverty.shocked.poor_population - o.poverty.original.poor_population)
        })),
    ]);
    summary.print();

    if let Some(outcome) = outcome {
        let mut exposure = Table::new(["Exposure", "Value"]).with_title("Workers at risk");
        exposure.row(["Members".to_string(), outcome.at_risk_members.to_string()]);
        exposure.row(["Households".to_string(), outcome.at_risk_households.to_string()]);
        exposure.row([
            "Expanded population".to_string(),
            format_amount(outcome.at_risk_population),
        ]);
        exposure.row([
            "Income lost".to_string(),
            format_pct(outcome.scenario.shock_pct),
        ]);
        exposure.print();
    }

    let mut domains = Table::new(["Domain", "Original", "Shocked"]).with_title("Poverty rate by domain");
    for (domain, original) in &baseline.poverty().by_domain {
        let shocked = outcome.and_then(|o| o.poverty.shocked.by_domain.get(domain));
        domains.row([
            domain.clone(),
            format_pct(original.rate_pct),
            or_blank(shocked.map(|d| format_pct(d.rate_pct))),
        ]);
    }
    domains.print();

    if !markers.is_empty() {
        let mut lines = Table::new(["Reference line", "Income (COP)", "Annotation height"]);
        for marker in markers {
            lines.row([
                marker.label.to_string(),
                format_amount(marker.income),
                format!("{:.3e}", marker.height),
            ]);
        }
        lines.print();
    }
}
