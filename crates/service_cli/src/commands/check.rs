//! Check command implementation
//!
//! Validates configuration and the survey extract, and reconciles the
//! loaded baseline per-capita column with the income pipeline's own
//! unshocked recomputation.

use incidence_metrics::{reconcile_baseline, BaselineReconciliation};
use serde::Serialize;
use tracing::{info, warn};

use super::{load_members, resolve_format};
use crate::config::IncidenceConfig;
use crate::output::{format_amount, print_json, OutputFormat, Table};
use crate::{CliError, Result};

/// Outcome of the checks.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Survey extract checked
    pub data_path: String,
    /// Members loaded
    pub members: usize,
    /// Distinct households
    pub households: usize,
    /// Expanded population
    pub population: f64,
    /// Members without a sector code
    pub members_without_sector: usize,
    /// Members without a domain
    pub members_without_domain: usize,
    /// Relative tolerance used
    pub tolerance: f64,
    /// Baseline column reconciliation
    pub reconciliation: BaselineReconciliation,
}

/// Run the check command
pub fn run(config: &IncidenceConfig, tolerance: Option<f64>, format: Option<&str>) -> Result<()> {
    let format = resolve_format(format, config)?;
    let tolerance = tolerance.unwrap_or(config.reconcile_tolerance);
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(CliError::InvalidArgument(format!(
            "Tolerance must be a non-negative number, got {}",
            tolerance
        )));
    }

    info!("Checking configuration and survey extract");
    info!("  Data: {}", config.data_path.display());
    info!("  Tolerance: {}", tolerance);

    config.engine.validate()?;
    let members = load_members(&config.data_path)?;
    let reconciliation = reconcile_baseline(&members, tolerance)?;

    let report = CheckReport {
        data_path: config.data_path.display().to_string(),
        members: members.len(),
        households: members.household_count(),
        population: members.total_weight(),
        members_without_sector: members.iter().filter(|m| m.sector.is_none()).count(),
        members_without_domain: members.iter().filter(|m| m.domain.is_none()).count(),
        tolerance,
        reconciliation,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_report(&report),
    }

    if report.reconciliation.is_consistent() {
        info!("All checks passed");
        Ok(())
    } else {
        warn!(
            mismatches = report.reconciliation.mismatches,
            "Loaded baseline column disagrees with recomputation"
        );
        Err(CliError::CheckFailed(format!(
            "{} of {} members differ from the recomputed baseline (max difference {})",
            report.reconciliation.mismatches, report.members, report.reconciliation.max_abs_diff
        )))
    }
}

fn status(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

fn print_report(report: &CheckReport) {
    let mut table = Table::new(["Check", "Status", "Detail"]).with_title("Survey extract");
    table.row([
        "Extract loaded".to_string(),
        status(true).to_string(),
        report.data_path.clone(),
    ]);
    table.row([
        "Members".to_string(),
        status(report.members > 0).to_string(),
        format!("{} in {} households", report.members, report.households),
    ]);
    table.row([
        "Expanded population".to_string(),
        status(report.population > 0.0).to_string(),
        format_amount(report.population),
    ]);
    table.row([
        "Sector coverage".to_string(),
        status(true).to_string(),
        format!("{} without sector", report.members_without_sector),
    ]);
    table.row([
        "Domain coverage".to_string(),
        status(true).to_string(),
        format!("{} without domain", report.members_without_domain),
    ]);
    table.row([
        "Baseline column".to_string(),
        status(report.reconciliation.is_consistent()).to_string(),
        format!(
            "{} mismatches, max difference {:.3e}",
            report.reconciliation.mismatches, report.reconciliation.max_abs_diff
        ),
    ]);
    table.print();
}
