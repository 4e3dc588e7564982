//! Sectors command implementation
//!
//! Lists the sector and employer size codes accepted by scenarios, with
//! optional survey coverage for each sector.

use incidence_core::types::{EmployerSize, MemberTable, Sector};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use super::{load_members, resolve_format};
use crate::config::IncidenceConfig;
use crate::output::{format_amount, print_json, OutputFormat, Table};
use crate::Result;

/// One sector with its survey coverage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorRow {
    /// Survey code
    pub code: u32,
    /// Label
    pub label: &'static str,
    /// Members working in the sector, when counted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<usize>,
    /// Expanded population working in the sector, when counted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<f64>,
}

/// One employer size code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployerSizeRow {
    /// Survey code
    pub code: u32,
    /// Label
    pub label: &'static str,
}

/// Code listing.
#[derive(Debug, Clone, Serialize)]
pub struct CodeListing {
    /// Sector codes
    pub sectors: Vec<SectorRow>,
    /// Employer size codes
    pub employer_sizes: Vec<EmployerSizeRow>,
}

/// Build the listing, counting members per sector when a table is given.
pub fn code_listing(members: Option<&MemberTable>) -> CodeListing {
    let coverage: Option<BTreeMap<Sector, (usize, f64)>> = members.map(|table| {
        let mut counts = BTreeMap::new();
        for member in table.iter() {
            if let Some(sector) = member.sector {
                let entry = counts.entry(sector).or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 += member.expansion_factor;
            }
        }
        counts
    });

    let sectors = Sector::ALL
        .iter()
        .map(|sector| {
            let counted = coverage
                .as_ref()
                .map(|c| c.get(sector).copied().unwrap_or((0, 0.0)));
            SectorRow {
                code: sector.code(),
                label: sector.label(),
                members: counted.map(|(n, _)| n),
                population: counted.map(|(_, w)| w),
            }
        })
        .collect();

    let employer_sizes = EmployerSize::ALL
        .iter()
        .map(|size| EmployerSizeRow {
            code: size.code(),
            label: size.label(),
        })
        .collect();

    CodeListing {
        sectors,
        employer_sizes,
    }
}

/// Run the sectors command
pub fn run(config: &IncidenceConfig, with_counts: bool, format: Option<&str>) -> Result<()> {
    let format = resolve_format(format, config)?;
    info!("Listing scenario codes");

    let members = if with_counts {
        Some(load_members(&config.data_path)?)
    } else {
        None
    };
    let listing = code_listing(members.as_deref());

    match format {
        OutputFormat::Json => print_json(&listing)?,
        OutputFormat::Table => {
            let mut sectors = if with_counts {
                Table::new(["Code", "Sector", "Members", "Population"])
            } else {
                Table::new(["Code", "Sector"])
            }
            .with_title("Sectors");
            for row in &listing.sectors {
                sectors.row([
                    row.code.to_string(),
                    row.label.to_string(),
                    row.members.map(|n| n.to_string()).unwrap_or_default(),
                    row.population.map(format_amount).unwrap_or_default(),
                ]);
            }
            sectors.print();

            let mut sizes = Table::new(["Code", "Employer size"]);
            for row in &listing.employer_sizes {
                sizes.row([row.code.to_string(), row.label.to_string()]);
            }
            sizes.print();
        }
    }

    Ok(())
}
