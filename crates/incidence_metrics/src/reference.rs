//! Income reference lines for density plots.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed monthly income level drawn over the income density.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceLine {
    /// Legal monthly minimum wage
    MinimumWage,
    /// Monetary poverty line
    PovertyLine,
    /// Vulnerability line
    VulnerabilityLine,
}

impl ReferenceLine {
    /// All reference lines in display order.
    pub const ALL: [ReferenceLine; 3] = [
        ReferenceLine::MinimumWage,
        ReferenceLine::PovertyLine,
        ReferenceLine::VulnerabilityLine,
    ];

    /// Income level of the line, in COP.
    pub fn income(&self) -> f64 {
        match self {
            ReferenceLine::MinimumWage => 800_000.0,
            ReferenceLine::PovertyLine => 267_473.0,
            ReferenceLine::VulnerabilityLine => 401_208.0,
        }
    }

    /// Label for annotations.
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceLine::MinimumWage => "Minimum wage",
            ReferenceLine::PovertyLine => "Poverty line",
            ReferenceLine::VulnerabilityLine => "Vulnerability line",
        }
    }
}

impl fmt::Display for ReferenceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ReferenceLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "minimum-wage" | "mw" => Ok(ReferenceLine::MinimumWage),
            "poverty-line" | "pl" => Ok(ReferenceLine::PovertyLine),
            "vulnerability-line" | "vl" => Ok(ReferenceLine::VulnerabilityLine),
            other => Err(format!("unknown reference line '{}'", other)),
        }
    }
}

/// A reference line placed on a density plot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReferenceMarker {
    /// Which line
    pub line: ReferenceLine,
    /// Income position on the x axis
    pub income: f64,
    /// Annotation height, the peak of the original density
    pub height: f64,
    /// Annotation text
    pub label: &'static str,
}

/// Markers for the selected lines, in display order and without duplicates.
///
/// Nothing selected yields no markers; the caller decides how to render an
/// empty overlay.
///
/// # Examples
///
/// ```
/// use incidence_metrics::{reference_markers, ReferenceLine};
///
/// let markers = reference_markers(&[ReferenceLine::PovertyLine], 2.5e-6);
/// assert_eq!(markers.len(), 1);
/// assert_eq!(markers[0].income, 267_473.0);
/// assert_eq!(markers[0].height, 2.5e-6);
/// ```
pub fn reference_markers(selected: &[ReferenceLine], peak_density: f64) -> Vec<ReferenceMarker> {
    ReferenceLine::ALL
        .iter()
        .filter(|line| selected.contains(line))
        .map(|&line| ReferenceMarker {
            line,
            income: line.income(),
            height: peak_density,
            label: line.label(),
        })
        .collect()
}
