//! Raw survey records and their conversion to members.
//!
//! Survey extracts are written by statistical packages that emit integral
//! codes as floats (`4.0`), blanks for missing answers, and occasionally a
//! single space. Optional fields tolerate all of these and load as missing;
//! required fields report the offending line.

use incidence_core::types::{
    Area, EmployerSize, HouseholdKey, IncomeComponents, Member, PersonClass, Sector,
};
use serde::Deserialize;

use crate::error::LoadError;

/// One CSV row as written in the survey extract.
///
/// Every field is read as text so that parsing leniency is decided here
/// rather than by the CSV decoder.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawMemberRecord {
    /// `DIRECTORIO` column
    #[serde(rename = "DIRECTORIO")]
    pub directory: Option<String>,
    /// `SECUENCIA_P` column
    #[serde(rename = "SECUENCIA_P")]
    pub sequence: Option<String>,
    /// `HOGAR` column
    #[serde(rename = "HOGAR")]
    pub household: Option<String>,
    /// `edad` column
    #[serde(rename = "edad")]
    pub age: Option<String>,
    /// `AREA_per` column
    #[serde(rename = "AREA_per")]
    pub area: Option<String>,
    /// `CLASE_per` column
    #[serde(rename = "CLASE_per")]
    pub class: Option<String>,
    /// `seccion_2d` column
    #[serde(rename = "seccion_2d", alias = "sector")]
    pub sector: Option<String>,
    /// `tipo_empresa` column
    #[serde(rename = "tipo_empresa")]
    pub employer_size: Option<String>,
    /// `informales` column
    #[serde(rename = "informales")]
    pub informality: Option<String>,
    /// `cuenta_propia` column
    #[serde(rename = "cuenta_propia")]
    pub contract: Option<String>,
    /// `P6430` column
    #[serde(rename = "P6430")]
    pub employment_position: Option<String>,
    /// `P6050` column
    #[serde(rename = "P6050")]
    pub relationship: Option<String>,
    /// `DSI` column
    #[serde(rename = "DSI")]
    pub unemployed: Option<String>,
    /// `INI` column
    #[serde(rename = "INI")]
    pub inactive: Option<String>,
    /// `IMPA_y` column
    #[serde(rename = "IMPA_y")]
    pub first_activity: Option<String>,
    /// `IE_y` column
    #[serde(rename = "IE_y")]
    pub in_kind: Option<String>,
    /// `ISA_y` column
    #[serde(rename = "ISA_y")]
    pub second_activity: Option<String>,
    /// `IOF_y` column
    #[serde(rename = "IOF_y")]
    pub other_sources: Option<String>,
    /// `IMDI_y` column
    #[serde(rename = "IMDI_y")]
    pub non_employed: Option<String>,
    /// `personas_hogar` column
    #[serde(rename = "personas_hogar")]
    pub persons_in_household: Option<String>,
    /// `fac_exp_ind_12m` column
    #[serde(rename = "fac_exp_ind_12m")]
    pub expansion_factor: Option<String>,
    /// `arriendo_estimado` column
    #[serde(rename = "arriendo_estimado")]
    pub estimated_rent: Option<String>,
    /// `ING_pc_bl_def_arriendo` column
    #[serde(rename = "ING_pc_bl_def_arriendo")]
    pub baseline_per_capita: Option<String>,
    /// `cat_dom` column
    #[serde(rename = "cat_dom")]
    pub domain: Option<String>,
}

/// Trimmed, non-blank text of a field.
fn text(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an optional amount. Blank or unparsable text loads as missing.
pub fn parse_amount(field: &Option<String>) -> Option<f64> {
    text(field)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse an optional integral code, accepting float notation such as `4.0`.
/// Blank, fractional, negative or unparsable text loads as missing.
pub fn parse_code(field: &Option<String>) -> Option<u32> {
    parse_integral(field).and_then(|v| u32::try_from(v).ok())
}

fn parse_integral(field: &Option<String>) -> Option<u64> {
    let s = text(field)?;
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
        Some(v as u64)
    } else {
        None
    }
}

/// Field accessors that report the line of a bad record.
struct Required {
    line: usize,
}

impl Required {
    fn raw<'a>(&self, field: &'a Option<String>, column: &'static str) -> Result<&'a str, LoadError> {
        text(field).ok_or(LoadError::MissingField {
            line: self.line,
            column,
        })
    }

    fn invalid(&self, column: &'static str, value: &str) -> LoadError {
        LoadError::InvalidField {
            line: self.line,
            column,
            value: value.to_string(),
        }
    }

    fn integral(&self, field: &Option<String>, column: &'static str) -> Result<u64, LoadError> {
        let raw = self.raw(field, column)?;
        parse_integral(field).ok_or_else(|| self.invalid(column, raw))
    }

    fn code(&self, field: &Option<String>, column: &'static str) -> Result<u32, LoadError> {
        let raw = self.raw(field, column)?;
        parse_code(field).ok_or_else(|| self.invalid(column, raw))
    }

    fn amount(&self, field: &Option<String>, column: &'static str) -> Result<f64, LoadError> {
        let raw = self.raw(field, column)?;
        parse_amount(field).ok_or_else(|| self.invalid(column, raw))
    }
}

impl RawMemberRecord {
    /// Convert to a [`Member`].
    ///
    /// `line` is the record's line in the file, used in error messages.
    ///
    /// # Errors
    ///
    /// `MissingField` or `InvalidField` for the household key, age, household
    /// size, expansion factor and baseline per-capita income.
    pub fn into_member(self, line: usize) -> Result<Member, LoadError> {
        let required = Required { line };

        let household = HouseholdKey::new(
            required.integral(&self.directory, "DIRECTORIO")?,
            required.code(&self.sequence, "SECUENCIA_P")?,
            required.code(&self.household, "HOGAR")?,
        );

        let income = IncomeComponents {
            first_activity: parse_amount(&self.first_activity),
            in_kind: parse_amount(&self.in_kind),
            second_activity: parse_amount(&self.second_activity),
            other_sources: parse_amount(&self.other_sources),
            non_employed: parse_amount(&self.non_employed),
        };

        Ok(Member {
            household,
            age: required.code(&self.age, "edad")?,
            area: Area::from_code(parse_code(&self.area)),
            class: parse_code(&self.class).and_then(PersonClass::from_code),
            sector: parse_code(&self.sector).and_then(Sector::from_code),
            employer_size: parse_code(&self.employer_size).and_then(EmployerSize::from_code),
            informality: parse_code(&self.informality),
            contract: parse_code(&self.contract),
            employment_position: parse_code(&self.employment_position),
            relationship: parse_code(&self.relationship),
            unemployed: parse_code(&self.unemployed) == Some(1),
            inactive: parse_code(&self.inactive) == Some(1),
            income,
            persons_in_household: required.code(&self.persons_in_household, "personas_hogar")?,
            expansion_factor: required.amount(&self.expansion_factor, "fac_exp_ind_12m")?,
            estimated_rent: parse_amount(&self.estimated_rent).unwrap_or(0.0),
            baseline_per_capita: required
                .amount(&self.baseline_per_capita, "ING_pc_bl_def_arriendo")?,
            domain: text(&self.domain).map(str::to_string),
        })
    }

    /// Returns true if a sector code is present but not a known sector.
    pub fn has_unknown_sector(&self) -> bool {
        text(&self.sector).is_some() && parse_code(&self.sector).and_then(Sector::from_code).is_none()
    }
}
