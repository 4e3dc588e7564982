//! Survey code enumerations.
//!
//! The household survey encodes categorical answers as small integers. This
//! module maps the codes the incidence pipeline branches on to enums with
//! labels, so that scenario predicates and poverty rules compare typed values
//! rather than raw integers.
//!
//! # Examples
//!
//! ```
//! use incidence_core::types::codes::{Area, EmployerSize, Sector};
//!
//! assert_eq!(Area::from_code(Some(12344)), Area::City);
//! assert_eq!(Area::from_code(None), Area::Other);
//!
//! let manufacturing = Sector::from_code(4).unwrap();
//! assert_eq!(manufacturing, Sector::Manufacturing);
//! assert_eq!(manufacturing.label(), "Manufacturing");
//!
//! assert_eq!(EmployerSize::from_code(2), Some(EmployerSize::Medium));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Area code identifying the city stratum in `AREA_per`.
pub const CITY_AREA_CODE: u32 = 12344;

/// Area classification of a member.
///
/// Any area code other than [`CITY_AREA_CODE`], including a missing one,
/// classifies as `Other`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    /// The city stratum (`AREA_per == 12344`)
    City,
    /// Every other area
    Other,
}

impl Area {
    /// Classify a raw `AREA_per` code.
    pub fn from_code(code: Option<u32>) -> Self {
        match code {
            Some(CITY_AREA_CODE) => Area::City,
            _ => Area::Other,
        }
    }

    /// Returns true for the city stratum.
    #[inline]
    pub fn is_city(&self) -> bool {
        matches!(self, Area::City)
    }
}

/// Person classification (`CLASE_per`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonClass {
    /// Urban (code 1)
    Urban,
    /// Rural (code 2)
    Rural,
}

impl PersonClass {
    /// Parse a raw `CLASE_per` code. Unknown codes yield `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(PersonClass::Urban),
            2 => Some(PersonClass::Rural),
            _ => None,
        }
    }

    /// Returns the survey code.
    pub fn code(&self) -> u32 {
        match self {
            PersonClass::Urban => 1,
            PersonClass::Rural => 2,
        }
    }
}

/// Employer size (`tipo_empresa`).
///
/// Serialises as its survey code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum EmployerSize {
    /// Small firm (code 1)
    Small,
    /// Medium firm (code 2)
    Medium,
    /// Large firm (code 3)
    Large,
    /// Very large firm (code 4)
    Giant,
}

impl EmployerSize {
    /// All employer sizes in code order.
    pub const ALL: [EmployerSize; 4] = [
        EmployerSize::Small,
        EmployerSize::Medium,
        EmployerSize::Large,
        EmployerSize::Giant,
    ];

    /// Parse a raw `tipo_empresa` code. Unknown codes yield `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|size| size.code() == code)
    }

    /// Returns the survey code.
    pub fn code(&self) -> u32 {
        match self {
            EmployerSize::Small => 1,
            EmployerSize::Medium => 2,
            EmployerSize::Large => 3,
            EmployerSize::Giant => 4,
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            EmployerSize::Small => "Small",
            EmployerSize::Medium => "Medium",
            EmployerSize::Large => "Large",
            EmployerSize::Giant => "Giant",
        }
    }
}

impl TryFrom<u32> for EmployerSize {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown employer size code {}", code))
    }
}

impl From<EmployerSize> for u32 {
    fn from(size: EmployerSize) -> Self {
        size.code()
    }
}

impl fmt::Display for EmployerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}

/// Economic sector of the main activity (`seccion_2d`).
///
/// Codes 1 to 17 follow the two-digit section grouping used by the survey.
/// Serialises as its survey code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Sector {
    /// Agriculture and livestock (1)
    Agriculture,
    /// Fishing (2)
    Fishing,
    /// Mining (3)
    Mining,
    /// Manufacturing (4)
    Manufacturing,
    /// Electricity, gas and water (5)
    Energy,
    /// Construction (6)
    Construction,
    /// Retail and vehicle repair (7)
    Commerce,
    /// Hotels and restaurants (8)
    Hospitality,
    /// Transport and communications (9)
    Transport,
    /// Financial intermediation (10)
    Finance,
    /// Real estate (11)
    RealEstate,
    /// Public administration (12)
    PublicSector,
    /// Education (13)
    Education,
    /// Health and social services (14)
    Health,
    /// Community and personal services (15)
    CommunityServices,
    /// Household services (16)
    HouseholdServices,
    /// Extraterritorial organisations (17)
    OtherOrganisations,
}

impl Sector {
    /// All sectors in code order.
    pub const ALL: [Sector; 17] = [
        Sector::Agriculture,
        Sector::Fishing,
        Sector::Mining,
        Sector::Manufacturing,
        Sector::Energy,
        Sector::Construction,
        Sector::Commerce,
        Sector::Hospitality,
        Sector::Transport,
        Sector::Finance,
        Sector::RealEstate,
        Sector::PublicSector,
        Sector::Education,
        Sector::Health,
        Sector::CommunityServices,
        Sector::HouseholdServices,
        Sector::OtherOrganisations,
    ];

    /// Parse a raw sector code (1..=17). Unknown codes yield `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        if code == 0 {
            return None;
        }
        Self::ALL.get(code as usize - 1).copied()
    }

    /// Returns the survey code.
    pub fn code(&self) -> u32 {
        *self as u32 + 1
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Sector::Agriculture => "Agriculture and livestock",
            Sector::Fishing => "Fishing",
            Sector::Mining => "Mining",
            Sector::Manufacturing => "Manufacturing",
            Sector::Energy => "Energy",
            Sector::Construction => "Construction",
            Sector::Commerce => "Commerce and vehicle repair",
            Sector::Hospitality => "Hotels and restaurants",
            Sector::Transport => "Transport and communications",
            Sector::Finance => "Finance",
            Sector::RealEstate => "Real estate",
            Sector::PublicSector => "Public sector",
            Sector::Education => "Education",
            Sector::Health => "Health and social services",
            Sector::CommunityServices => "Community and personal services",
            Sector::HouseholdServices => "Household services",
            Sector::OtherOrganisations => "Other organisations",
        }
    }
}

impl TryFrom<u32> for Sector {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown sector code {}", code))
    }
}

impl From<Sector> for u32 {
    fn from(sector: Sector) -> Self {
        sector.code()
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2} {}", self.code(), self.label())
    }
}
