//! Country vocabulary
//!
//! The dataset covers exactly five labour markets. Postings and the curated
//! cost-of-living file use two-letter codes; the macro source uses ISO-3 codes,
//! which are translated through [`Country::from_macro_code`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A country in scope of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Country {
    #[serde(rename = "ES")]
    Spain,
    #[serde(rename = "DE")]
    Germany,
    #[serde(rename = "UK")]
    UnitedKingdom,
    #[serde(rename = "US")]
    UnitedStates,
    #[serde(rename = "FR")]
    France,
}

/// Macro-source country codes and the dataset code each maps to
pub const MACRO_COUNTRY_CODES: [(&str, Country); 5] = [
    ("ESP", Country::Spain),
    ("DEU", Country::Germany),
    ("GBR", Country::UnitedKingdom),
    ("USA", Country::UnitedStates),
    ("FRA", Country::France),
];

impl Country {
    pub const ALL: [Country; 5] = [
        Country::Spain,
        Country::Germany,
        Country::UnitedKingdom,
        Country::UnitedStates,
        Country::France,
    ];

    /// Two-letter code used throughout the dataset
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Country::Spain => "ES",
            Country::Germany => "DE",
            Country::UnitedKingdom => "UK",
            Country::UnitedStates => "US",
            Country::France => "FR",
        }
    }

    /// Parse a two-letter dataset code, ignoring case and surrounding whitespace
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|country| country.code().eq_ignore_ascii_case(code))
    }

    /// Translate a macro-source code; codes outside the map are out of scope
    #[must_use]
    pub fn from_macro_code(code: &str) -> Option<Self> {
        let code = code.trim();
        MACRO_COUNTRY_CODES
            .iter()
            .find(|(macro_code, _)| *macro_code == code)
            .map(|(_, country)| *country)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when text is not one of the five country codes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown country code '{0}'")]
pub struct UnknownCountry(pub String);

impl FromStr for Country {
    type Err = UnknownCountry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownCountry(s.to_string()))
    }
}
