//! # Severity Scale
//!
//! Ordinal scale used by Nessus: `non=0, low=1, med=2, hig=3, cri=4`.
//! Every conversion here is total. Unknown input maps to [`Severity::None`]
//! instead of failing, so malformed report data or query values degrade to
//! the lowest level.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a plugin or finding
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    #[default]
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl Severity {
    /// All levels in ascending order
    pub const ALL: [Severity; 5] = [
        Severity::None,
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Map a three letter code (`non`, `low`, `med`, `hig`, `cri`), case-insensitive
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "cri" => Severity::Critical,
            "hig" => Severity::High,
            "med" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::None,
        }
    }

    /// Map the literal digit strings `"0"` through `"4"`
    pub fn from_ordinal_str(value: &str) -> Self {
        match value {
            "4" => Severity::Critical,
            "3" => Severity::High,
            "2" => Severity::Medium,
            "1" => Severity::Low,
            _ => Severity::None,
        }
    }

    pub fn from_ordinal(ordinal: i64) -> Self {
        match ordinal {
            4 => Severity::Critical,
            3 => Severity::High,
            2 => Severity::Medium,
            1 => Severity::Low,
            _ => Severity::None,
        }
    }

    /// Parse the raw severity attribute stored on a finding.
    ///
    /// Anything that is not an integer counts as `0`.
    pub fn parse_report_ordinal(raw: &str) -> i64 {
        raw.trim().parse::<i64>().unwrap_or(0)
    }

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    /// Lowercase query code
    pub fn code(self) -> &'static str {
        match self {
            Severity::None => "non",
            Severity::Low => "low",
            Severity::Medium => "med",
            Severity::High => "hig",
            Severity::Critical => "cri",
        }
    }

    /// Capitalized display label
    pub fn label(self) -> &'static str {
        match self {
            Severity::None => "Non",
            Severity::Low => "Low",
            Severity::Medium => "Med",
            Severity::High => "Hig",
            Severity::Critical => "Cri",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// Config files spell severities the same way queries do.
impl From<String> for Severity {
    fn from(value: String) -> Self {
        Severity::from_code(&value)
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        value.code().to_string()
    }
}
