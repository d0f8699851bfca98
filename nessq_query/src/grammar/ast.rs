//! Query AST
//!
//! A [`Query`] is a disjunction of [`OrGroup`]s, each a conjunction of
//! [`Clause`]s. Clause keywords form a closed set ([`ClauseKey`]); anything
//! the parser cannot map onto it becomes [`Condition::Unsupported`], which
//! never matches.

use super::keywords;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute a clause inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClauseKey {
    PluginId,
    PluginName,
    Severity,
    Port,
    Ip,
}

impl ClauseKey {
    /// Parse a keyword (case-insensitive)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            keywords::PLUGIN_ID => Some(Self::PluginId),
            keywords::PLUGIN_NAME => Some(Self::PluginName),
            keywords::SEVERITY => Some(Self::Severity),
            keywords::PORT => Some(Self::Port),
            keywords::IP => Some(Self::Ip),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PluginId => keywords::PLUGIN_ID,
            Self::PluginName => keywords::PLUGIN_NAME,
            Self::Severity => keywords::SEVERITY,
            Self::Port => keywords::PORT,
            Self::Ip => keywords::IP,
        }
    }
}

impl fmt::Display for ClauseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Clause operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Equals,             // =
    LessThan,           // <
    LessThanOrEqual,    // <=
    GreaterThan,        // >
    GreaterThanOrEqual, // >=
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
        }
    }

    pub fn is_ordinal(&self) -> bool {
        !matches!(self, Self::Equals)
    }

    /// Apply the operator to two ordinals
    pub fn compare(&self, actual: i64, expected: i64) -> bool {
        match self {
            Self::Equals => actual == expected,
            Self::LessThan => actual < expected,
            Self::LessThanOrEqual => actual <= expected,
            Self::GreaterThan => actual > expected,
            Self::GreaterThanOrEqual => actual >= expected,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a clause can never match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsupportedReason {
    MissingOperator,
    UnknownKey(String),
    OrdinalOperator { key: ClauseKey, comparison: Comparison },
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOperator => write!(f, "no operator"),
            Self::UnknownKey(key) => write!(f, "unknown key '{}'", key),
            Self::OrdinalOperator { key, comparison } => {
                write!(f, "operator '{}' is not defined for '{}'", comparison, key)
            }
        }
    }
}

/// Atomic predicate. Value lists are lowercased and form a disjunction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    PluginId(Vec<String>),
    /// Substring containment against the plugin name
    PluginName(Vec<String>),
    Severity {
        comparison: Comparison,
        levels: Vec<Severity>,
    },
    /// Leading port number of the port-key
    Port(Vec<String>),
    Ip(Vec<String>),
    Unsupported(UnsupportedReason),
}

impl Condition {
    pub fn key(&self) -> Option<ClauseKey> {
        match self {
            Self::PluginId(_) => Some(ClauseKey::PluginId),
            Self::PluginName(_) => Some(ClauseKey::PluginName),
            Self::Severity { .. } => Some(ClauseKey::Severity),
            Self::Port(_) => Some(ClauseKey::Port),
            Self::Ip(_) => Some(ClauseKey::Ip),
            Self::Unsupported(_) => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

/// Optionally negated condition, keeping its source text for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub negated: bool,
    pub condition: Condition,
    pub text: String,
}

/// Conjunction of clauses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrGroup {
    pub clauses: Vec<Clause>,
}

/// Parsed query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub or_groups: Vec<OrGroup>,
}

impl Query {
    pub fn clause_count(&self) -> usize {
        self.or_groups.iter().map(|g| g.clauses.len()).sum()
    }

    /// Clauses that will never match on their own
    pub fn unsupported_clauses(&self) -> impl Iterator<Item = &Clause> {
        self.or_groups
            .iter()
            .flat_map(|g| g.clauses.iter())
            .filter(|c| !c.condition.is_supported())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
