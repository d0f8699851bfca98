// Internal modules
#[macro_use]
pub mod logging;
pub mod config;
pub mod grammar;
pub mod lexical;
pub mod severity;

// Re-export key types for library consumers
pub use config::{ConfigError, NessqConfig};
pub use grammar::ast::{Clause, ClauseKey, Comparison, Condition, OrGroup, Query, UnsupportedReason};
pub use grammar::parser::{parse_clause, parse_query};
pub use severity::Severity;
