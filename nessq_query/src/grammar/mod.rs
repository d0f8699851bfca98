//! Query grammar: AST types, clause keywords and the parser

pub mod ast;
pub mod keywords;
pub mod parser;

pub use ast::{Clause, ClauseKey, Comparison, Condition, OrGroup, Query, UnsupportedReason};
pub use parser::{parse_clause, parse_query};
