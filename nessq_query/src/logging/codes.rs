//! Log codes and their classification metadata
//!
//! Single source of truth for every code the workspace emits.

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata attached to a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub recoverable: bool,
    pub description: &'static str,
}

impl CodeMetadata {
    const fn new(
        code: &'static str,
        category: &'static str,
        recoverable: bool,
        description: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            recoverable,
            description,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const CONFIGURATION_INVALID: Code = Code::new("ERR003");
}

/// Query language codes
pub mod query {
    use super::Code;

    pub const MALFORMED_CLAUSE: Code = Code::new("E010");
    pub const UNKNOWN_KEY: Code = Code::new("E011");
    pub const UNSUPPORTED_SYNTAX: Code = Code::new("E012");
}

/// Report ingestion codes
pub mod ingest {
    use super::Code;

    pub const PATH_NOT_FOUND: Code = Code::new("E020");
    pub const READ_FAILURE: Code = Code::new("E021");
    pub const XML_PARSE_FAILURE: Code = Code::new("E022");
}

/// Matching codes
pub mod matching {
    use super::Code;

    pub const NO_MATCHED_HOSTS: Code = Code::new("E030");
}

/// Rendering and template output codes
pub mod output {
    use super::Code;

    pub const RENDER_FAILURE: Code = Code::new("E040");
    pub const TEMPLATE_FAILURE: Code = Code::new("E041");
    pub const WRITE_FAILURE: Code = Code::new("E042");
    pub const UNMATCHED_PLUGINS: Code = Code::new("W040");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const FILE_PARSED: Code = Code::new("I002");
    pub const QUERY_COMPLETED: Code = Code::new("I003");
    pub const TEMPLATE_WRITTEN: Code = Code::new("I004");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const METADATA: &[CodeMetadata] = &[
    CodeMetadata::new("ERR001", "System", false, "Internal error"),
    CodeMetadata::new("ERR003", "System", false, "Configuration is invalid"),
    CodeMetadata::new("E010", "Query", true, "Clause has no operator"),
    CodeMetadata::new("E011", "Query", true, "Clause uses an unknown key"),
    CodeMetadata::new("E012", "Query", true, "Query uses unsupported syntax"),
    CodeMetadata::new("E020", "Ingest", false, "Input path does not exist"),
    CodeMetadata::new("E021", "Ingest", false, "Input file could not be read"),
    CodeMetadata::new("E022", "Ingest", false, "Report XML could not be parsed"),
    CodeMetadata::new("E030", "Match", true, "No hosts matched the query"),
    CodeMetadata::new("E040", "Output", false, "Rendering failed"),
    CodeMetadata::new("E041", "Output", false, "Template could not be processed"),
    CodeMetadata::new("E042", "Output", false, "Output could not be written"),
    CodeMetadata::new("W040", "Output", true, "Plugins not covered by the template"),
    CodeMetadata::new("I001", "Success", true, "Logging initialized"),
    CodeMetadata::new("I002", "Success", true, "Report file parsed"),
    CodeMetadata::new("I003", "Success", true, "Query evaluated"),
    CodeMetadata::new("I004", "Success", true, "Template written"),
];

/// Look up metadata for a code
pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    METADATA.iter().find(|meta| meta.code == code)
}

pub fn get_category(code: &str) -> &'static str {
    match get_metadata(code) {
        Some(meta) => meta.category,
        None => match code.chars().next() {
            Some('W') => "Warning",
            Some('I') => "Info",
            Some('D') => "Debug",
            _ => "Unknown",
        },
    }
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|meta| meta.description)
        .unwrap_or("Unknown error")
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).map(|meta| meta.recoverable).unwrap_or(true)
}
