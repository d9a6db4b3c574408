use std::fmt;

/// Pipeline error classes. All of these degrade a report rather than the
/// session: callers render them as text and keep going. The enum exists so
/// the few places that must branch (unknown-table short-circuit, exit-code
/// mapping) can downcast instead of matching on message strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Storage engine or generation backend unreachable.
    Connectivity(String),
    /// Backend reachable but returned an error payload or empty output.
    GenerationBackend(String),
    /// Storage engine rejected the SQL (syntax or constraint violation).
    MalformedStatement(String),
    /// Schema lookup on a table that does not exist.
    UnknownTable(String),
    /// Caller omitted a required field.
    EmptyInput(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Connectivity(msg) => write!(f, "connectivity error: {}", msg),
            PipelineError::GenerationBackend(msg) => {
                write!(f, "generation backend error: {}", msg)
            }
            PipelineError::MalformedStatement(msg) => write!(f, "statement rejected: {}", msg),
            PipelineError::UnknownTable(table) => write!(f, "unknown table: {}", table),
            PipelineError::EmptyInput(field) => write!(f, "missing required input: {}", field),
        }
    }
}

impl std::error::Error for PipelineError {}
