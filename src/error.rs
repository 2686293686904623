//! Run-level error types.
//!
//! Every variant aborts the run that raised it. A `GOTO` to a missing line
//! (unless the strict policy is configured) and an expression that cannot be
//! evaluated are not errors; the latter yields its own source text.

use crate::core::QuantumError;
use thiserror::Error;

/// Result alias used throughout the interpreter.
pub type Result<T> = std::result::Result<T, RunError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    /// A source line does not match `<integer> <statement>`.
    #[error("invalid line format: '{line}'")]
    InvalidLineFormat { line: String },

    /// Two lines share a number while duplicates are rejected.
    #[error("duplicate line number {line_number}")]
    DuplicateLineNumber { line_number: u64 },

    /// The leading keyword is not part of the language.
    #[error("unknown statement: {statement}")]
    UnknownStatement { statement: String },

    #[error("IF without THEN: {statement}")]
    MissingThen { statement: String },

    /// A known keyword whose operands cannot be used.
    #[error("malformed statement '{statement}': {reason}")]
    MalformedStatement { statement: String, reason: String },

    /// A quantum instruction ran with no engine configured.
    #[error("no quantum engine attached: cannot execute '{statement}'")]
    QuantumEngineNotAttached { statement: String },

    #[error(transparent)]
    Quantum(#[from] QuantumError),

    /// `GOTO` to a missing line under the strict policy.
    #[error("GOTO {target}: no line with that number")]
    UnknownLineTarget { target: i64 },

    /// The step or time budget ran out.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The task running the program ended abnormally.
    #[error("run aborted: {0}")]
    Aborted(String),
}

impl RunError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidLineFormat { .. } => "InvalidLineFormat",
            Self::DuplicateLineNumber { .. } => "DuplicateLineNumber",
            Self::UnknownStatement { .. } => "UnknownStatement",
            Self::MissingThen { .. } => "MissingThen",
            Self::MalformedStatement { .. } => "MalformedStatement",
            Self::QuantumEngineNotAttached { .. } => "QuantumEngineNotAttached",
            Self::Quantum(QuantumError::InvalidQubitCount { .. }) => "InvalidQubitCount",
            Self::Quantum(QuantumError::QubitIndexOutOfRange { .. }) => "QubitIndexOutOfRange",
            Self::UnknownLineTarget { .. } => "UnknownLineTarget",
            Self::ResourceExhausted(_) => "ResourceExhausted",
            Self::InvalidConfig(_) => "InvalidConfig",
            Self::Aborted(_) => "Aborted",
        }
    }

    pub(crate) fn malformed(statement: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedStatement {
            statement: statement.into(),
            reason: reason.into(),
        }
    }
}

/// A failed run: the error plus every output line produced before it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error}")]
pub struct RunFailure {
    #[source]
    pub error: RunError,
    pub output: Vec<String>,
}

impl RunFailure {
    pub fn new(error: RunError, output: Vec<String>) -> Self {
        Self { error, output }
    }

    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

impl From<RunError> for RunFailure {
    fn from(error: RunError) -> Self {
        Self::new(error, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_quantum_errors() {
        let err: RunError = QuantumError::QubitIndexOutOfRange { qubit: 3, num_qubits: 2 }.into();
        assert_eq!(err.kind(), "QubitIndexOutOfRange");
        assert!(err.to_string().contains("qubit index 3"));

        let err: RunError = QuantumError::InvalidQubitCount { requested: 0, max: 20 }.into();
        assert_eq!(err.kind(), "InvalidQubitCount");
    }

    #[test]
    fn test_unknown_statement_names_text() {
        let err = RunError::UnknownStatement { statement: "FOO 1".into() };
        assert_eq!(err.to_string(), "unknown statement: FOO 1");
    }

    #[test]
    fn test_failure_keeps_output() {
        let failure = RunFailure::new(
            RunError::MissingThen { statement: "IF A = 1".into() },
            vec!["before".into()],
        );
        assert_eq!(failure.kind(), "MissingThen");
        assert_eq!(failure.output, vec!["before".to_string()]);
        assert!(failure.to_string().starts_with("IF without THEN"));
    }
}
