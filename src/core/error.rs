//! Errors raised by the quantum engine.

use thiserror::Error;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, QuantumError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    /// `initialize` was asked for a register it cannot build.
    #[error("invalid qubit count {requested}: must be between 1 and {max}")]
    InvalidQubitCount { requested: i64, max: usize },

    /// A gate or measurement named a qubit outside the register.
    #[error("qubit index {qubit} out of range for a {num_qubits}-qubit register")]
    QubitIndexOutOfRange { qubit: i64, num_qubits: usize },
}
