pub mod complex;
pub mod engine;
pub mod error;
pub mod gates;
pub mod state;
pub mod trace;

// Convenience re-exports for library users
pub use complex::Complex;
pub use engine::{QuantumEngine, DEFAULT_MAX_QUBITS, MAX_SUPPORTED_QUBITS};
pub use error::QuantumError;
pub use gates::Matrix2x2;
pub use state::StateVector;
pub use trace::{CircuitTrace, GateRecord};
