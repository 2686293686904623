//! # qbasic
//!
//! A line-numbered BASIC dialect with quantum-circuit statements, executed
//! against a dense state-vector simulator.
//!
//! ## Quick Start
//!
//! ```rust
//! use qbasic::runtime::{Interpreter, RunConfig};
//!
//! let source = "\
//! 10 QINIT 2
//! 20 HADAMARD 0
//! 30 CNOT 0,1
//! 40 MEASURE 0
//! 50 PRINT \"Qubit 0: \"; QRESULT
//! 60 END";
//!
//! // Seeded for a reproducible measurement
//! let interpreter = Interpreter::new(RunConfig::default().with_seed(7)).unwrap();
//! let result = interpreter.run(source).unwrap();
//!
//! assert_eq!(result.output[0], "Initialized 2 qubit(s)");
//! assert_eq!(result.circuit_trace.unwrap().gates.len(), 3);
//!
//! // Measuring qubit 0 collapsed the Bell pair: one basis state remains
//! let probs = result.quantum_state.unwrap();
//! assert!((probs[0] - 1.0).abs() < 1e-9 || (probs[3] - 1.0).abs() < 1e-9);
//! ```

pub mod core;
pub mod error;
pub mod language;
pub mod runtime;

pub use error::{RunError, RunFailure};
pub use runtime::{run, run_async, run_with_config, Interpreter, RunConfig, RunOutput};
