/// Quantum BASIC runtime.
///
/// The runtime layer sits above the language front end and the quantum
/// engine and handles:
///   - PC-based execution of the sorted line table
///   - Per-run state (variables, output, engine)
///   - Step and time budgets
///
/// Architecture:
///   source → Program (line table) → Interpreter → RunOutput
///
/// `run_async` moves a run onto tokio's blocking pool so a host can drive
/// many independent runs at once. A run itself never yields.
pub mod config;
pub mod executor;

pub use config::{GotoPolicy, RunConfig, DEFAULT_MAX_STEPS};
pub use executor::{ExecutionContext, Flow, Interpreter, RunOutput};

use crate::error::{RunError, RunFailure};

/// Run `source` with the default configuration.
pub fn run(source: &str) -> Result<RunOutput, RunFailure> {
    run_with_config(source, RunConfig::default())
}

pub fn run_with_config(source: &str, config: RunConfig) -> Result<RunOutput, RunFailure> {
    Interpreter::new(config)?.run(source)
}

/// Run `source` on the blocking thread pool.
pub async fn run_async(source: String, config: RunConfig) -> Result<RunOutput, RunFailure> {
    let interpreter = Interpreter::new(config)?;
    tokio::task::spawn_blocking(move || interpreter.run(&source))
        .await
        .map_err(|e| RunFailure::from(RunError::Aborted(e.to_string())))?
}
