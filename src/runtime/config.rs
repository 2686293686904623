//! Run configuration.
//!
//! Every field has a default, so a JSON config file only names the fields
//! it changes: `{"seed": 7, "goto_policy": "strict"}`.

use crate::core::{DEFAULT_MAX_QUBITS, MAX_SUPPORTED_QUBITS};
use crate::error::{Result, RunError};
use crate::language::DuplicateLinePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cap on top-level statements per run.
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// What `GOTO` does when no line carries the target number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GotoPolicy {
    /// Continue with the next line.
    #[default]
    FallThrough,
    /// Fail the run with `UnknownLineTarget`.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Top-level statements executed before the run is aborted.
    pub max_steps: usize,
    /// Wall-clock budget in milliseconds; `None` means unlimited.
    pub time_budget_ms: Option<u64>,
    /// Largest register `QINIT` accepts.
    pub max_qubits: usize,
    pub goto_policy: GotoPolicy,
    pub duplicate_lines: DuplicateLinePolicy,
    /// Measurement RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Attach a quantum engine. Without one, quantum statements fail.
    pub quantum: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            time_budget_ms: None,
            max_qubits: DEFAULT_MAX_QUBITS,
            goto_policy: GotoPolicy::default(),
            duplicate_lines: DuplicateLinePolicy::default(),
            seed: None,
            quantum: true,
        }
    }
}

impl RunConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse a JSON document, then validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| RunError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(RunError::InvalidConfig("max_steps must be positive".into()));
        }
        if self.max_qubits == 0 || self.max_qubits > MAX_SUPPORTED_QUBITS {
            return Err(RunError::InvalidConfig(format!(
                "max_qubits must be in 1..={MAX_SUPPORTED_QUBITS}, got {}",
                self.max_qubits
            )));
        }
        if self.time_budget_ms == Some(0) {
            return Err(RunError::InvalidConfig("time_budget_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_steps, 1_000_000);
        assert_eq!(config.max_qubits, 20);
        assert!(config.quantum);
        assert!(config.time_budget().is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RunConfig::from_json(r#"{"seed": 7, "goto_policy": "strict"}"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.goto_policy, GotoPolicy::Strict);
        assert_eq!(config.max_steps, DEFAULT_MAX_STEPS);
        assert_eq!(config.duplicate_lines, DuplicateLinePolicy::Keep);
    }

    #[test]
    fn test_policies_deserialize_snake_case() {
        let config =
            RunConfig::from_json(r#"{"goto_policy": "fall_through", "duplicate_lines": "reject"}"#)
                .unwrap();
        assert_eq!(config.goto_policy, GotoPolicy::FallThrough);
        assert_eq!(config.duplicate_lines, DuplicateLinePolicy::Reject);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for bad in [
            r#"{"max_steps": 0}"#,
            r#"{"max_qubits": 0}"#,
            r#"{"max_qubits": 31}"#,
            r#"{"time_budget_ms": 0}"#,
            r#"{"goto_policy": "sometimes"}"#,
            "not json",
        ] {
            let err = RunConfig::from_json(bad).unwrap_err();
            assert_eq!(err.kind(), "InvalidConfig", "{bad}");
        }
    }

    #[test]
    fn test_serializes_round_trip() {
        let config = RunConfig::default().with_seed(3);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RunConfig::from_json(&json).unwrap(), config);
    }
}
