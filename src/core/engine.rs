/// Quantum engine: the qubit register plus its circuit trace.
///
/// `QuantumEngine` knows nothing about the language above it. Qubit
/// arguments arrive as signed integers because they come straight from
/// program text; every operation validates them against the current
/// register before touching any state, so a failed call leaves both the
/// amplitudes and the trace unchanged.
///
/// Before the first `initialize` the register has zero qubits: every gate
/// fails with `QubitIndexOutOfRange` and the probability snapshot is empty.
use super::error::{QuantumError, Result};
use super::gates::{self, apply_cnot, apply_pauli_x, apply_single_qubit_gate};
use super::state::StateVector;
use super::trace::{CircuitTrace, GateRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Default register ceiling. 2^20 amplitudes is 16 MiB.
pub const DEFAULT_MAX_QUBITS: usize = 20;

/// Hard ceiling regardless of configuration (2^30 amplitudes is 16 GiB).
pub const MAX_SUPPORTED_QUBITS: usize = 30;

pub struct QuantumEngine {
    register: Option<StateVector>,
    trace: Vec<GateRecord>,
    rng: StdRng,
    max_qubits: usize,
}

impl QuantumEngine {
    /// Engine whose measurements draw from OS entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Engine with a fixed RNG seed: identical programs measure identically.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            register: None,
            trace: Vec::new(),
            rng,
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }

    /// Override the largest register `initialize` will accept. Clamped to
    /// `MAX_SUPPORTED_QUBITS`.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits.min(MAX_SUPPORTED_QUBITS);
        self
    }

    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// Qubits in the current register; 0 before `initialize`.
    pub fn num_qubits(&self) -> usize {
        self.register.as_ref().map_or(0, |r| r.num_qubits)
    }

    pub fn is_initialized(&self) -> bool {
        self.register.is_some()
    }

    /// Read-only view of the register, if one exists.
    pub fn state(&self) -> Option<&StateVector> {
        self.register.as_ref()
    }

    // ── Register lifecycle ────────────────────────────────────────────────

    /// Replace the register with `num_qubits` qubits in |0...0⟩ and clear the
    /// circuit trace.
    pub fn initialize(&mut self, num_qubits: i64) -> Result<()> {
        let n = usize::try_from(num_qubits)
            .ok()
            .filter(|n| (1..=self.max_qubits).contains(n))
            .ok_or(QuantumError::InvalidQubitCount {
                requested: num_qubits,
                max: self.max_qubits,
            })?;

        debug!(num_qubits = n, "initializing register");
        self.register = Some(StateVector::new(n));
        self.trace.clear();
        Ok(())
    }

    // ── Gates ─────────────────────────────────────────────────────────────

    pub fn hadamard(&mut self, qubit: i64) -> Result<()> {
        let q = self.check_qubit(qubit)?;
        let register = self.register_mut(qubit)?;
        apply_single_qubit_gate(register, &gates::hadamard(), q);
        self.record(GateRecord::H { qubit: q });
        Ok(())
    }

    pub fn pauli_x(&mut self, qubit: i64) -> Result<()> {
        let q = self.check_qubit(qubit)?;
        let register = self.register_mut(qubit)?;
        apply_pauli_x(register, q);
        self.record(GateRecord::X { qubit: q });
        Ok(())
    }

    pub fn cnot(&mut self, control: i64, target: i64) -> Result<()> {
        let c = self.check_qubit(control)?;
        let t = self.check_qubit(target)?;
        let register = self.register_mut(control)?;
        apply_cnot(register, c, t);
        self.record(GateRecord::Cnot { control: c, target: t });
        Ok(())
    }

    // ── Measurement ───────────────────────────────────────────────────────

    /// Measure `qubit`, collapsing the register. Returns 0 or 1.
    pub fn measure(&mut self, qubit: i64) -> Result<u8> {
        let q = self.check_qubit(qubit)?;
        let sample: f64 = self.rng.gen();
        let register = self.register_mut(qubit)?;
        let outcome = register.collapse(q, sample);
        debug!(qubit = q, sample, outcome, "measured");
        self.record(GateRecord::M { qubit: q });
        Ok(outcome)
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Probability of each basis index. Empty before `initialize`.
    pub fn snapshot_probabilities(&self) -> Vec<f64> {
        self.register
            .as_ref()
            .map(StateVector::probabilities)
            .unwrap_or_default()
    }

    /// Marginal probability that `qubit` would measure as 1.
    pub fn qubit_probability_one(&self, qubit: i64) -> Result<f64> {
        let q = self.check_qubit(qubit)?;
        Ok(self
            .register
            .as_ref()
            .map_or(0.0, |r| r.marginal_probability(q, true)))
    }

    pub fn circuit_trace(&self) -> CircuitTrace {
        CircuitTrace {
            num_qubits: self.num_qubits(),
            gates: self.trace.clone(),
        }
    }

    // ── Internal ──────────────────────────────────────────────────────────

    fn check_qubit(&self, qubit: i64) -> Result<usize> {
        let num_qubits = self.num_qubits();
        usize::try_from(qubit)
            .ok()
            .filter(|&q| q < num_qubits)
            .ok_or(QuantumError::QubitIndexOutOfRange { qubit, num_qubits })
    }

    fn register_mut(&mut self, qubit: i64) -> Result<&mut StateVector> {
        self.register
            .as_mut()
            .ok_or(QuantumError::QubitIndexOutOfRange { qubit, num_qubits: 0 })
    }

    fn record(&mut self, gate: GateRecord) {
        debug!(%gate, "applied");
        self.trace.push(gate);
    }
}

impl Default for QuantumEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(engine: &QuantumEngine) -> f64 {
        engine.snapshot_probabilities().iter().sum()
    }

    #[test]
    fn test_initialize_all_zero_state() {
        let mut engine = QuantumEngine::with_seed(1);
        engine.initialize(3).unwrap();
        let probs = engine.snapshot_probabilities();
        assert_eq!(probs.len(), 8);
        assert!((probs[0] - 1.0).abs() < 1e-12);
        assert!(probs[1..].iter().all(|p| p.abs() < 1e-12));
        assert!(engine.circuit_trace().gates.is_empty());
    }

    #[test]
    fn test_initialize_rejects_non_positive() {
        let mut engine = QuantumEngine::with_seed(1);
        assert!(matches!(
            engine.initialize(0),
            Err(QuantumError::InvalidQubitCount { requested: 0, .. })
        ));
        assert!(matches!(
            engine.initialize(-2),
            Err(QuantumError::InvalidQubitCount { requested: -2, .. })
        ));
        assert!(!engine.is_initialized());
    }

    #[test]
    fn test_initialize_rejects_above_ceiling() {
        let mut engine = QuantumEngine::with_seed(1).with_max_qubits(4);
        assert!(engine.initialize(4).is_ok());
        assert!(matches!(
            engine.initialize(5),
            Err(QuantumError::InvalidQubitCount { requested: 5, max: 4 })
        ));
    }

    #[test]
    fn test_reinitialize_resets_trace() {
        let mut engine = QuantumEngine::with_seed(1);
        engine.initialize(1).unwrap();
        engine.hadamard(0).unwrap();
        engine.initialize(2).unwrap();
        let trace = engine.circuit_trace();
        assert_eq!(trace.num_qubits, 2);
        assert!(trace.gates.is_empty());
    }

    #[test]
    fn test_pauli_x_is_deterministic() {
        let mut engine = QuantumEngine::with_seed(1);
        engine.initialize(2).unwrap();
        engine.pauli_x(0).unwrap();
        assert_eq!(engine.snapshot_probabilities(), vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_hadamard_twice_restores_state() {
        let mut engine = QuantumEngine::with_seed(1);
        engine.initialize(2).unwrap();
        engine.hadamard(1).unwrap();
        engine.cnot(1, 0).unwrap();
        let before = engine.state().unwrap().amplitudes.clone();
        engine.hadamard(0).unwrap();
        engine.hadamard(0).unwrap();
        assert_eq!(engine.state().unwrap().amplitudes, before);
    }

    #[test]
    fn test_gate_before_initialize_is_out_of_range() {
        let mut engine = QuantumEngine::with_seed(1);
        assert_eq!(
            engine.hadamard(0),
            Err(QuantumError::QubitIndexOutOfRange { qubit: 0, num_qubits: 0 })
        );
        assert!(engine.snapshot_probabilities().is_empty());
    }

    #[test]
    fn test_out_of_range_leaves_state_and_trace_untouched() {
        let mut engine = QuantumEngine::with_seed(1);
        engine.initialize(2).unwrap();
        engine.hadamard(0).unwrap();
        let before = engine.snapshot_probabilities();

        assert!(engine.pauli_x(2).is_err());
        assert!(engine.cnot(0, -1).is_err());
        assert!(engine.measure(7).is_err());

        assert_eq!(engine.snapshot_probabilities(), before);
        assert_eq!(engine.circuit_trace().gates, vec![GateRecord::H { qubit: 0 }]);
    }

    #[test]
    fn test_trace_records_in_invocation_order() {
        let mut engine = QuantumEngine::with_seed(9);
        engine.initialize(2).unwrap();
        engine.hadamard(0).unwrap();
        engine.cnot(0, 1).unwrap();
        engine.pauli_x(1).unwrap();
        engine.cnot(1, 1).unwrap();
        engine.measure(0).unwrap();
        assert_eq!(
            engine.circuit_trace().gates,
            vec![
                GateRecord::H { qubit: 0 },
                GateRecord::Cnot { control: 0, target: 1 },
                GateRecord::X { qubit: 1 },
                GateRecord::Cnot { control: 1, target: 1 },
                GateRecord::M { qubit: 0 },
            ]
        );
    }

    #[test]
    fn test_measure_definite_states() {
        let mut engine = QuantumEngine::with_seed(3);
        engine.initialize(2).unwrap();
        engine.pauli_x(1).unwrap();
        assert_eq!(engine.measure(0).unwrap(), 0);
        assert_eq!(engine.measure(1).unwrap(), 1);
        assert!((total(&engine) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bell_measurements_agree() {
        for seed in 0..200 {
            let mut engine = QuantumEngine::with_seed(seed);
            engine.initialize(2).unwrap();
            engine.hadamard(0).unwrap();
            engine.cnot(0, 1).unwrap();
            let a = engine.measure(0).unwrap();
            let b = engine.measure(1).unwrap();
            assert_eq!(a, b, "seed {seed}");
            assert!((total(&engine) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_measure_collapses_superposition() {
        let mut engine = QuantumEngine::with_seed(11);
        engine.initialize(1).unwrap();
        engine.hadamard(0).unwrap();
        let outcome = engine.measure(0).unwrap();
        let p1 = engine.qubit_probability_one(0).unwrap();
        assert!((p1 - f64::from(outcome)).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let run = |seed| {
            let mut engine = QuantumEngine::with_seed(seed);
            engine.initialize(3).unwrap();
            (0..3).for_each(|q| engine.hadamard(q).unwrap());
            (0..3).map(|q| engine.measure(q).unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
