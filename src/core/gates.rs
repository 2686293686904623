/// Gate kernels over a dense state vector.
///
/// Single-qubit gates pair every basis index `i0` whose target bit is clear
/// with `i1 = i0 | (1 << target)` and apply a 2×2 matrix to the pair, O(2^n)
/// per gate. Both old amplitudes of a pair are read before either is
/// written. Qubit indices are validated by the engine before these run.
use super::complex::Complex;
use super::state::StateVector;
use std::f64::consts::FRAC_1_SQRT_2;

/// A 2×2 complex unitary, row-major: matrix[row][col].
pub type Matrix2x2 = [[Complex; 2]; 2];

/// H = (1/√2) [[1, 1], [1, -1]]
pub fn hadamard() -> Matrix2x2 {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

/// Apply a single-qubit gate to `target`.
pub fn apply_single_qubit_gate(state: &mut StateVector, gate: &Matrix2x2, target: usize) {
    debug_assert!(target < state.num_qubits, "target qubit out of range");

    let mask = 1usize << target;
    for i0 in 0..state.dim() {
        if i0 & mask != 0 {
            continue;
        }
        let i1 = i0 | mask;
        let a0 = state.amplitudes[i0];
        let a1 = state.amplitudes[i1];
        state.amplitudes[i0] = gate[0][0] * a0 + gate[0][1] * a1;
        state.amplitudes[i1] = gate[1][0] * a0 + gate[1][1] * a1;
    }
}

/// Pauli-X: swap each (i0, i1) pair. A pure permutation, so magnitudes are
/// preserved bit-for-bit.
pub fn apply_pauli_x(state: &mut StateVector, target: usize) {
    debug_assert!(target < state.num_qubits, "target qubit out of range");

    let mask = 1usize << target;
    for i0 in 0..state.dim() {
        if i0 & mask == 0 {
            state.amplitudes.swap(i0, i0 | mask);
        }
    }
}

/// CNOT: for every index with `control` set and `target` clear, swap with
/// the index that has `target` set. With `control == target` no index
/// qualifies and the register is unchanged.
pub fn apply_cnot(state: &mut StateVector, control: usize, target: usize) {
    debug_assert!(control < state.num_qubits, "control qubit out of range");
    debug_assert!(target < state.num_qubits, "target qubit out of range");

    let control_mask = 1usize << control;
    let target_mask = 1usize << target;

    for i in 0..state.dim() {
        if (i & control_mask != 0) && (i & target_mask == 0) {
            state.amplitudes.swap(i, i | target_mask);
        }
    }
}
