/// Dense qubit register.
///
/// An n-qubit register holds 2^n complex amplitudes, one per basis state.
/// Bit `q` of a basis index is the classical value of qubit `q`, so qubit 0
/// is the least-significant bit. After every completed operation the
/// register satisfies Σ|αᵢ|² = 1 within floating tolerance.
use super::complex::Complex;

#[derive(Debug, Clone)]
pub struct StateVector {
    pub num_qubits: usize,
    pub amplitudes: Vec<Complex>,
}

impl StateVector {
    /// Register of `num_qubits` qubits in |0...0⟩.
    ///
    /// Callers validate the qubit count; the engine bounds it well below the
    /// point where `1 << num_qubits` stops fitting in memory.
    pub fn new(num_qubits: usize) -> Self {
        debug_assert!(num_qubits >= 1, "at least one qubit required");

        let dim = 1usize << num_qubits;
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[0] = Complex::one();

        Self {
            num_qubits,
            amplitudes,
        }
    }

    /// Dimension of the state space: 2^n
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    #[inline(always)]
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes[index].norm_sq()
    }

    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(Complex::norm_sq).sum()
    }

    /// |αᵢ|² for every basis index, in index order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex::norm_sq).collect()
    }

    /// True if qubit `qubit` is 1 in basis state `basis_idx`.
    #[inline(always)]
    pub fn qubit_bit(basis_idx: usize, qubit: usize) -> bool {
        (basis_idx >> qubit) & 1 == 1
    }

    /// Ket label for `index`, qubit 0 rightmost: index 1 of 3 qubits is "001".
    pub fn basis_label(index: usize, num_qubits: usize) -> String {
        (0..num_qubits)
            .rev()
            .map(|q| if Self::qubit_bit(index, q) { '1' } else { '0' })
            .collect()
    }

    /// Probability that measuring `qubit` yields `bit`, marginalized over
    /// every other qubit.
    pub fn marginal_probability(&self, qubit: usize, bit: bool) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| Self::qubit_bit(*i, qubit) == bit)
            .map(|(_, a)| a.norm_sq())
            .sum()
    }

    /// Projective measurement of `qubit` driven by `sample`, a uniform draw in
    /// [0, 1).
    ///
    /// The outcome is 0 when `sample < P(qubit = 0)`, else 1, except that a
    /// branch with probability at most `f64::EPSILON` is never chosen.
    /// Amplitudes that disagree with the outcome are zeroed; the rest are
    /// divided by the square root of the outcome's probability.
    pub fn collapse(&mut self, qubit: usize, sample: f64) -> u8 {
        let prob0 = self.marginal_probability(qubit, false);
        let prob1 = self.marginal_probability(qubit, true);

        // A branch holding only rounding residue is never selected.
        let outcome = if prob1 <= f64::EPSILON {
            false
        } else if prob0 <= f64::EPSILON {
            true
        } else {
            sample >= prob0
        };
        let kept = if outcome { prob1 } else { prob0 };
        let inv_norm = 1.0 / kept.sqrt();

        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if Self::qubit_bit(i, qubit) == outcome {
                *amp = amp.scale(inv_norm);
            } else {
                *amp = Complex::zero();
            }
        }

        outcome as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn plus_state() -> StateVector {
        let mut sv = StateVector::new(1);
        sv.amplitudes[0] = Complex::new(FRAC_1_SQRT_2, 0.0);
        sv.amplitudes[1] = Complex::new(FRAC_1_SQRT_2, 0.0);
        sv
    }

    #[test]
    fn test_initial_state() {
        let sv = StateVector::new(2);
        assert_eq!(sv.dim(), 4);
        assert_eq!(sv.amplitudes[0], Complex::one());
        for i in 1..4 {
            assert_eq!(sv.amplitudes[i], Complex::zero());
        }
        assert!((sv.total_probability() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_qubit_bit() {
        // 5 = 0b101: qubit 0 = 1, qubit 1 = 0, qubit 2 = 1
        assert!(StateVector::qubit_bit(5, 0));
        assert!(!StateVector::qubit_bit(5, 1));
        assert!(StateVector::qubit_bit(5, 2));
    }

    #[test]
    fn test_basis_label() {
        assert_eq!(StateVector::basis_label(0, 3), "000");
        assert_eq!(StateVector::basis_label(1, 3), "001");
        assert_eq!(StateVector::basis_label(6, 3), "110");
        assert_eq!(StateVector::basis_label(2, 1), "0");
    }

    #[test]
    fn test_marginal_probability() {
        let sv = plus_state();
        assert!((sv.marginal_probability(0, true) - 0.5).abs() < 1e-12);
        assert!((sv.marginal_probability(0, false) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_collapse_low_sample_gives_zero() {
        let mut sv = plus_state();
        assert_eq!(sv.collapse(0, 0.25), 0);
        assert!((sv.probability(0) - 1.0).abs() < 1e-12);
        assert_eq!(sv.amplitudes[1], Complex::zero());
    }

    #[test]
    fn test_collapse_high_sample_gives_one() {
        let mut sv = plus_state();
        assert_eq!(sv.collapse(0, 0.75), 1);
        assert!((sv.probability(1) - 1.0).abs() < 1e-12);
        assert!((sv.total_probability() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_collapse_keeps_relative_phase() {
        // (|00⟩ - |01⟩ + |10⟩ - |11⟩) / 2, measure qubit 1 → outcome 1
        let mut sv = StateVector::new(2);
        sv.amplitudes = vec![
            Complex::new(0.5, 0.0),
            Complex::new(-0.5, 0.0),
            Complex::new(0.5, 0.0),
            Complex::new(-0.5, 0.0),
        ];
        assert_eq!(sv.collapse(1, 0.9), 1);
        assert_eq!(sv.amplitudes[2], Complex::new(FRAC_1_SQRT_2, 0.0));
        assert_eq!(sv.amplitudes[3], Complex::new(-FRAC_1_SQRT_2, 0.0));
    }

    #[test]
    fn test_collapse_never_picks_empty_branch() {
        // Definite |0⟩: even the largest sample must not select outcome 1.
        let mut sv = StateVector::new(1);
        assert_eq!(sv.collapse(0, 0.999_999_999), 0);
        assert!((sv.total_probability() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_collapse_ignores_residue_on_zero_branch() {
        // |1⟩ with rounding residue on |0⟩: a zero sample must still give 1.
        let mut sv = StateVector::new(1);
        sv.amplitudes = vec![Complex::new(1e-9, 0.0), Complex::one()];
        assert_eq!(sv.collapse(0, 0.0), 1);
        assert_eq!(sv.amplitudes[0], Complex::zero());
        assert!((sv.probability(1) - 1.0).abs() < 1e-12);
    }
}
