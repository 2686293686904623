/// Circuit trace: the ordered log of engine operations, kept for diagram
/// rendering downstream. Serializes as `{"gate": "H", "qubit": 0}` records.
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "gate")]
pub enum GateRecord {
    H { qubit: usize },
    X { qubit: usize },
    #[serde(rename = "CNOT")]
    Cnot { control: usize, target: usize },
    M { qubit: usize },
}

impl GateRecord {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::H { .. } => "H",
            Self::X { .. } => "X",
            Self::Cnot { .. } => "CNOT",
            Self::M { .. } => "M",
        }
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self, Self::M { .. })
    }
}

impl fmt::Display for GateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::H { qubit } | Self::X { qubit } | Self::M { qubit } => {
                write!(f, "{} {}", self.mnemonic(), qubit)
            }
            Self::Cnot { control, target } => write!(f, "CNOT {control},{target}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitTrace {
    pub num_qubits: usize,
    pub gates: Vec<GateRecord>,
}

impl CircuitTrace {
    pub fn gate_count(&self) -> usize {
        self.gates.iter().filter(|g| !g.is_measurement()).count()
    }

    pub fn measure_count(&self) -> usize {
        self.gates.iter().filter(|g| g.is_measurement()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_gate_tag() {
        let trace = CircuitTrace {
            num_qubits: 2,
            gates: vec![
                GateRecord::H { qubit: 0 },
                GateRecord::Cnot { control: 0, target: 1 },
                GateRecord::M { qubit: 1 },
            ],
        };
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "numQubits": 2,
                "gates": [
                    {"gate": "H", "qubit": 0},
                    {"gate": "CNOT", "control": 0, "target": 1},
                    {"gate": "M", "qubit": 1}
                ]
            })
        );
    }

    #[test]
    fn test_counts() {
        let trace = CircuitTrace {
            num_qubits: 1,
            gates: vec![
                GateRecord::H { qubit: 0 },
                GateRecord::X { qubit: 0 },
                GateRecord::M { qubit: 0 },
            ],
        };
        assert_eq!(trace.gate_count(), 2);
        assert_eq!(trace.measure_count(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(GateRecord::Cnot { control: 1, target: 0 }.to_string(), "CNOT 1,0");
        assert_eq!(GateRecord::M { qubit: 3 }.to_string(), "M 3");
    }
}
