//! The gate library.
//!
//! Gate kinds with their wire counts and costs, and [`GateSet`], the set of
//! gates an optimizer run may instantiate. Operator inputs are ordered
//! qubit wires first, then parameter wires.

use std::cell::Cell;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::circuit::Op;

/// The kind of a circuit operator.
///
/// `InputQubit` and `InputParam` are boundary producers: every circuit
/// starts from them, so every real gate input is backed by an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateType {
    H,
    X,
    Y,
    Z,
    S,
    Sdg,
    T,
    Tdg,
    Rx,
    Ry,
    Rz,
    Cx,
    Add,
    Neg,
    InputQubit,
    InputParam,
}

impl GateType {
    /// Number of qubit wires this gate consumes.
    pub fn num_qubits(self) -> usize {
        use GateType::*;
        match self {
            H | X | Y | Z | S | Sdg | T | Tdg | Rx | Ry | Rz => 1,
            Cx => 2,
            Add | Neg | InputQubit | InputParam => 0,
        }
    }

    /// Number of parameter wires this gate consumes.
    pub fn num_params(self) -> usize {
        use GateType::*;
        match self {
            Rx | Ry | Rz | Neg => 1,
            Add => 2,
            _ => 0,
        }
    }

    /// Total number of input wires, qubits first then parameters.
    pub fn num_inputs(self) -> usize {
        self.num_qubits() + self.num_params()
    }

    /// Number of output wires.
    ///
    /// Quantum gates produce one output per qubit, parameter gates and
    /// boundary producers a single value.
    pub fn num_outputs(self) -> usize {
        match self {
            GateType::Add | GateType::Neg | GateType::InputQubit | GateType::InputParam => 1,
            _ => self.num_qubits(),
        }
    }

    /// Whether the gate produces parameter values rather than qubit wires.
    ///
    /// Parameter outputs may fan out to several consumers; qubit outputs
    /// are linear and feed exactly one consumer.
    pub fn is_parameter_gate(self) -> bool {
        matches!(self, GateType::Add | GateType::Neg | GateType::InputParam)
    }

    /// Whether the gate is a circuit boundary producer.
    pub fn is_boundary(self) -> bool {
        matches!(self, GateType::InputQubit | GateType::InputParam)
    }

    /// Contribution of one instance of this gate to the total circuit cost.
    pub fn cost(self) -> f32 {
        use GateType::*;
        match self {
            Cx => 2.0,
            H | X | Y | Z | S | Sdg | T | Tdg | Rx | Ry | Rz => 1.0,
            Add | Neg | InputQubit | InputParam => 0.0,
        }
    }
}

/// The set of gates available to a search, plus the unique-id allocator
/// for newly instantiated operators.
///
/// Guids are monotone and never reused, so an [`Op`] handle can never be
/// confused with an operator from an earlier graph generation.
pub struct GateSet {
    supported: BTreeSet<GateType>,
    guid: Cell<u64>,
}

impl GateSet {
    /// Creates a gate set carrying the given gates.
    ///
    /// Boundary producers are always included.
    pub fn new(gates: impl IntoIterator<Item = GateType>) -> Self {
        let mut supported: BTreeSet<GateType> = gates.into_iter().collect();
        supported.insert(GateType::InputQubit);
        supported.insert(GateType::InputParam);
        Self {
            supported,
            guid: Cell::new(0),
        }
    }

    /// A gate set carrying every gate kind.
    pub fn full() -> Self {
        use GateType::*;
        Self::new([H, X, Y, Z, S, Sdg, T, Tdg, Rx, Ry, Rz, Cx, Add, Neg])
    }

    /// Allocates a fresh unique operator id.
    pub fn next_guid(&self) -> u64 {
        let guid = self.guid.get() + 1;
        self.guid.set(guid);
        guid
    }

    /// Instantiates a fresh concrete operator of the given kind.
    ///
    /// Returns `None` when the set does not carry the gate, which the
    /// search treats as a dead end rather than an error.
    pub fn instantiate(&self, gate: GateType) -> Option<Op> {
        self.supported.contains(&gate).then(|| Op {
            guid: self.next_guid(),
            gate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_counts() {
        assert_eq!(GateType::H.num_inputs(), 1);
        assert_eq!(GateType::H.num_outputs(), 1);
        assert_eq!(GateType::Cx.num_inputs(), 2);
        assert_eq!(GateType::Cx.num_outputs(), 2);
        assert_eq!(GateType::Rz.num_qubits(), 1);
        assert_eq!(GateType::Rz.num_params(), 1);
        assert_eq!(GateType::Rz.num_inputs(), 2);
        assert_eq!(GateType::Rz.num_outputs(), 1);
        assert_eq!(GateType::Add.num_inputs(), 2);
        assert_eq!(GateType::Add.num_outputs(), 1);
        assert_eq!(GateType::InputQubit.num_inputs(), 0);
    }

    #[test]
    fn boundary_gates_are_free() {
        assert_eq!(GateType::InputQubit.cost(), 0.0);
        assert_eq!(GateType::InputParam.cost(), 0.0);
        assert_eq!(GateType::Add.cost(), 0.0);
        assert!(GateType::H.cost() > 0.0);
    }

    #[test]
    fn instantiation() {
        let gates = GateSet::new([GateType::H]);

        let op = gates.instantiate(GateType::H).unwrap();
        assert_eq!(op.gate, GateType::H);
        assert!(gates.instantiate(GateType::Z).is_none());

        // Boundary gates are always available.
        assert!(gates.instantiate(GateType::InputQubit).is_some());
    }

    #[test]
    fn guids_are_unique_and_monotone() {
        let gates = GateSet::full();
        let a = gates.instantiate(GateType::H).unwrap();
        let b = gates.instantiate(GateType::H).unwrap();
        assert!(b.guid > a.guid);
    }
}
