//! Concrete circuit graphs.
//!
//! A [`CircuitGraph`] stores operators and their wiring as ordered edge
//! sets, keyed by operator guid. All iteration orders are deterministic so
//! that repeated searches over the same graph enumerate candidates in the
//! same order.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::hash::{Hash, Hasher};

use crate::gates::GateType;

pub mod random;

/// A handle to one concrete operator.
///
/// Guids come from [`crate::gates::GateSet::next_guid`] and are never
/// reused, so a stale handle can never alias a newer operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Op {
    pub guid: u64,
    pub gate: GateType,
}

/// A wire from one operator's output slot to another's input slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Edge {
    pub src: Op,
    pub dst: Op,
    pub src_slot: usize,
    pub dst_slot: usize,
}

/// A directed circuit graph with per-operator in- and out-edge sets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CircuitGraph {
    in_edges: BTreeMap<Op, BTreeSet<Edge>>,
    out_edges: BTreeMap<Op, BTreeSet<Edge>>,
}

impl CircuitGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an operator without any wiring.
    ///
    /// Operators referenced by [`CircuitGraph::add_edge`] are added
    /// implicitly; this is only needed for operators that may end up with
    /// no edges at all.
    pub fn add_op(&mut self, op: Op) {
        self.in_edges.entry(op).or_default();
        self.out_edges.entry(op).or_default();
    }

    /// Wires `src`'s output slot `src_slot` into `dst`'s input slot
    /// `dst_slot`.
    pub fn add_edge(&mut self, src: Op, dst: Op, src_slot: usize, dst_slot: usize) {
        self.add_op(src);
        self.add_op(dst);
        let edge = Edge {
            src,
            dst,
            src_slot,
            dst_slot,
        };
        self.out_edges.get_mut(&src).unwrap().insert(edge);
        self.in_edges.get_mut(&dst).unwrap().insert(edge);
    }

    /// Whether the exact edge is present.
    pub fn has_edge(&self, src: Op, dst: Op, src_slot: usize, dst_slot: usize) -> bool {
        let edge = Edge {
            src,
            dst,
            src_slot,
            dst_slot,
        };
        self.in_edges
            .get(&dst)
            .is_some_and(|edges| edges.contains(&edge))
    }

    /// Edges entering `op`, in deterministic order.
    pub fn in_edges(&self, op: Op) -> impl Iterator<Item = &Edge> {
        self.in_edges.get(&op).into_iter().flatten()
    }

    /// Edges leaving `op`, in deterministic order.
    pub fn out_edges(&self, op: Op) -> impl Iterator<Item = &Edge> {
        self.out_edges.get(&op).into_iter().flatten()
    }

    /// All operators, in guid order.
    pub fn ops(&self) -> impl Iterator<Item = Op> {
        self.in_edges.keys().copied()
    }

    /// Whether the operator is present in this graph.
    pub fn contains(&self, op: Op) -> bool {
        self.in_edges.contains_key(&op)
    }

    /// Number of operators, boundary producers included.
    pub fn op_count(&self) -> usize {
        self.in_edges.len()
    }

    /// Number of operators that are actual gates.
    pub fn gate_count(&self) -> usize {
        self.ops().filter(|op| !op.gate.is_boundary()).count()
    }

    /// Total cost of the circuit under the per-gate cost model.
    pub fn total_cost(&self) -> f32 {
        self.ops().map(|op| op.gate.cost()).sum()
    }

    /// A guid-independent fingerprint of gate kinds and connectivity.
    ///
    /// Two graphs that differ only in operator guids hash equal. Distinct
    /// structures may collide; collisions are accepted as duplicates by
    /// the search, without a secondary structural-equality check.
    pub fn structural_hash(&self) -> u64 {
        let mut total: u64 = 0;
        for op in self.ops() {
            let mut hasher = std::hash::DefaultHasher::new();
            op.gate.hash(&mut hasher);
            for edge in self.in_edges(op) {
                (0u8, edge.src.gate, edge.src_slot, edge.dst_slot).hash(&mut hasher);
            }
            for edge in self.out_edges(op) {
                (1u8, edge.dst.gate, edge.src_slot, edge.dst_slot).hash(&mut hasher);
            }
            // Commutative combination: independent of operator order.
            total = total.wrapping_add(hasher.finish());
        }
        total
    }

    /// Whether the graph contains a directed cycle.
    pub fn has_cycle(&self) -> bool {
        let mut indegree: BTreeMap<Op, usize> = self
            .ops()
            .map(|op| (op, self.in_edges(op).count()))
            .collect();

        let mut ready: VecDeque<Op> = indegree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&op, _)| op)
            .collect();

        let mut visited = 0;
        while let Some(op) = ready.pop_front() {
            visited += 1;
            for edge in self.out_edges(op) {
                let degree = indegree.get_mut(&edge.dst).unwrap();
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(edge.dst);
                }
            }
        }

        visited != self.op_count()
    }

    /// Checks the wiring discipline of every operator.
    ///
    /// Each input slot is fed by at most one edge and lies within the
    /// gate's arity; each output slot lies within the gate's output count;
    /// qubit output slots feed at most one consumer, while parameter
    /// outputs may fan out.
    pub fn is_structurally_valid(&self) -> bool {
        for op in self.ops() {
            let mut fed_inputs = BTreeSet::new();
            for edge in self.in_edges(op) {
                if edge.dst_slot >= op.gate.num_inputs() {
                    return false;
                }
                if !fed_inputs.insert(edge.dst_slot) {
                    return false;
                }
            }

            let mut used_outputs = BTreeSet::new();
            for edge in self.out_edges(op) {
                if edge.src_slot >= op.gate.num_outputs() {
                    return false;
                }
                if !op.gate.is_parameter_gate() && !used_outputs.insert(edge.src_slot) {
                    return false;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::GateSet;

    fn op(guid: u64, gate: GateType) -> Op {
        Op { guid, gate }
    }

    #[test]
    fn edges_and_ops() {
        let mut graph = CircuitGraph::new();
        let input = op(1, GateType::InputQubit);
        let h = op(2, GateType::H);
        graph.add_edge(input, h, 0, 0);

        assert!(graph.has_edge(input, h, 0, 0));
        assert!(!graph.has_edge(input, h, 0, 1));
        assert!(!graph.has_edge(h, input, 0, 0));
        assert_eq!(graph.op_count(), 2);
        assert_eq!(graph.gate_count(), 1);
        assert_eq!(graph.ops().collect::<Vec<_>>(), vec![input, h]);
        assert_eq!(graph.in_edges(h).count(), 1);
        assert_eq!(graph.out_edges(input).count(), 1);
    }

    #[test]
    fn cost_sums_gates() {
        let mut graph = CircuitGraph::new();
        let q0 = op(1, GateType::InputQubit);
        let q1 = op(2, GateType::InputQubit);
        let h = op(3, GateType::H);
        let cx = op(4, GateType::Cx);
        graph.add_edge(q0, h, 0, 0);
        graph.add_edge(h, cx, 0, 0);
        graph.add_edge(q1, cx, 0, 1);

        assert_eq!(graph.total_cost(), 3.0);
    }

    #[test]
    fn hash_ignores_guids() {
        let build = |offset: u64| {
            let mut graph = CircuitGraph::new();
            let input = op(offset, GateType::InputQubit);
            let h = op(offset + 1, GateType::H);
            let x = op(offset + 2, GateType::X);
            graph.add_edge(input, h, 0, 0);
            graph.add_edge(h, x, 0, 0);
            graph
        };

        assert_eq!(build(1).structural_hash(), build(100).structural_hash());
    }

    #[test]
    fn hash_sees_structure() {
        let mut chain = CircuitGraph::new();
        let input = op(1, GateType::InputQubit);
        let h = op(2, GateType::H);
        let x = op(3, GateType::X);
        chain.add_edge(input, h, 0, 0);
        chain.add_edge(h, x, 0, 0);

        let mut swapped = CircuitGraph::new();
        let input = op(1, GateType::InputQubit);
        let x = op(2, GateType::X);
        let h = op(3, GateType::H);
        swapped.add_edge(input, x, 0, 0);
        swapped.add_edge(x, h, 0, 0);

        assert_ne!(chain.structural_hash(), swapped.structural_hash());
    }

    #[test]
    fn cycle_detection() {
        let mut graph = CircuitGraph::new();
        let a = op(1, GateType::H);
        let b = op(2, GateType::H);
        graph.add_edge(a, b, 0, 0);
        assert!(!graph.has_cycle());

        graph.add_edge(b, a, 0, 0);
        assert!(graph.has_cycle());
    }

    #[test]
    fn validity_rejects_double_fed_input() {
        let mut graph = CircuitGraph::new();
        let q0 = op(1, GateType::InputQubit);
        let q1 = op(2, GateType::InputQubit);
        let h = op(3, GateType::H);
        graph.add_edge(q0, h, 0, 0);
        assert!(graph.is_structurally_valid());

        graph.add_edge(q1, h, 0, 0);
        assert!(!graph.is_structurally_valid());
    }

    #[test]
    fn validity_rejects_qubit_fanout_but_allows_param_fanout() {
        let gates = GateSet::full();
        let q = gates.instantiate(GateType::InputQubit).unwrap();
        let h1 = gates.instantiate(GateType::H).unwrap();
        let h2 = gates.instantiate(GateType::H).unwrap();

        let mut graph = CircuitGraph::new();
        graph.add_edge(q, h1, 0, 0);
        graph.add_edge(q, h2, 0, 0);
        assert!(!graph.is_structurally_valid());

        let p = gates.instantiate(GateType::InputParam).unwrap();
        let q = gates.instantiate(GateType::InputQubit).unwrap();
        let rz1 = gates.instantiate(GateType::Rz).unwrap();
        let rz2 = gates.instantiate(GateType::Rz).unwrap();

        let mut graph = CircuitGraph::new();
        graph.add_edge(q, rz1, 0, 0);
        graph.add_edge(rz1, rz2, 0, 0);
        graph.add_edge(p, rz1, 0, 1);
        graph.add_edge(p, rz2, 0, 1);
        assert!(graph.is_structurally_valid());
    }

    #[test]
    fn validity_rejects_out_of_range_slots() {
        let mut graph = CircuitGraph::new();
        let q = op(1, GateType::InputQubit);
        let h = op(2, GateType::H);
        graph.add_edge(q, h, 0, 1);
        assert!(!graph.is_structurally_valid());
    }
}
