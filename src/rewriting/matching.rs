//! The matching predicate.
//!
//! Decides whether a concrete operator is a structurally valid candidate
//! binding for a source pattern operator, under the matching state
//! accumulated so far. Pure with respect to the live state: observations
//! made here are kept in a local table and discarded after the call.

use std::collections::BTreeMap;

use crate::circuit::{CircuitGraph, Op};
use crate::rewriting::pattern::{PatternOpId, PatternWire, WireId};
use crate::rewriting::rule::RewriteRule;

impl RewriteRule {
    /// Whether `op` can be bound to the source pattern operator `src_id`
    /// without violating any wiring constraint observed so far.
    pub(crate) fn can_match(&self, src_id: PatternOpId, op: Op, graph: &CircuitGraph) -> bool {
        let src_op = &self.src_ops[src_id];
        if src_op.gate != op.gate {
            return false;
        }
        if src_op.inputs.len() != op.gate.num_inputs() {
            return false;
        }

        // Producers observed for open wires within this call only.
        let mut local: BTreeMap<WireId, (Op, usize)> = BTreeMap::new();

        for (slot, wire) in src_op.inputs.iter().enumerate() {
            match *wire {
                PatternWire::Bound {
                    op: earlier,
                    slot: out_slot,
                } => {
                    // An intermediate value: the producing pattern
                    // operator is earlier in the list and must already be
                    // bound.
                    let Some(bound) = self.state.bound[earlier] else {
                        return false;
                    };
                    if !graph.has_edge(bound, op, out_slot, slot) {
                        return false;
                    }
                }
                PatternWire::Open(wire) => {
                    if let Some(observations) = self.state.open_wires.get(&wire) {
                        let (producer, out_slot) = observations[0];
                        if !graph.has_edge(producer, op, out_slot, slot) {
                            return false;
                        }
                    } else if let Some(&(producer, out_slot)) = local.get(&wire) {
                        if !graph.has_edge(producer, op, out_slot, slot) {
                            return false;
                        }
                    } else {
                        let mut fed = false;
                        for edge in graph.in_edges(op) {
                            if edge.dst_slot == slot {
                                local.insert(wire, (edge.src, edge.src_slot));
                                fed = true;
                            }
                        }
                        // A slot nothing feeds pins the wire to no
                        // producer; replacement could not rewire it.
                        if !fed {
                            return false;
                        }
                    }
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use crate::gates::{GateSet, GateType};
    use crate::macros::{rule, template};

    use super::*;

    fn hx_rule() -> RewriteRule {
        // The second pattern operator consumes the first's output.
        rule!(
            template!(qubits: 1, params: 0;
                H("q0") -> ("q0");
                X("q0") -> ("q0");
            ) => template!(qubits: 1, params: 0;
                H("q0") -> ("q0");
                X("q0") -> ("q0");
            )
        )
        .unwrap()
    }

    #[test]
    fn rejects_type_mismatch() {
        let gates = GateSet::full();
        let q = gates.instantiate(GateType::InputQubit).unwrap();
        let x = gates.instantiate(GateType::X).unwrap();

        let mut graph = CircuitGraph::new();
        graph.add_edge(q, x, 0, 0);

        let rule = hx_rule();
        assert!(!rule.can_match(0, x, &graph));
        // The second operator's producer is not bound yet.
        assert!(!rule.can_match(1, x, &graph));
    }

    #[test]
    fn connected_pair_matches() {
        let gates = GateSet::full();
        let q = gates.instantiate(GateType::InputQubit).unwrap();
        let h = gates.instantiate(GateType::H).unwrap();
        let x = gates.instantiate(GateType::X).unwrap();

        let mut graph = CircuitGraph::new();
        graph.add_edge(q, h, 0, 0);
        graph.add_edge(h, x, 0, 0);

        let mut rule = hx_rule();
        assert!(rule.can_match(0, h, &graph));
        rule.commit(0, h, &graph);
        assert!(rule.can_match(1, x, &graph));
        rule.rollback(0, h, &graph);
    }

    #[test]
    fn disconnected_pair_fails_at_second_operator() {
        // H and X sit on different qubits: the first operator matches but
        // the second is not fed by it.
        let gates = GateSet::full();
        let q0 = gates.instantiate(GateType::InputQubit).unwrap();
        let q1 = gates.instantiate(GateType::InputQubit).unwrap();
        let h = gates.instantiate(GateType::H).unwrap();
        let x = gates.instantiate(GateType::X).unwrap();

        let mut graph = CircuitGraph::new();
        graph.add_edge(q0, h, 0, 0);
        graph.add_edge(q1, x, 0, 0);

        let mut rule = hx_rule();
        assert!(rule.can_match(0, h, &graph));
        rule.commit(0, h, &graph);
        assert!(!rule.can_match(1, x, &graph));
        rule.rollback(0, h, &graph);
        assert!(rule.state.is_clear());
    }

    #[test]
    fn committed_open_wire_constrains_later_operators() {
        // Both pattern operators consume the shared parameter p0.
        let mut rule = rule!(
            template!(qubits: 2, params: 1;
                Rz("q0", "p0") -> ("q0");
                Rz("q1", "p0") -> ("q1");
            ) => template!(qubits: 2, params: 1;
                Rz("q0", "p0") -> ("q0");
                Rz("q1", "p0") -> ("q1");
            )
        )
        .unwrap();

        let gates = GateSet::full();
        let q0 = gates.instantiate(GateType::InputQubit).unwrap();
        let q1 = gates.instantiate(GateType::InputQubit).unwrap();
        let p0 = gates.instantiate(GateType::InputParam).unwrap();
        let p1 = gates.instantiate(GateType::InputParam).unwrap();
        let rz_a = gates.instantiate(GateType::Rz).unwrap();
        let rz_b = gates.instantiate(GateType::Rz).unwrap();
        let rz_c = gates.instantiate(GateType::Rz).unwrap();

        // rz_a and rz_b share a parameter producer, rz_c has its own.
        let mut graph = CircuitGraph::new();
        graph.add_edge(q0, rz_a, 0, 0);
        graph.add_edge(p0, rz_a, 0, 1);
        graph.add_edge(q1, rz_b, 0, 0);
        graph.add_edge(p0, rz_b, 0, 1);
        graph.add_edge(rz_b, rz_c, 0, 0);
        graph.add_edge(p1, rz_c, 0, 1);

        rule.commit(0, rz_a, &graph);
        assert!(rule.can_match(1, rz_b, &graph));
        assert!(!rule.can_match(1, rz_c, &graph));
        rule.rollback(0, rz_a, &graph);
    }

    #[test]
    fn local_observations_constrain_within_one_call() {
        // One pattern operator consuming the same parameter twice: the
        // local observation from the first slot must agree with the
        // second.
        let source = template!(qubits: 0, params: 1;
            Add("p0", "p0") -> ("s");
        );
        let destination = template!(qubits: 0, params: 1;
            Add("p0", "p0") -> ("s");
        );
        let rule = RewriteRule::from_templates(&source, &destination).unwrap();

        let gates = GateSet::full();
        let p0 = gates.instantiate(GateType::InputParam).unwrap();
        let p1 = gates.instantiate(GateType::InputParam).unwrap();
        let doubled = gates.instantiate(GateType::Add).unwrap();
        let mixed = gates.instantiate(GateType::Add).unwrap();

        let mut graph = CircuitGraph::new();
        graph.add_edge(p0, doubled, 0, 0);
        graph.add_edge(p0, doubled, 0, 1);
        graph.add_edge(p0, mixed, 0, 0);
        graph.add_edge(p1, mixed, 0, 1);

        assert!(rule.can_match(0, doubled, &graph));
        assert!(!rule.can_match(0, mixed, &graph));
        // The predicate left no trace in the live state.
        assert!(rule.state.is_clear());
    }
}
