//! Replacement-graph construction.
//!
//! Builds the graph that results from replacing a fully matched source
//! pattern with the destination pattern. The searched graph is only read;
//! the result is a fresh, independently owned graph.

use itertools::Itertools;

use crate::circuit::{CircuitGraph, Op};
use crate::rewriting::pattern::PatternWire;
use crate::rewriting::rule::RewriteRule;

impl RewriteRule {
    /// Builds the rewritten graph for the current full assignment.
    ///
    /// `dst_bound` holds the freshly instantiated concrete operator for
    /// each destination pattern operator. Must only be called after the
    /// boundary check has passed.
    pub(crate) fn build_replacement(
        &self,
        graph: &CircuitGraph,
        dst_bound: &[Op],
    ) -> CircuitGraph {
        let mut rewritten = CircuitGraph::new();

        // Operators outside the matched region survive unchanged. Edges
        // between two survivors are copied verbatim; edges from a matched
        // operator into a survivor are redirected through the
        // output-correspondence table.
        for op in graph.ops() {
            if self.state.matched.contains_key(&op) {
                continue;
            }
            rewritten.add_op(op);
            for edge in graph.in_edges(op) {
                if let Some(&src_id) = self.state.matched.get(&edge.src) {
                    let replacement = self.mapped_outputs[&(src_id, edge.src_slot)];
                    let (producer, out_slot) = self.resolve_wire(replacement, dst_bound);
                    rewritten.add_edge(producer, op, out_slot, edge.dst_slot);
                } else {
                    rewritten.add_edge(edge.src, edge.dst, edge.src_slot, edge.dst_slot);
                }
            }
        }

        // Wire up the destination pattern itself: bound inputs connect
        // new operator to new operator, open inputs connect from the
        // producers recorded during matching.
        for (pattern_op, &op) in self.dst_ops.iter().zip_eq(dst_bound) {
            rewritten.add_op(op);
            for (slot, &wire) in pattern_op.inputs.iter().enumerate() {
                let (producer, out_slot) = self.resolve_wire(wire, dst_bound);
                rewritten.add_edge(producer, op, out_slot, slot);
            }
        }

        rewritten
    }

    /// Resolves a destination-side wire to a concrete (producer, output
    /// slot) pair.
    ///
    /// Every open wire here has at least one recorded observation: the
    /// matching predicate refuses operators with unfed input slots.
    fn resolve_wire(&self, wire: PatternWire, dst_bound: &[Op]) -> (Op, usize) {
        match wire {
            PatternWire::Bound { op, slot } => (dst_bound[op], slot),
            PatternWire::Open(wire) => self.state.open_wires[&wire][0],
        }
    }
}
