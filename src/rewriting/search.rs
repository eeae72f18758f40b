//! The backtracking search driver.
//!
//! Depth-first assignment of source pattern operators to concrete
//! operators, one per recursion level, with commit and rollback around
//! every trial. Concrete operators are enumerated in guid order, so the
//! search is deterministic for a given graph.

use crate::circuit::{CircuitGraph, Op};
use crate::gates::GateSet;
use crate::rewriting::frontier::Frontier;
use crate::rewriting::rule::RewriteRule;

impl RewriteRule {
    /// Finds every occurrence of the source pattern in `graph` and pushes
    /// each resulting replacement graph onto the frontier, subject to the
    /// strict cost `threshold` and operator bound `max_ops`.
    ///
    /// The live matching state is empty again when this returns.
    pub fn find_rewrites(
        &mut self,
        graph: &CircuitGraph,
        gates: &GateSet,
        frontier: &mut Frontier,
        threshold: f32,
        max_ops: usize,
    ) {
        self.run(0, graph, gates, frontier, threshold, max_ops);
        debug_assert!(self.state.is_clear());
    }

    fn run(
        &mut self,
        depth: usize,
        graph: &CircuitGraph,
        gates: &GateSet,
        frontier: &mut Frontier,
        threshold: f32,
        max_ops: usize,
    ) {
        if depth == self.src_ops.len() {
            self.try_candidate(graph, gates, frontier, threshold, max_ops);
            return;
        }

        for op in graph.ops() {
            if self.state.matched.contains_key(&op) {
                continue;
            }
            if !self.can_match(depth, op, graph) {
                continue;
            }
            self.commit(depth, op, graph);
            self.run(depth + 1, graph, gates, frontier, threshold, max_ops);
            // The recursion between commit and rollback is infallible, so
            // this pairing runs on every path.
            self.rollback(depth, op, graph);
        }
    }

    /// Handles a full assignment of the source pattern.
    fn try_candidate(
        &mut self,
        graph: &CircuitGraph,
        gates: &GateSet,
        frontier: &mut Frontier,
        threshold: f32,
        max_ops: usize,
    ) {
        // A gate missing from the set is a dead end, not an error.
        let Some(dst_bound) = self.instantiate_destination(gates) else {
            return;
        };
        if !self.boundary_covered(graph) {
            return;
        }

        let candidate = self.build_replacement(graph, &dst_bound);
        if candidate.has_cycle() {
            return;
        }
        if !candidate.is_structurally_valid() {
            return;
        }
        if candidate.total_cost() >= threshold {
            return;
        }
        if candidate.op_count() >= max_ops {
            return;
        }

        let hash = candidate.structural_hash();
        if frontier.seen(hash) {
            return;
        }
        frontier.record(hash);
        frontier.push(candidate);
    }

    /// Instantiates one concrete operator per destination pattern
    /// operator, or `None` if any gate is not in the set.
    fn instantiate_destination(&self, gates: &GateSet) -> Option<Vec<Op>> {
        self.dst_ops
            .iter()
            .map(|pattern_op| gates.instantiate(pattern_op.gate))
            .collect()
    }

    /// Checks that every output of the matched region consumed from
    /// outside it has a destination-side replacement.
    fn boundary_covered(&self, graph: &CircuitGraph) -> bool {
        for (&op, &src_id) in &self.state.matched {
            for edge in graph.out_edges(op) {
                if self.state.matched.contains_key(&edge.dst) {
                    continue;
                }
                if !self.mapped_outputs.contains_key(&(src_id, edge.src_slot)) {
                    return false;
                }
            }
        }
        true
    }
}
