//! The caller-owned search frontier.
//!
//! A cost-ascending priority queue of candidate graphs together with the
//! set of structural hashes ever admitted. The engine only tests
//! membership, records hashes and pushes graphs; the outer loop pops.
//!
//! Hash collisions are treated as true duplicates, without a secondary
//! structural-equality check. This is an accepted approximation.

use std::cmp::{Ordering, Reverse};
use std::collections::{HashMap, HashSet};

use priority_queue::PriorityQueue;

use crate::circuit::CircuitGraph;

/// Total-ordered circuit cost.
#[derive(Copy, Clone, Debug)]
pub struct Cost(pub f32);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Cost-ordered frontier of candidate graphs with hash deduplication.
#[derive(Default)]
pub struct Frontier {
    queue: PriorityQueue<u64, Reverse<Cost>>,
    graphs: HashMap<u64, CircuitGraph>,
    admitted: HashSet<u64>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a graph with this structural hash was ever admitted.
    pub fn seen(&self, hash: u64) -> bool {
        self.admitted.contains(&hash)
    }

    /// Marks a structural hash as admitted.
    pub fn record(&mut self, hash: u64) {
        self.admitted.insert(hash);
    }

    /// Number of hashes ever admitted.
    pub fn seen_count(&self) -> usize {
        self.admitted.len()
    }

    /// Queues a candidate graph, keyed by its structural hash and ordered
    /// by ascending cost.
    pub fn push(&mut self, graph: CircuitGraph) {
        let hash = graph.structural_hash();
        let cost = Cost(graph.total_cost());
        self.graphs.insert(hash, graph);
        self.queue.push(hash, Reverse(cost));
    }

    /// Removes and returns the cheapest queued graph.
    pub fn pop(&mut self) -> Option<CircuitGraph> {
        let (hash, _) = self.queue.pop()?;
        self.graphs.remove(&hash)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::circuit::Op;
    use crate::gates::GateType;

    use super::*;

    fn graph_of_cost(gate_count: usize) -> CircuitGraph {
        let mut graph = CircuitGraph::new();
        let mut prev = Op {
            guid: 1,
            gate: GateType::InputQubit,
        };
        graph.add_op(prev);
        for index in 0..gate_count {
            let op = Op {
                guid: 2 + index as u64,
                gate: GateType::H,
            };
            graph.add_edge(prev, op, 0, 0);
            prev = op;
        }
        graph
    }

    #[test]
    fn pops_in_ascending_cost_order() {
        let mut frontier = Frontier::new();
        frontier.push(graph_of_cost(3));
        frontier.push(graph_of_cost(1));
        frontier.push(graph_of_cost(2));
        assert_eq!(frontier.len(), 3);

        let costs: Vec<f32> = std::iter::from_fn(|| frontier.pop())
            .map(|graph| graph.total_cost())
            .collect();
        assert_eq!(costs, vec![1.0, 2.0, 3.0]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn seen_hashes_are_remembered() {
        let mut frontier = Frontier::new();
        let graph = graph_of_cost(2);
        let hash = graph.structural_hash();

        assert!(!frontier.seen(hash));
        frontier.record(hash);
        frontier.push(graph);
        assert!(frontier.seen(hash));
        assert_eq!(frontier.seen_count(), 1);

        // Popping does not forget the hash.
        frontier.pop().unwrap();
        assert!(frontier.seen(hash));
    }
}
