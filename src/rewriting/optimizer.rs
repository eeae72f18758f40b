//! Best-first optimization over rewrite candidates.
//!
//! Repeatedly pops the cheapest known graph from the frontier and applies
//! every rule to it. Rule ordering is the caller's list order; more
//! elaborate scheduling policies are out of scope here.

use std::time::{Duration, Instant};

use crate::circuit::CircuitGraph;
use crate::gates::GateSet;
use crate::rewriting::frontier::Frontier;
use crate::rewriting::rule::RewriteRule;

/// Resource limits and pruning parameters for one optimization run.
#[derive(Clone, Debug)]
pub struct OptimizerConfig {
    /// Maximum number of graphs popped from the frontier.
    pub budget: usize,
    /// Maximum wall-clock time, checked between rule applications.
    pub time_limit: Option<Duration>,
    /// Candidates may grow to at most this multiple of the initial
    /// operator count.
    pub max_ops_factor: f32,
    /// Candidates must stay strictly below `best_cost * threshold_slack`;
    /// a slack above 1 admits equal-cost detours.
    pub threshold_slack: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            budget: 10_000,
            time_limit: None,
            max_ops_factor: 2.0,
            threshold_slack: 1.05,
        }
    }
}

/// Why an optimization run stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The frontier ran dry.
    Exhausted,
    /// The candidate budget was spent.
    Budget,
    /// The time limit was hit.
    Timeout,
}

/// Result of one optimization run.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub initial_cost: f32,
    pub best_cost: f32,
    pub best: CircuitGraph,
    /// Graphs popped from the frontier.
    pub explored: usize,
    /// Distinct candidate structures ever admitted.
    pub candidates: usize,
    pub elapsed: Duration,
    pub stop_reason: StopReason,
}

/// Optimizes `graph` by best-first search over rule applications.
pub fn optimize(
    rules: &mut [RewriteRule],
    graph: CircuitGraph,
    gates: &GateSet,
    config: &OptimizerConfig,
) -> Outcome {
    let start = Instant::now();
    let initial_cost = graph.total_cost();
    let max_ops = (graph.op_count() as f32 * config.max_ops_factor) as usize + 1;

    let mut best = graph.clone();
    let mut best_cost = initial_cost;

    let mut frontier = Frontier::new();
    frontier.record(graph.structural_hash());
    frontier.push(graph);

    let mut explored = 0;
    let stop_reason = loop {
        if let Some(limit) = config.time_limit
            && start.elapsed() >= limit
        {
            break StopReason::Timeout;
        }
        if explored >= config.budget {
            break StopReason::Budget;
        }
        let Some(current) = frontier.pop() else {
            break StopReason::Exhausted;
        };
        explored += 1;

        let cost = current.total_cost();
        if cost < best_cost {
            best_cost = cost;
            best = current.clone();
        }

        let threshold = best_cost * config.threshold_slack;
        for rule in rules.iter_mut() {
            rule.find_rewrites(&current, gates, &mut frontier, threshold, max_ops);
        }
    };

    Outcome {
        initial_cost,
        best_cost,
        best,
        explored,
        candidates: frontier.seen_count(),
        elapsed: start.elapsed(),
        stop_reason,
    }
}
