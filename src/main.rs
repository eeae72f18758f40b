#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tabled::{Table, Tabled};

use circuit::random::random_circuit;
use gates::GateSet;
use rewriting::library;
use rewriting::optimizer::{Outcome, OptimizerConfig, optimize};
use rewriting::template::load_pairs;

mod circuit;
mod gates;
mod macros;
mod rewriting;

/// Cost-guided circuit optimizer demo.
#[derive(Parser)]
struct Args {
    /// Number of qubits in the generated circuit
    #[arg(long, default_value_t = 4)]
    qubits: usize,
    /// Number of gates in the generated circuit
    #[arg(long, default_value_t = 30)]
    gates: usize,
    /// RNG seed for circuit generation
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Maximum number of explored graphs
    #[arg(long, default_value_t = 10_000)]
    budget: usize,
    /// Wall-clock limit in milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,
    /// JSON rule library to use instead of the builtin rules
    #[arg(long)]
    rules: Option<PathBuf>,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Initial Cost")]
    initial_cost: f32,
    #[tabled(rename = "Best Cost")]
    best_cost: f32,
    #[tabled(rename = "Gates Left")]
    gates_left: usize,
    #[tabled(rename = "Explored")]
    explored: usize,
    #[tabled(rename = "Candidates")]
    candidates: usize,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Stop Reason")]
    stop_reason: String,
}

impl From<&Outcome> for SummaryRow {
    fn from(outcome: &Outcome) -> Self {
        Self {
            initial_cost: outcome.initial_cost,
            best_cost: outcome.best_cost,
            gates_left: outcome.best.gate_count(),
            explored: outcome.explored,
            candidates: outcome.candidates,
            time: format!("{:.2?}", outcome.elapsed),
            stop_reason: format!("{:?}", outcome.stop_reason),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let gates = GateSet::full();
    let mut rules = match &args.rules {
        Some(path) => library::build_rules(&load_pairs(path)?)?,
        None => library::builtin_rules(),
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let graph = random_circuit(&gates, args.qubits, args.gates, &mut rng);

    let config = OptimizerConfig {
        budget: args.budget,
        time_limit: args.time_limit_ms.map(Duration::from_millis),
        ..OptimizerConfig::default()
    };
    let outcome = optimize(&mut rules, graph, &gates, &config);

    println!("{}", Table::new([SummaryRow::from(&outcome)]));
    Ok(())
}
