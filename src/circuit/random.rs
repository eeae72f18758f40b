//! Random circuit generation for the demo driver and tests.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::circuit::CircuitGraph;
use crate::gates::{GateSet, GateType};

/// Generates a random, structurally valid circuit.
///
/// The circuit starts from `qubits` qubit inputs and two parameter inputs
/// and layers `num_gates` random gates over the current qubit frontier.
/// Gates missing from the gate set are skipped.
///
/// # Panics
///
/// Panics if `qubits` is zero.
pub fn random_circuit(
    gates: &GateSet,
    qubits: usize,
    num_gates: usize,
    rng: &mut impl Rng,
) -> CircuitGraph {
    assert!(qubits > 0, "a circuit needs at least one qubit");

    let mut graph = CircuitGraph::new();

    // Last producer of each qubit wire, as (op, output slot).
    let mut frontier: Vec<_> = (0..qubits)
        .map(|_| {
            let input = gates
                .instantiate(GateType::InputQubit)
                .expect("boundary gates are always carried");
            graph.add_op(input);
            (input, 0)
        })
        .collect();

    let params: Vec<_> = (0..2)
        .map(|_| {
            let input = gates
                .instantiate(GateType::InputParam)
                .expect("boundary gates are always carried");
            graph.add_op(input);
            (input, 0)
        })
        .collect();

    use GateType::*;
    let pool: Vec<GateType> = [H, X, Y, Z, S, T, Rz, Cx]
        .into_iter()
        .filter(|gate| gate.num_qubits() <= qubits)
        .collect();

    for _ in 0..num_gates {
        let &gate = pool.choose(rng).expect("gate pool is never empty");
        let Some(op) = gates.instantiate(gate) else {
            continue;
        };

        let mut lanes: Vec<usize> = (0..qubits).collect();
        lanes.shuffle(rng);
        let lanes = &lanes[..gate.num_qubits()];

        for (slot, &lane) in lanes.iter().enumerate() {
            let (src, src_slot) = frontier[lane];
            graph.add_edge(src, op, src_slot, slot);
        }
        for slot in 0..gate.num_params() {
            let &(src, src_slot) = params.choose(rng).expect("parameter inputs exist");
            graph.add_edge(src, op, src_slot, gate.num_qubits() + slot);
        }
        for (slot, &lane) in lanes.iter().enumerate() {
            frontier[lane] = (op, slot);
        }
    }

    graph
}
