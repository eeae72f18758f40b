//! Rewrite rules and their live matching state.
//!
//! A [`RewriteRule`] owns a source and a destination pattern built once
//! from a pair of equivalent templates, the fixed output-correspondence
//! table between them, and the transient state of the one search currently
//! running against a concrete graph.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use anyhow::{Context, Result, bail, ensure};

use crate::circuit::{CircuitGraph, Op};
use crate::rewriting::pattern::{PatternOp, PatternOpId, PatternWire, WireId};
use crate::rewriting::template::{RuleTemplate, TemplateOp};

/// State of one in-flight search.
///
/// Empty outside of a top-level search; mutated only through
/// [`RewriteRule::commit`] and [`RewriteRule::rollback`].
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MatchState {
    /// Source pattern operator -> concrete operator.
    pub bound: Vec<Option<Op>>,
    /// Concrete operator -> source pattern operator.
    pub matched: BTreeMap<Op, PatternOpId>,
    /// Open wire -> ordered (producer, output slot) observations, one per
    /// committed consumer of the wire.
    pub open_wires: BTreeMap<WireId, Vec<(Op, usize)>>,
}

impl MatchState {
    pub fn is_clear(&self) -> bool {
        self.bound.iter().all(Option::is_none)
            && self.matched.is_empty()
            && self.open_wires.is_empty()
    }
}

/// A rewrite rule: one valid local replacement of a source pattern by an
/// equivalent destination pattern.
pub struct RewriteRule {
    pub(crate) src_ops: Vec<PatternOp>,
    pub(crate) dst_ops: Vec<PatternOp>,
    /// Source-side output wire -> the destination-side wire that stands in
    /// for it after rewriting. Fixed at construction.
    pub(crate) mapped_outputs: BTreeMap<(PatternOpId, usize), PatternWire>,
    pub(crate) state: MatchState,
    pub(crate) next_wire: WireId,
}

impl RewriteRule {
    /// Builds a rule from a pair of equivalent templates.
    ///
    /// Both sides must declare the same number of external qubit and
    /// parameter wires; the shared externals get identical open-wire
    /// identities on both sides. Malformed templates fail here, before a
    /// usable rule exists.
    pub fn from_templates(source: &RuleTemplate, destination: &RuleTemplate) -> Result<Self> {
        ensure!(
            source.qubits == destination.qubits,
            "templates disagree on qubit count: {} vs {}",
            source.qubits,
            destination.qubits,
        );
        ensure!(
            source.params == destination.params,
            "templates disagree on parameter count: {} vs {}",
            source.params,
            destination.params,
        );

        let mut rule = Self {
            src_ops: Vec::new(),
            dst_ops: Vec::new(),
            mapped_outputs: BTreeMap::new(),
            state: MatchState::default(),
            next_wire: 0,
        };

        // The external interface, shared between the two sides.
        let mut src_env = HashMap::new();
        let mut dst_env = HashMap::new();
        for index in 0..source.qubits {
            let wire = PatternWire::Open(rule.new_wire());
            src_env.insert(format!("q{index}"), wire);
            dst_env.insert(format!("q{index}"), wire);
        }
        for index in 0..source.params {
            let wire = PatternWire::Open(rule.new_wire());
            src_env.insert(format!("p{index}"), wire);
            dst_env.insert(format!("p{index}"), wire);
        }

        rule.src_ops = build_pattern(&source.ops, &mut src_env, source.qubits, source.params)
            .context("building the source pattern")?;
        rule.dst_ops = build_pattern(&destination.ops, &mut dst_env, source.qubits, source.params)
            .context("building the destination pattern")?;

        // Every open wire the destination resolves at rewrite time must be
        // pinned down by the source pattern during matching.
        let src_open: BTreeSet<WireId> = rule
            .src_ops
            .iter()
            .flat_map(|op| op.open_inputs().map(|(_, wire)| wire))
            .collect();
        for op in &rule.dst_ops {
            for (_, wire) in op.open_inputs() {
                ensure!(
                    src_open.contains(&wire),
                    "destination consumes an external wire the source never observes",
                );
            }
        }

        // Record which destination value replaces each qubit's final
        // source-side value for external consumers.
        for index in 0..source.qubits {
            let name = format!("q{index}");
            let src_final = src_env[&name];
            let dst_final = dst_env[&name];
            if let PatternWire::Bound { op, slot } = src_final {
                if let PatternWire::Open(wire) = dst_final {
                    ensure!(
                        src_open.contains(&wire),
                        "qubit {index} is rewired to an external wire the source never observes",
                    );
                }
                rule.mapped_outputs.insert((op, slot), dst_final);
            }
        }

        rule.state.bound = vec![None; rule.src_ops.len()];
        Ok(rule)
    }

    fn new_wire(&mut self) -> WireId {
        let wire = self.next_wire;
        self.next_wire += 1;
        wire
    }

    /// Number of operators in the source pattern.
    pub fn pattern_size(&self) -> usize {
        self.src_ops.len()
    }

    /// Binds the source pattern operator `src_id` to the concrete
    /// operator `op`.
    ///
    /// Records one (producer, output slot) observation per open-wire input
    /// of the pattern operator, read off the concrete graph's actual
    /// incoming edges. The matching predicate has already checked that
    /// repeated observations of one wire agree.
    pub(crate) fn commit(&mut self, src_id: PatternOpId, op: Op, graph: &CircuitGraph) {
        for (slot, wire) in self.src_ops[src_id].open_inputs() {
            for edge in graph.in_edges(op) {
                if edge.dst_slot == slot {
                    self.state
                        .open_wires
                        .entry(wire)
                        .or_default()
                        .push((edge.src, edge.src_slot));
                }
            }
        }
        self.state.bound[src_id] = Some(op);
        self.state.matched.insert(op, src_id);
    }

    /// Exact inverse of [`RewriteRule::commit`]: removes every
    /// observation that commit added and clears both bindings.
    pub(crate) fn rollback(&mut self, src_id: PatternOpId, op: Op, graph: &CircuitGraph) {
        for (slot, wire) in self.src_ops[src_id].open_inputs() {
            for edge in graph.in_edges(op) {
                if edge.dst_slot == slot {
                    let observations = self
                        .state
                        .open_wires
                        .get_mut(&wire)
                        .expect("rollback without a matching commit");
                    observations.pop();
                    if observations.is_empty() {
                        self.state.open_wires.remove(&wire);
                    }
                }
            }
        }
        self.state.matched.remove(&op);
        self.state.bound[src_id] = None;
    }
}

fn build_pattern(
    template_ops: &[TemplateOp],
    env: &mut HashMap<String, PatternWire>,
    qubits: usize,
    params: usize,
) -> Result<Vec<PatternOp>> {
    let mut ops = Vec::with_capacity(template_ops.len());
    // Names whose current binding some operator has consumed.
    let mut consumed: HashSet<String> = HashSet::new();

    for template_op in template_ops {
        let gate = template_op.gate;
        ensure!(
            template_op.inputs.len() == gate.num_inputs(),
            "{gate:?} takes {} inputs, template lists {}",
            gate.num_inputs(),
            template_op.inputs.len(),
        );
        ensure!(
            template_op.outputs.len() == gate.num_outputs(),
            "{gate:?} produces {} outputs, template lists {}",
            gate.num_outputs(),
            template_op.outputs.len(),
        );

        let id = ops.len();
        let mut op = PatternOp::new(gate);
        for name in &template_op.inputs {
            let Some(&wire) = env.get(name) else {
                bail!("unknown wire `{name}` consumed by {gate:?}");
            };
            op.add_input(wire);
            consumed.insert(name.clone());
        }
        for (slot, name) in template_op.outputs.iter().enumerate() {
            if let Some(index) = external_index(name, 'q') {
                ensure!(
                    index < qubits,
                    "output `{name}` exceeds the {qubits} declared qubit wires",
                );
            }
            if let Some(index) = external_index(name, 'p') {
                ensure!(
                    index < params,
                    "output `{name}` exceeds the {params} declared parameter wires",
                );
            }
            // Rebinding a name whose value no operator consumed would
            // leave that value orphaned.
            ensure!(
                !env.contains_key(name) || consumed.contains(name),
                "output `{name}` of {gate:?} shadows an unconsumed wire",
            );
            let wire = PatternWire::Bound { op: id, slot };
            op.add_output(wire);
            env.insert(name.clone(), wire);
            consumed.remove(name);
        }
        ops.push(op);
    }

    Ok(ops)
}

/// The index of an external wire name (`q3`, `p0`), if the name is one.
fn external_index(name: &str, prefix: char) -> Option<usize> {
    name.strip_prefix(prefix)?.parse().ok()
}
