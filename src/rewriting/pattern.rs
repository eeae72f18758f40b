//! Pattern wires and pattern operators.
//!
//! A rewrite rule's two sides are small operator graphs over abstract
//! wires. An open wire stands for a value produced outside the pattern
//! and is resolved against the searched graph during matching; a bound
//! wire is produced by an earlier operator of the same pattern.

use crate::gates::GateType;

/// Identity of an open wire, unique within one rule and shared between
/// the rule's two sides.
pub type WireId = usize;

/// Arena index of a pattern operator within one side of a rule.
pub type PatternOpId = usize;

/// A reference to a value flowing through a pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PatternWire {
    /// A value supplied from outside the pattern.
    Open(WireId),
    /// The value produced at `slot` by the pattern operator `op`.
    Bound { op: PatternOpId, slot: usize },
}

/// One node of a rule's source or destination pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternOp {
    pub gate: GateType,
    pub inputs: Vec<PatternWire>,
    pub outputs: Vec<PatternWire>,
}

impl PatternOp {
    pub fn new(gate: GateType) -> Self {
        Self {
            gate,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn add_input(&mut self, wire: PatternWire) {
        self.inputs.push(wire);
    }

    /// Adds an output wire; must be a bound reference back at this
    /// operator.
    pub fn add_output(&mut self, wire: PatternWire) {
        debug_assert!(matches!(wire, PatternWire::Bound { .. }));
        self.outputs.push(wire);
    }

    /// Open wires consumed by this operator, with their input slots.
    pub fn open_inputs(&self) -> impl Iterator<Item = (usize, WireId)> {
        self.inputs
            .iter()
            .enumerate()
            .filter_map(|(slot, wire)| match wire {
                PatternWire::Open(id) => Some((slot, *id)),
                PatternWire::Bound { .. } => None,
            })
    }
}
