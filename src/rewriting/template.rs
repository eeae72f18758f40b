//! The rule-template authoring format.
//!
//! A template is an ordered list of gate applications over named wires.
//! `"q<i>"` names the i-th external qubit wire, `"p<i>"` the i-th external
//! parameter wire; any other name is an internal wire introduced by an
//! earlier operator's output. Writing an external qubit name as an output
//! rebinds it, which is how a template threads a qubit through a sequence
//! of gates.
//!
//! Templates are only consumed at rule-construction time; see
//! [`crate::rewriting::rule::RewriteRule::from_templates`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::gates::GateType;

/// One gate application within a template.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplateOp {
    pub gate: GateType,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// One side of an equivalence, declaring its external interface and its
/// ordered gate applications.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleTemplate {
    pub qubits: usize,
    pub params: usize,
    pub ops: Vec<TemplateOp>,
}

/// A pair of equivalent templates defining one rewrite rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplatePair {
    pub source: RuleTemplate,
    pub destination: RuleTemplate,
}

/// Loads a JSON rule library from disk.
pub fn load_pairs(path: &Path) -> Result<Vec<TemplatePair>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading rule templates from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing rule templates from {}", path.display()))
}
