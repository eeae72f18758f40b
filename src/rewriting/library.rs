//! The builtin rule library.

use anyhow::{Context, Result};

use crate::macros::template;
use crate::rewriting::rule::RewriteRule;
use crate::rewriting::template::TemplatePair;

/// The standard template pairs: involution cancellations, phase-gate
/// fusion and rotation merging.
pub fn builtin_pairs() -> Vec<TemplatePair> {
    vec![
        // H H => identity
        TemplatePair {
            source: template!(qubits: 1, params: 0;
                H("q0") -> ("q0");
                H("q0") -> ("q0");
            ),
            destination: template!(qubits: 1, params: 0;),
        },
        // X X => identity
        TemplatePair {
            source: template!(qubits: 1, params: 0;
                X("q0") -> ("q0");
                X("q0") -> ("q0");
            ),
            destination: template!(qubits: 1, params: 0;),
        },
        // Z Z => identity
        TemplatePair {
            source: template!(qubits: 1, params: 0;
                Z("q0") -> ("q0");
                Z("q0") -> ("q0");
            ),
            destination: template!(qubits: 1, params: 0;),
        },
        // Cx Cx => identity
        TemplatePair {
            source: template!(qubits: 2, params: 0;
                Cx("q0", "q1") -> ("q0", "q1");
                Cx("q0", "q1") -> ("q0", "q1");
            ),
            destination: template!(qubits: 2, params: 0;),
        },
        // S S => Z
        TemplatePair {
            source: template!(qubits: 1, params: 0;
                S("q0") -> ("q0");
                S("q0") -> ("q0");
            ),
            destination: template!(qubits: 1, params: 0;
                Z("q0") -> ("q0");
            ),
        },
        // T T => S
        TemplatePair {
            source: template!(qubits: 1, params: 0;
                T("q0") -> ("q0");
                T("q0") -> ("q0");
            ),
            destination: template!(qubits: 1, params: 0;
                S("q0") -> ("q0");
            ),
        },
        // H X H => Z
        TemplatePair {
            source: template!(qubits: 1, params: 0;
                H("q0") -> ("q0");
                X("q0") -> ("q0");
                H("q0") -> ("q0");
            ),
            destination: template!(qubits: 1, params: 0;
                Z("q0") -> ("q0");
            ),
        },
        // Rz(a) Rz(b) => Rz(a + b)
        TemplatePair {
            source: template!(qubits: 1, params: 2;
                Rz("q0", "p0") -> ("q0");
                Rz("q0", "p1") -> ("q0");
            ),
            destination: template!(qubits: 1, params: 2;
                Add("p0", "p1") -> ("sum");
                Rz("q0", "sum") -> ("q0");
            ),
        },
    ]
}

/// Builds rules from template pairs, reporting the offending pair on
/// failure.
pub fn build_rules(pairs: &[TemplatePair]) -> Result<Vec<RewriteRule>> {
    pairs
        .iter()
        .enumerate()
        .map(|(index, pair)| {
            RewriteRule::from_templates(&pair.source, &pair.destination)
                .with_context(|| format!("building rule {index}"))
        })
        .collect()
}

/// The standard rules, ready to run.
pub fn builtin_rules() -> Vec<RewriteRule> {
    build_rules(&builtin_pairs()).expect("builtin templates are well formed")
}
