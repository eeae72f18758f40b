// Macros to simplify rule template declarations

macro_rules! template {
    (qubits: $qubits:expr, params: $params:expr; $( $gate:ident ( $($input:expr),* ) -> ( $($output:expr),* ) );* $(;)? ) => {
        $crate::rewriting::template::RuleTemplate {
            qubits: $qubits,
            params: $params,
            ops: vec![
                $( $crate::rewriting::template::TemplateOp {
                    gate: $crate::gates::GateType::$gate,
                    inputs: vec![$( String::from($input) ),*],
                    outputs: vec![$( String::from($output) ),*],
                } ),*
            ],
        }
    };
}

macro_rules! rule {
    ($source:expr => $destination:expr) => {
        $crate::rewriting::rule::RewriteRule::from_templates(&$source, &$destination)
    };
}

pub(crate) use rule;
pub(crate) use template;
