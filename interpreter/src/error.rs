use thiserror::Error;

/// Syntactic, semantic and runtime diagnostics. All of them are non-fatal:
/// each is reported through the shared sink and the pass carries on with a
/// "no result" in hand.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum Error {
    #[error("expecting '{expected}' in {context}, while we got '{found}'")]
    ExpectedToken {
        expected: &'static str,
        context: &'static str,
        found: String,
    },

    #[error("cannot recognize a statement starting with '{found}'")]
    UnrecognizedStatement { found: String },

    #[error("cannot recognize an expression starting with '{found}'")]
    UnrecognizedExpression { found: String },

    #[error("expecting a variable name in the variable declaration, while we got '{found}'")]
    ExpectedVariableName { found: String },

    #[error("expecting a function name, while we got '{found}'")]
    ExpectedFunctionName { found: String },

    #[error("error parsing the type annotation, while we got '{found}'")]
    ExpectedTypeName { found: String },

    #[error("'{text}' is not a valid number literal")]
    InvalidNumberLiteral { text: String },

    #[error("duplicate symbol: {name}")]
    DuplicateSymbol { name: String },

    #[error("cannot find declaration of function {name}")]
    UnresolvedFunction { name: String },

    #[error("cannot find declaration of variable {name}")]
    UnresolvedVariable { name: String },

    #[error("assignment needs a left value")]
    AssignmentNeedsLeftValue,

    #[error("unsupported binary operator '{op}'")]
    UnsupportedOperator { op: String },

    #[error("operands of '{op}' must be numbers")]
    InvalidOperands { op: String },
}
