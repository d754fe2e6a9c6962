// Error types for formula compilation and program evaluation

use thiserror::Error;

/// Errors raised while compiling a formula into a [`Program`](super::Program)
///
/// All of these are configuration-time errors: the caller is expected to
/// abort before processing any benchmark.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("empty expression")]
    Empty,

    #[error("unknown variable: {0}")]
    UnknownIdentifier(String),

    #[error("unknown math function math.{0}")]
    UnknownFunction(String),

    #[error("only math package functions allowed, found package {0}")]
    WrongNamespace(String),

    #[error("math.{function} takes {expected} argument(s), found {found}")]
    WrongArity {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    #[error("`{0}` is reserved and cannot be used as a named expression in vars")]
    ReservedName(String),
}

impl CompileError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(what: impl Into<String>) -> Self {
        Self::UnsupportedConstruct(what.into())
    }
}

/// Faults raised while evaluating a compiled program
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalFault {
    /// The binding lacks a variable the program reads. Caller contract
    /// violation; the observation can be skipped.
    #[error("variable {name} is not bound when evaluating {program}")]
    UnboundVariable { name: String, program: String },

    /// The evaluation stack did not end with exactly one value.
    /// Compiler and evaluator disagree; this is a defect.
    #[error("invalid expression {program}: evaluation stack held {depth} value(s)")]
    MalformedProgram { program: String, depth: usize },
}

impl EvalFault {
    /// True when skipping the offending observation is an acceptable response
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnboundVariable { .. })
    }
}
