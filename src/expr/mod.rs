// Formula compiler and evaluator
//
// Turns small arithmetic formulas over named benchmark parameters into
// postfix programs. The accepted language is deliberately tiny: float
// literals, variables from a symbol table, + - * /, unary sign, parentheses
// and whitelisted `math.*` functions. Everything else is rejected at compile
// time with a typed error so a bad formula stops the run before any
// benchmark is read.
//
// Pipeline:
//   lexer    -> tokens
//   parser   -> expression tree
//   compiler -> Program (postfix instructions, canonical token per step)
//   program  -> evaluate(Binding) on a private stack

mod compiler;
mod error;
mod functions;
mod lexer;
mod parser;
mod program;
mod symbols;

pub use compiler::{compile, compile_list};
pub use error::{CompileError, EvalFault};
pub use functions::{BinaryFunction, UnaryFunction, NAMESPACE};
pub use program::{Binding, Instruction, Program};
pub use symbols::{SymbolTable, RESPONSE_VAR};
