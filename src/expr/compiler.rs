// Formula compilation: expression tree -> postfix program
//
// Identifier and function checks happen here rather than in the parser so
// that every tree node is validated in the same pass that emits it.

use super::functions::{BinaryFunction, UnaryFunction, NAMESPACE};
use super::parser::{self, BinaryOp, Node, UnaryOp};
use super::program::{Instruction, Program};
use super::{CompileError, SymbolTable};

/// Compile a single formula against `symbols`
///
/// # Example
/// ```
/// use benchls::expr::{compile, Binding, SymbolTable};
///
/// let symbols = SymbolTable::new(["N"]).with_response();
/// let program = compile("Y / N", &symbols).unwrap();
///
/// let binding: Binding = [("N", 4.0), ("Y", 10.0)].into_iter().collect();
/// assert_eq!(program.evaluate(&binding).unwrap(), 2.5);
/// assert_eq!(program.postfix(), "Y N /");
/// ```
pub fn compile(formula: &str, symbols: &SymbolTable) -> Result<Program, CompileError> {
    let tree = parser::parse_expression(formula)?;
    let instructions = emit_all(&tree, symbols)?;
    Ok(Program::new(formula.trim(), instructions))
}

/// Compile a comma separated list of formulas, one program per element
///
/// Each program keeps the exact text of its element as its source. The
/// table must not contain the response variable: explanatory terms cannot
/// depend on the measurement they explain.
///
/// # Example
/// ```
/// use benchls::expr::{compile_list, SymbolTable};
///
/// let programs = compile_list("math.Log(N) * N, 1.0", &SymbolTable::new(["N"])).unwrap();
/// assert_eq!(programs.len(), 2);
/// assert_eq!(programs[0].source(), "math.Log(N) * N");
/// assert_eq!(programs[1].source(), "1.0");
/// ```
pub fn compile_list(formulas: &str, symbols: &SymbolTable) -> Result<Vec<Program>, CompileError> {
    symbols.check_reserved()?;

    parser::parse_list(formulas)?
        .into_iter()
        .map(|(tree, range)| -> Result<Program, CompileError> {
            let instructions = emit_all(&tree, symbols)?;
            Ok(Program::new(&formulas[range], instructions))
        })
        .collect()
}

fn emit_all(tree: &Node, symbols: &SymbolTable) -> Result<Vec<Instruction>, CompileError> {
    let mut out = Vec::new();
    emit(tree, symbols, &mut out)?;
    Ok(out)
}

fn emit(node: &Node, symbols: &SymbolTable, out: &mut Vec<Instruction>) -> Result<(), CompileError> {
    match node {
        Node::Literal { text, value } => out.push(Instruction::Literal {
            text: text.clone(),
            value: *value,
        }),
        Node::Ident(name) => {
            if !symbols.contains(name) {
                if name == "true" || name == "false" {
                    return Err(CompileError::unsupported(format!("boolean literal {}", name)));
                }
                return Err(CompileError::UnknownIdentifier(name.clone()));
            }
            out.push(Instruction::Variable(name.clone()));
        }
        Node::Unary { op, operand } => {
            emit(operand, symbols, out)?;
            out.push(match op {
                UnaryOp::Plus => Instruction::Identity,
                UnaryOp::Minus => Instruction::Negate,
            });
        }
        Node::Chain { first, rest } => {
            emit(first, symbols, out)?;
            for (op, operand) in rest {
                emit(operand, symbols, out)?;
                out.push(match op {
                    BinaryOp::Add => Instruction::Add,
                    BinaryOp::Sub => Instruction::Subtract,
                    BinaryOp::Mul => Instruction::Multiply,
                    BinaryOp::Div => Instruction::Divide,
                });
            }
        }
        Node::Call {
            namespace,
            function,
            args,
        } => {
            let op = resolve_call(namespace, function, args.len())?;
            for arg in args {
                emit(arg, symbols, out)?;
            }
            out.push(op);
        }
    }
    Ok(())
}

fn resolve_call(namespace: &str, function: &str, arg_count: usize) -> Result<Instruction, CompileError> {
    if namespace != NAMESPACE {
        return Err(CompileError::WrongNamespace(namespace.to_string()));
    }

    let (op, expected) = if let Some(f) = UnaryFunction::lookup(function) {
        (Instruction::Unary(f), 1)
    } else if let Some(f) = BinaryFunction::lookup(function) {
        (Instruction::Binary(f), 2)
    } else {
        return Err(CompileError::UnknownFunction(function.to_string()));
    };

    if arg_count != expected {
        return Err(CompileError::WrongArity {
            function: function.to_string(),
            expected,
            found: arg_count,
        });
    }
    Ok(op)
}
