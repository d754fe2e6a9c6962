//! Compiled programs and their evaluation
//!
//! A [`Program`] is a postfix sequence of [`Instruction`]s. Evaluation runs
//! the instructions against a private stack, so one compiled program can be
//! shared and evaluated from any number of threads.

use super::functions::{BinaryFunction, UnaryFunction, NAMESPACE};
use super::EvalFault;
use std::collections::HashMap;
use std::fmt;

/// One postfix instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Float literal, with the text it was written as
    Literal { text: String, value: f64 },
    /// Variable looked up in the binding
    Variable(String),
    /// Unary minus
    Negate,
    /// Unary plus
    Identity,
    Add,
    Subtract,
    Multiply,
    Divide,
    Unary(UnaryFunction),
    Binary(BinaryFunction),
}

impl Instruction {
    /// Number of values popped from the stack
    pub fn arity(&self) -> usize {
        match self {
            Self::Literal { .. } | Self::Variable(_) => 0,
            Self::Negate | Self::Identity | Self::Unary(_) => 1,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Binary(_) => 2,
        }
    }

    /// Net change in stack depth after executing this instruction
    fn stack_effect(&self) -> isize {
        1 - self.arity() as isize
    }
}

/// Canonical token: literal text, variable name, `+ - * /`, `u+`/`u-` or
/// `math.Function`
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { text, .. } => f.write_str(text),
            Self::Variable(name) => f.write_str(name),
            Self::Negate => f.write_str("u-"),
            Self::Identity => f.write_str("u+"),
            Self::Add => f.write_str("+"),
            Self::Subtract => f.write_str("-"),
            Self::Multiply => f.write_str("*"),
            Self::Divide => f.write_str("/"),
            Self::Unary(func) => write!(f, "{}.{}", NAMESPACE, func.name()),
            Self::Binary(func) => write!(f, "{}.{}", NAMESPACE, func.name()),
        }
    }
}

/// Binding strength of a rendered subexpression, loosest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    #[default]
    Additive,
    Multiplicative,
    Unary,
    Atom,
}

fn parenthesize(text: String, wrap: bool) -> String {
    if wrap {
        format!("({})", text)
    } else {
        text
    }
}

/// Values for the variables of one observation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding {
    values: HashMap<String, f64>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check that every variable `program` reads is bound
    pub fn covers(&self, program: &Program) -> Result<(), EvalFault> {
        match program.variables().find(|name| !self.values.contains_key(*name)) {
            Some(name) => Err(EvalFault::UnboundVariable {
                name: name.to_string(),
                program: program.source().to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Binding {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A compiled formula
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    source: String,
    instructions: Vec<Instruction>,
    max_depth: usize,
}

impl Program {
    /// Wrap an instruction sequence; the compiler guarantees it is well formed
    pub(crate) fn new(source: impl Into<String>, instructions: Vec<Instruction>) -> Self {
        let mut depth: isize = 0;
        let mut max_depth: isize = 0;
        for instruction in &instructions {
            depth += instruction.stack_effect();
            max_depth = max_depth.max(depth);
        }

        Self {
            source: source.into(),
            instructions,
            max_depth: max_depth.max(1) as usize,
        }
    }

    /// Formula text as the user wrote it
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Variables referenced, in order of first appearance (may repeat)
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Variable(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Space separated postfix listing, e.g. `N math.Log N *`
    pub fn postfix(&self) -> String {
        self.instructions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Infix form that compiles back to the same instructions
    ///
    /// Parentheses appear only where precedence or grouping needs them, so
    /// the result nests no deeper than the formula it came from.
    pub fn canonical(&self) -> String {
        let mut stack: Vec<(String, Precedence)> = Vec::with_capacity(self.max_depth);
        for instruction in &self.instructions {
            let rendered = match instruction {
                Instruction::Literal { text, .. } => (text.clone(), Precedence::Atom),
                Instruction::Variable(name) => (name.clone(), Precedence::Atom),
                Instruction::Negate | Instruction::Identity => {
                    let (operand, inner) = stack.pop().unwrap_or_default();
                    let sign = if *instruction == Instruction::Negate { "-" } else { "+" };
                    let operand = parenthesize(operand, inner < Precedence::Unary);
                    (format!("{}{}", sign, operand), Precedence::Unary)
                }
                Instruction::Unary(_) => {
                    let (operand, _) = stack.pop().unwrap_or_default();
                    (format!("{}({})", instruction, operand), Precedence::Atom)
                }
                Instruction::Binary(_) => {
                    let (rhs, _) = stack.pop().unwrap_or_default();
                    let (lhs, _) = stack.pop().unwrap_or_default();
                    (format!("{}({}, {})", instruction, lhs, rhs), Precedence::Atom)
                }
                Instruction::Add
                | Instruction::Subtract
                | Instruction::Multiply
                | Instruction::Divide => {
                    let level = if matches!(instruction, Instruction::Add | Instruction::Subtract) {
                        Precedence::Additive
                    } else {
                        Precedence::Multiplicative
                    };
                    let (rhs, right) = stack.pop().unwrap_or_default();
                    let (lhs, left) = stack.pop().unwrap_or_default();

                    // Grows the left operand in place so long runs stay linear
                    let mut text = parenthesize(lhs, left < level);
                    text.push(' ');
                    text.push_str(&instruction.to_string());
                    text.push(' ');
                    text.push_str(&parenthesize(rhs, right <= level));
                    (text, level)
                }
            };
            stack.push(rendered);
        }
        stack
            .into_iter()
            .map(|(text, _)| text)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Run the program against `binding`
    ///
    /// Returns [`EvalFault::UnboundVariable`] when the binding lacks a name
    /// the program reads, and [`EvalFault::MalformedProgram`] if the stack
    /// does not end with exactly one value.
    pub fn evaluate(&self, binding: &Binding) -> Result<f64, EvalFault> {
        let mut stack: Vec<f64> = Vec::with_capacity(self.max_depth);

        for instruction in &self.instructions {
            match instruction {
                Instruction::Literal { value, .. } => stack.push(*value),
                Instruction::Variable(name) => {
                    let value = binding.get(name).ok_or_else(|| EvalFault::UnboundVariable {
                        name: name.clone(),
                        program: self.source.clone(),
                    })?;
                    stack.push(value);
                }
                Instruction::Identity => {
                    self.top(&mut stack)?;
                }
                Instruction::Negate => {
                    let top = self.top(&mut stack)?;
                    *top = -*top;
                }
                Instruction::Unary(func) => {
                    let top = self.top(&mut stack)?;
                    *top = func.apply(*top);
                }
                Instruction::Add => self.apply_binary(&mut stack, |a, b| a + b)?,
                Instruction::Subtract => self.apply_binary(&mut stack, |a, b| a - b)?,
                Instruction::Multiply => self.apply_binary(&mut stack, |a, b| a * b)?,
                Instruction::Divide => self.apply_binary(&mut stack, |a, b| a / b)?,
                Instruction::Binary(func) => {
                    self.apply_binary(&mut stack, |a, b| func.apply(a, b))?
                }
            }
        }

        match stack.as_slice() {
            [value] => Ok(*value),
            _ => Err(self.malformed(stack.len())),
        }
    }

    fn top<'s>(&self, stack: &'s mut [f64]) -> Result<&'s mut f64, EvalFault> {
        stack.last_mut().ok_or_else(|| self.malformed(0))
    }

    fn apply_binary(
        &self,
        stack: &mut Vec<f64>,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<(), EvalFault> {
        let depth = stack.len();
        let rhs = stack.pop().ok_or_else(|| self.malformed(depth))?;
        let lhs = stack.last_mut().ok_or_else(|| self.malformed(depth))?;
        *lhs = op(*lhs, rhs);
        Ok(())
    }

    fn malformed(&self, depth: usize) -> EvalFault {
        EvalFault::MalformedProgram {
            program: self.source.clone(),
            depth,
        }
    }
}

/// Displays the source text
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
