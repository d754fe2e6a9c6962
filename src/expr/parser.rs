// Recursive-descent parser producing a small expression tree
//
// Precedence, lowest first:
//   additive   := term (('+' | '-') term)*
//   term       := unary (('*' | '/') unary)*
//   unary      := ('+' | '-') unary | postfix
//   postfix    := primary            (calls/indexing on results are rejected)
//   primary    := number | ident | ident '.' ident '(' args ')' | '(' additive ')'
//
// A run of same-precedence operators becomes one flat `Chain`, so tree depth
// grows only with the nesting that `MAX_NESTING` bounds, not with formula length.

use super::lexer::{tokenize, Token, TokenKind};
use super::CompileError;
use std::ops::Range;

/// Deepest nesting of parentheses, calls and unary signs accepted
const MAX_NESTING: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Literal {
        text: String,
        value: f64,
    },
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    /// `first op1 rest1 op2 rest2 ...`, grouped left to right
    Chain {
        first: Box<Node>,
        rest: Vec<(BinaryOp, Node)>,
    },
    Call {
        namespace: String,
        function: String,
        args: Vec<Node>,
    },
}

/// Parse a single expression spanning all of `source`
pub(crate) fn parse_expression(source: &str) -> Result<Node, CompileError> {
    let mut parser = Parser::new(source)?;
    if parser.at_eof() {
        return Err(CompileError::Empty);
    }
    let node = parser.additive()?;
    if !parser.at_eof() {
        return Err(parser.unexpected("after expression"));
    }
    Ok(node)
}

/// Parse a comma separated list of expressions, returning each with its
/// byte range in `source`
pub(crate) fn parse_list(source: &str) -> Result<Vec<(Node, Range<usize>)>, CompileError> {
    let mut parser = Parser::new(source)?;
    if parser.at_eof() {
        return Err(CompileError::Empty);
    }

    let mut items = Vec::new();
    loop {
        let start = parser.peek().start;
        let node = parser.additive()?;
        let end = parser.tokens[parser.pos - 1].end;
        items.push((node, start..end));

        match parser.peek().kind {
            TokenKind::Comma => {
                parser.pos += 1;
                if parser.at_eof() {
                    break;
                }
            }
            TokenKind::Eof => break,
            _ => return Err(parser.unexpected("between list elements")),
        }
    }
    Ok(items)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(source: &str) -> Result<Self, CompileError> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
            depth: 0,
        })
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<(), CompileError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(CompileError::syntax(
                self.peek().start,
                "expression nested too deeply",
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn unexpected(&self, context: &str) -> CompileError {
        let token = self.peek();
        match &token.kind {
            TokenKind::Other(op) => reject_operator(op),
            TokenKind::Quoted => CompileError::unsupported("string or rune literal"),
            TokenKind::Eof => CompileError::syntax(token.start, "unexpected end of expression"),
            kind => CompileError::syntax(
                token.start,
                format!("unexpected {} {}", describe(kind), context),
            ),
        }
    }

    fn additive(&mut self) -> Result<Node, CompileError> {
        self.enter()?;
        let first = self.term()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                TokenKind::Other(op) => return Err(reject_operator(op)),
                _ => break,
            };
            self.advance();
            rest.push((op, self.term()?));
        }
        self.leave();
        Ok(chain(first, rest))
    }

    fn term(&mut self) -> Result<Node, CompileError> {
        let first = self.unary()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Other(op) => return Err(reject_operator(op)),
                _ => break,
            };
            self.advance();
            rest.push((op, self.unary()?));
        }
        Ok(chain(first, rest))
    }

    fn unary(&mut self) -> Result<Node, CompileError> {
        let op = match self.peek().kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Other(op) => return Err(reject_operator(op)),
            _ => return self.postfix(),
        };
        self.advance();
        self.enter()?;
        let operand = self.unary()?;
        self.leave();
        Ok(Node::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self) -> Result<Node, CompileError> {
        let node = self.primary()?;
        match self.peek().kind {
            TokenKind::LParen => Err(CompileError::unsupported(
                "call of a value that is not a math function",
            )),
            TokenKind::Dot => Err(CompileError::unsupported("selector on a value")),
            _ => Ok(node),
        }
    }

    fn primary(&mut self) -> Result<Node, CompileError> {
        match self.peek().kind.clone() {
            TokenKind::Number(text) => {
                let token = self.advance();
                let value = text.parse::<f64>().map_err(|e| {
                    CompileError::syntax(token.start, format!("invalid number {}: {}", text, e))
                })?;
                Ok(Node::Literal { text, value })
            }
            TokenKind::Ident(name) => {
                self.advance();
                match self.peek().kind {
                    TokenKind::Dot => self.selector(name),
                    TokenKind::LParen => Err(CompileError::unsupported(format!(
                        "call of non-selector function {}",
                        name
                    ))),
                    _ => Ok(Node::Ident(name)),
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.additive()?;
                if self.peek().kind != TokenKind::RParen {
                    return Err(self.unexpected("where ')' was expected"));
                }
                self.advance();
                Ok(inner)
            }
            _ => Err(self.unexpected("where an operand was expected")),
        }
    }

    /// `namespace.Function(args)`; the dot is the current token
    fn selector(&mut self, namespace: String) -> Result<Node, CompileError> {
        self.advance();
        let function = match self.peek().kind.clone() {
            TokenKind::Ident(function) => function,
            _ => return Err(self.unexpected("after '.'")),
        };
        self.advance();

        match self.peek().kind {
            TokenKind::LParen => {}
            TokenKind::Dot => {
                return Err(CompileError::unsupported(format!(
                    "nested selector {}.{}.",
                    namespace, function
                )))
            }
            _ => {
                return Err(CompileError::unsupported(format!(
                    "selector expression {}.{} used as a value",
                    namespace, function
                )))
            }
        }
        self.advance();

        self.enter()?;
        let mut args = Vec::new();
        if self.peek().kind != TokenKind::RParen {
            loop {
                args.push(self.additive()?);
                match self.peek().kind {
                    TokenKind::Comma => {
                        self.advance();
                        if self.peek().kind == TokenKind::RParen {
                            break;
                        }
                    }
                    TokenKind::RParen => break,
                    _ => return Err(self.unexpected("in argument list")),
                }
            }
        }
        self.advance();
        self.leave();

        Ok(Node::Call {
            namespace,
            function,
            args,
        })
    }
}

fn chain(first: Node, rest: Vec<(BinaryOp, Node)>) -> Node {
    if rest.is_empty() {
        first
    } else {
        Node::Chain {
            first: Box::new(first),
            rest,
        }
    }
}

fn reject_operator(op: &str) -> CompileError {
    let what = match op {
        "%" => "remainder operator",
        "&" | "|" | "^" | "&^" => "bitwise operator",
        "<<" | ">>" => "shift operator",
        "==" | "!=" | "<" | "<=" | ">" | ">=" => "comparison",
        "&&" | "||" => "logical operator",
        "!" => "logical not",
        "[" | "]" => "index expression",
        "{" | "}" => "composite literal",
        "..." => "variadic argument",
        "<-" => "channel operation",
        "=" | ":=" | "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" | "<<=" | ">>="
        | "&^=" => "assignment",
        _ => "token",
    };
    CompileError::unsupported(format!("{} `{}`", what, op))
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(text) => format!("number {}", text),
        TokenKind::Ident(name) => format!("identifier {}", name),
        TokenKind::Plus => "'+'".to_string(),
        TokenKind::Minus => "'-'".to_string(),
        TokenKind::Star => "'*'".to_string(),
        TokenKind::Slash => "'/'".to_string(),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::Comma => "','".to_string(),
        TokenKind::Dot => "'.'".to_string(),
        TokenKind::Other(op) => format!("'{}'", op),
        TokenKind::Quoted => "literal".to_string(),
        TokenKind::Eof => "end of expression".to_string(),
    }
}
