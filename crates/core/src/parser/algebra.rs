//! The path algebra: a rewritten token stream evaluated with `/`, `//`, `|`,
//! member access and subscripts.

use super::lexer::{Lexed, Token};
use crate::ast::Docpath;
use crate::axes::Axis;
use crate::error::DocpathError;
use crate::predicate::Predicate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op<'s> {
    Name(&'s str),
    Member,
    Div,
    FloorDiv,
    Union,
    LParen,
    RParen,
    Call(&'s str),
    Subscript(&'s str),
}

/// Maps lexer tokens to algebra operations, expanding the shorthands and
/// prefixing absolute operands with `root.node`.
pub fn rewrite<'s>(tokens: &[Lexed<'s>]) -> Vec<Op<'s>> {
    let mut ops = Vec::with_capacity(tokens.len());
    let mut previous = None;
    for &(token, _) in tokens {
        if token == Token::Space {
            continue;
        }
        let absolute = matches!(previous, None | Some(Token::Pipe | Token::LParen));
        if absolute && matches!(token, Token::Slash | Token::DoubleSlash) {
            ops.extend([Op::Name("root"), Op::Member, Op::Name("node")]);
        }
        match token {
            Token::Space => {}
            Token::Axis(name) | Token::Name(name) => ops.push(Op::Name(name)),
            Token::Function(name) => ops.push(Op::Call(name)),
            Token::At => ops.extend([Op::Name("attribute"), Op::Member]),
            Token::DoubleColon => ops.push(Op::Member),
            Token::DoubleDot => ops.extend([Op::Name("parent"), Op::Member, Op::Name("node")]),
            Token::Dot => ops.extend([Op::Name("self"), Op::Member, Op::Name("node")]),
            Token::DoubleSlash => ops.push(Op::FloorDiv),
            Token::Slash => ops.push(Op::Div),
            Token::Pipe => ops.push(Op::Union),
            Token::Star => ops.push(Op::Name("element")),
            Token::LParen => ops.push(Op::LParen),
            Token::RParen => ops.push(Op::RParen),
            Token::Predicate(raw) => ops.push(Op::Subscript(raw)),
        }
        previous = Some(token);
    }
    ops
}

/// The algebra text of `ops`, used in logs and error messages.
pub fn render(ops: &[Op<'_>]) -> String {
    let mut text = String::new();
    for op in ops {
        match op {
            Op::Name(name) | Op::Call(name) => text.push_str(name),
            Op::Member => text.push('.'),
            Op::Div => text.push('/'),
            Op::FloorDiv => text.push_str("//"),
            Op::Union => text.push('|'),
            Op::LParen => text.push('('),
            Op::RParen => text.push(')'),
            Op::Subscript(raw) => {
                text.push('[');
                text.push_str(raw);
                text.push(']');
            }
        }
    }
    text
}

/// Evaluates the algebra. The result must be a path.
pub fn evaluate(ops: &[Op<'_>]) -> Result<Docpath, DocpathError> {
    let invalid = || DocpathError::InvalidPath(render(ops));
    let mut cursor = Cursor { ops, position: 0 };
    let operand = cursor.union()?;
    if cursor.position != ops.len() {
        return Err(invalid());
    }
    match operand {
        Operand::Path(path) => Ok(path),
        Operand::Axis(_) => Err(invalid()),
    }
}

enum Operand {
    Axis(Axis),
    Path(Docpath),
}

impl Operand {
    fn into_path(self, operator: &str) -> Result<Docpath, DocpathError> {
        match self {
            Operand::Path(path) => Ok(path),
            Operand::Axis(axis) => Err(DocpathError::composition(
                operator,
                format!("axis '{}'", axis),
            )),
        }
    }
}

struct Cursor<'o, 's> {
    ops: &'o [Op<'s>],
    position: usize,
}

impl<'s> Cursor<'_, 's> {
    fn peek(&self) -> Option<Op<'s>> {
        self.ops.get(self.position).copied()
    }

    fn next(&mut self) -> Option<Op<'s>> {
        let op = self.peek();
        if op.is_some() {
            self.position += 1;
        }
        op
    }

    fn expect(&mut self, expected: Op<'s>) -> Result<(), DocpathError> {
        if self.next() == Some(expected) {
            Ok(())
        } else {
            Err(DocpathError::InvalidPath(render(self.ops)))
        }
    }

    fn union(&mut self) -> Result<Operand, DocpathError> {
        let mut left = self.concat()?;
        while self.peek() == Some(Op::Union) {
            self.next();
            let right = self.concat()?;
            left = Operand::Path(left.into_path("|")?.union(right.into_path("|")?));
        }
        Ok(left)
    }

    fn concat(&mut self) -> Result<Operand, DocpathError> {
        let mut left = self.postfix()?;
        while let Some(op @ (Op::Div | Op::FloorDiv)) = self.peek() {
            self.next();
            let right = self.postfix()?;
            left = Operand::Path(if op == Op::Div {
                left.into_path("/")?.concat(right.into_path("/")?)
            } else {
                left.into_path("//")?.descendant(right.into_path("//")?)
            });
        }
        Ok(left)
    }

    fn postfix(&mut self) -> Result<Operand, DocpathError> {
        let mut operand = self.atom()?;
        loop {
            match self.peek() {
                Some(Op::Member) => {
                    self.next();
                    let test = self.node_test()?;
                    operand = match operand {
                        Operand::Axis(axis) => Operand::Path(axis.step(test)),
                        Operand::Path(path) => {
                            return Err(DocpathError::composition(
                                ".",
                                format!("path '{}'", path),
                            ));
                        }
                    };
                }
                Some(Op::Subscript(raw)) => {
                    self.next();
                    let path = operand.into_path("[]")?;
                    operand = Operand::Path(path.with_predicate(Predicate::new(raw))?);
                }
                _ => return Ok(operand),
            }
        }
    }

    /// The name after a member access: a plain name or `node()`, `text()`, `comment()`.
    fn node_test(&mut self) -> Result<&'s str, DocpathError> {
        match self.next() {
            Some(Op::Name(name)) => Ok(name),
            Some(Op::Call(name)) => self.node_type_call(name),
            _ => Err(DocpathError::InvalidPath(render(self.ops))),
        }
    }

    fn node_type_call(&mut self, name: &'s str) -> Result<&'s str, DocpathError> {
        if !matches!(name, "node" | "text" | "comment") {
            return Err(DocpathError::UnknownFunction {
                function: name.to_string(),
            });
        }
        self.expect(Op::LParen)?;
        self.expect(Op::RParen)?;
        Ok(name)
    }

    fn atom(&mut self) -> Result<Operand, DocpathError> {
        match self.next() {
            Some(Op::Name(name)) => Ok(match Axis::lookup(name) {
                Some(axis) => Operand::Axis(axis),
                None => Operand::Path(Axis::Child.step(name)),
            }),
            Some(Op::Call(name)) => {
                let test = self.node_type_call(name)?;
                Ok(Operand::Path(Axis::Child.step(test)))
            }
            Some(Op::LParen) => {
                let inner = self.union()?;
                self.expect(Op::RParen)?;
                Ok(inner)
            }
            _ => Err(DocpathError::InvalidPath(render(self.ops))),
        }
    }
}
