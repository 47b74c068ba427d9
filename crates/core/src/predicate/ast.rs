//! Defines the expression tree of the predicate language.

use super::Predicate;
use crate::ast::Docpath;
use crate::axes::Axis;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A path relative to the candidate node, e.g. `self.node/section`.
    Path(Docpath),
    /// A bare axis name, only meaningful before a `.test` member access.
    Axis(Axis),
    /// `base[...]`: attaches a nested predicate to a path.
    Subscript {
        base: Box<Expr>,
        predicate: Predicate,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    Not(Box<Expr>),
    Binary {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    /// `a < b <= c` holds when every adjacent pair holds.
    Compare {
        first: Box<Expr>,
        rest: Vec<(CompareOperator, Expr)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Logical
    Or,
    And,
    // Paths
    Union,
    // Additive
    Plus,
    Minus,
    // Multiplicative
    Multiply,
    Divide,
    FloorDivide,
    Modulo,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Or => "or",
            BinaryOperator::And => "and",
            BinaryOperator::Union => "|",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::FloorDivide => "//",
            BinaryOperator::Modulo => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

/// The closed set of callable functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Count,
    Last,
    Name,
    Position,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "count" => Some(Function::Count),
            "last" => Some(Function::Last),
            "name" => Some(Function::Name),
            "position" => Some(Function::Position),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Count => "count",
            Function::Last => "last",
            Function::Name => "name",
            Function::Position => "position",
        }
    }
}
