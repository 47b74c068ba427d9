//! Evaluates a predicate expression for one candidate node.

use super::ast::{BinaryOperator, Expr};
use super::{functions, operators};
use crate::ast::Docpath;
use crate::axes::Axis;
use crate::datasource::DocumentNode;
use crate::error::DocpathError;
use crate::node::{Address, NodeRef};

/// The result of evaluating a predicate expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Path(Docpath),
    Axis(Axis),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Path(_) => "path",
            Value::Axis(_) => "axis",
        }
    }
}

/// The candidate being tested and its place in the candidate list.
pub struct EvaluationContext<'c, 'a, N> {
    pub node: &'c NodeRef<'a, N>,
    pub address: &'c Address,
    pub position: usize, // 1-based index
    pub size: usize,
}

impl<'a, N: DocumentNode<'a> + 'a> EvaluationContext<'_, 'a, N> {
    /// The matches of `path` evaluated from the candidate, in document order.
    pub fn resolve(&self, path: &Docpath) -> Result<Vec<NodeRef<'a, N>>, DocpathError> {
        path.findall_from(self.node.clone(), self.address.clone())
    }
}

pub fn evaluate<'a, N>(expr: &Expr, ctx: &EvaluationContext<'_, 'a, N>) -> Result<Value, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    match expr {
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Int(i) => Ok(Value::Int(*i)),
        Expr::Float(f) => Ok(Value::Float(*f)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Path(path) => Ok(Value::Path(path.clone())),
        Expr::Axis(axis) => Ok(Value::Axis(*axis)),
        Expr::Subscript { base, predicate } => match evaluate(base, ctx)? {
            Value::Path(path) => Ok(Value::Path(path.with_predicate(predicate.clone())?)),
            other => Err(DocpathError::Evaluation(format!(
                "a {} cannot take a predicate",
                other.type_name()
            ))),
        },
        Expr::Call { function, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            functions::evaluate_function(*function, args, ctx)
        }
        Expr::Unary { op, expr } => operators::evaluate_unary(*op, evaluate(expr, ctx)?),
        Expr::Not(expr) => Ok(Value::Bool(!truthy(&evaluate(expr, ctx)?, ctx)?)),
        Expr::Binary {
            left,
            op: BinaryOperator::And,
            right,
        } => {
            if !truthy(&evaluate(left, ctx)?, ctx)? {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(truthy(&evaluate(right, ctx)?, ctx)?))
        }
        Expr::Binary {
            left,
            op: BinaryOperator::Or,
            right,
        } => {
            if truthy(&evaluate(left, ctx)?, ctx)? {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(truthy(&evaluate(right, ctx)?, ctx)?))
        }
        Expr::Binary { left, op, right } => {
            operators::evaluate_binary(*op, evaluate(left, ctx)?, evaluate(right, ctx)?)
        }
        Expr::Compare { first, rest } => {
            let mut left = evaluate(first, ctx)?;
            for (op, right) in rest {
                let right = evaluate(right, ctx)?;
                if !operators::compare(*op, &left, &right, ctx)? {
                    return Ok(Value::Bool(false));
                }
                left = right;
            }
            Ok(Value::Bool(true))
        }
    }
}

/// Truthiness: zero, NaN, empty strings and paths matching nothing are false.
pub fn truthy<'a, N>(value: &Value, ctx: &EvaluationContext<'_, 'a, N>) -> Result<bool, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    Ok(match value {
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0 && !f.is_nan(),
        Value::Str(s) => !s.is_empty(),
        Value::Path(path) => !ctx.resolve(path)?.is_empty(),
        Value::Axis(_) => true,
    })
}

/// Whether the candidate survives: an integer result selects by position,
/// anything else by truthiness.
pub fn keeps<'a, N>(expr: &Expr, ctx: &EvaluationContext<'_, 'a, N>) -> Result<bool, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    match evaluate(expr, ctx)? {
        Value::Int(index) => Ok(usize::try_from(index).is_ok_and(|index| index == ctx.position)),
        value => truthy(&value, ctx),
    }
}
