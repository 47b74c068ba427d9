use super::ast::{BinaryOperator, CompareOperator, UnaryOperator};
use super::eval::{EvaluationContext, Value};
use crate::datasource::DocumentNode;
use crate::error::DocpathError;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn from_value(value: &Value) -> Option<Number> {
        match value {
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            _ => None,
        }
    }

    fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        text.parse()
            .map(Number::Int)
            .or_else(|_| text.parse().map(Number::Float))
            .ok()
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn order(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

// --- Comparison ---

/// Compares two operands. Paths stand for the set of their matches' text;
/// when either side is a set, equality means intersection and ordering
/// compares the set extremes.
pub fn compare<'a, N>(
    op: CompareOperator,
    left: &Value,
    right: &Value,
    ctx: &EvaluationContext<'_, 'a, N>,
) -> Result<bool, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    let left_set = resolve_set(left, ctx)?;
    let right_set = resolve_set(right, ctx)?;
    if left_set.is_none() && right_set.is_none() {
        return Ok(compare_scalars(op, left, right));
    }
    let left = left_set.unwrap_or_else(|| vec![left.clone()]);
    let right = right_set.unwrap_or_else(|| vec![right.clone()]);

    Ok(match op {
        CompareOperator::Equals => intersects(&left, &right),
        CompareOperator::NotEquals => !intersects(&left, &right),
        CompareOperator::LessThan | CompareOperator::LessThanOrEqual => {
            match (extreme(&left, Ordering::Less), extreme(&right, Ordering::Greater)) {
                (Some(l), Some(r)) => compare_scalars(op, l, r),
                _ => false,
            }
        }
        CompareOperator::GreaterThan | CompareOperator::GreaterThanOrEqual => {
            match (extreme(&left, Ordering::Greater), extreme(&right, Ordering::Less)) {
                (Some(l), Some(r)) => compare_scalars(op, l, r),
                _ => false,
            }
        }
    })
}

fn resolve_set<'a, N>(
    value: &Value,
    ctx: &EvaluationContext<'_, 'a, N>,
) -> Result<Option<Vec<Value>>, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    match value {
        Value::Path(path) => {
            let texts = ctx
                .resolve(path)?
                .iter()
                .map(|node| Value::Str(node.text()))
                .collect();
            Ok(Some(texts))
        }
        _ => Ok(None),
    }
}

fn intersects(left: &[Value], right: &[Value]) -> bool {
    left.iter()
        .any(|l| right.iter().any(|r| order(l, r) == Some(Ordering::Equal)))
}

/// The smallest (`Less`) or largest (`Greater`) comparable member of a set.
fn extreme(values: &[Value], direction: Ordering) -> Option<&Value> {
    values
        .iter()
        .reduce(|best, candidate| {
            if order(candidate, best) == Some(direction) {
                candidate
            } else {
                best
            }
        })
}

fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Str(l), Value::Str(r)) => Some(l.cmp(r)),
        (Value::Str(text), other) => Number::parse(text)?.order(Number::from_value(other)?),
        (other, Value::Str(text)) => Number::from_value(other)?.order(Number::parse(text)?),
        (Value::Axis(l), Value::Axis(r)) => (l == r).then_some(Ordering::Equal),
        (Value::Path(l), Value::Path(r)) => (l == r).then_some(Ordering::Equal),
        _ => Number::from_value(left)?.order(Number::from_value(right)?),
    }
}

fn compare_scalars(op: CompareOperator, left: &Value, right: &Value) -> bool {
    let ordering = order(left, right);
    match op {
        CompareOperator::Equals => ordering == Some(Ordering::Equal),
        CompareOperator::NotEquals => ordering != Some(Ordering::Equal),
        CompareOperator::LessThan => ordering == Some(Ordering::Less),
        CompareOperator::LessThanOrEqual => {
            matches!(ordering, Some(Ordering::Less | Ordering::Equal))
        }
        CompareOperator::GreaterThan => ordering == Some(Ordering::Greater),
        CompareOperator::GreaterThanOrEqual => {
            matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
        }
    }
}

// --- Arithmetic ---

pub fn evaluate_binary(op: BinaryOperator, left: Value, right: Value) -> Result<Value, DocpathError> {
    match (op, left, right) {
        (BinaryOperator::Divide, Value::Path(l), Value::Path(r)) => Ok(Value::Path(l.concat(r))),
        (BinaryOperator::FloorDivide, Value::Path(l), Value::Path(r)) => {
            Ok(Value::Path(l.descendant(r)))
        }
        (BinaryOperator::Union, Value::Path(l), Value::Path(r)) => Ok(Value::Path(l.union(r))),
        (BinaryOperator::Plus, Value::Str(l), Value::Str(r)) => Ok(Value::Str(l + &r)),
        (op, left, right) => match (Number::from_value(&left), Number::from_value(&right)) {
            (Some(l), Some(r)) if op != BinaryOperator::Union => evaluate_arithmetic(op, l, r),
            _ => Err(DocpathError::Evaluation(format!(
                "unsupported operand types for {}: {} and {}",
                op.symbol(),
                left.type_name(),
                right.type_name()
            ))),
        },
    }
}

fn evaluate_arithmetic(op: BinaryOperator, left: Number, right: Number) -> Result<Value, DocpathError> {
    match (left, right) {
        (Number::Int(a), Number::Int(b)) if op != BinaryOperator::Divide => {
            integer_arithmetic(op, a, b)
        }
        (a, b) => float_arithmetic(op, a.as_f64(), b.as_f64()),
    }
}

fn integer_arithmetic(op: BinaryOperator, a: i64, b: i64) -> Result<Value, DocpathError> {
    if b == 0 && matches!(op, BinaryOperator::FloorDivide | BinaryOperator::Modulo) {
        return Err(division_by_zero());
    }
    let result = match op {
        BinaryOperator::Plus => a.checked_add(b),
        BinaryOperator::Minus => a.checked_sub(b),
        BinaryOperator::Multiply => a.checked_mul(b),
        // Rounds towards negative infinity.
        BinaryOperator::FloorDivide => a.checked_div(b).map(|q| {
            if a % b != 0 && (a < 0) != (b < 0) {
                q - 1
            } else {
                q
            }
        }),
        // Takes the sign of the divisor.
        BinaryOperator::Modulo => a.checked_rem(b).map(|r| {
            if r != 0 && (r < 0) != (b < 0) {
                r + b
            } else {
                r
            }
        }),
        _ => return float_arithmetic(op, a as f64, b as f64),
    };
    result
        .map(Value::Int)
        .ok_or_else(|| DocpathError::Evaluation(format!("integer overflow in {}", op.symbol())))
}

fn float_arithmetic(op: BinaryOperator, a: f64, b: f64) -> Result<Value, DocpathError> {
    let result = match op {
        BinaryOperator::Plus => a + b,
        BinaryOperator::Minus => a - b,
        BinaryOperator::Multiply => a * b,
        BinaryOperator::Divide | BinaryOperator::FloorDivide | BinaryOperator::Modulo
            if b == 0.0 =>
        {
            return Err(division_by_zero());
        }
        BinaryOperator::Divide => a / b,
        BinaryOperator::FloorDivide => (a / b).floor(),
        BinaryOperator::Modulo => {
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }
        }
        BinaryOperator::Or | BinaryOperator::And | BinaryOperator::Union => {
            return Err(DocpathError::Evaluation(format!(
                "unsupported operand types for {}: float and float",
                op.symbol()
            )));
        }
    };
    Ok(Value::Float(result))
}

fn division_by_zero() -> DocpathError {
    DocpathError::Evaluation("division by zero".to_string())
}

pub fn evaluate_unary(op: UnaryOperator, value: Value) -> Result<Value, DocpathError> {
    match (op, Number::from_value(&value)) {
        (UnaryOperator::Plus, Some(Number::Int(i))) => Ok(Value::Int(i)),
        (UnaryOperator::Plus, Some(Number::Float(f))) => Ok(Value::Float(f)),
        (UnaryOperator::Minus, Some(Number::Int(i))) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| DocpathError::Evaluation("integer overflow in -".to_string())),
        (UnaryOperator::Minus, Some(Number::Float(f))) => Ok(Value::Float(-f)),
        (_, None) => Err(DocpathError::Evaluation(format!(
            "bad operand type for unary operator: {}",
            value.type_name()
        ))),
    }
}
