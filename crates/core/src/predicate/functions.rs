//! Built-in implementations for the predicate functions.

use super::ast::Function;
use super::eval::{EvaluationContext, Value};
use crate::datasource::DocumentNode;
use crate::error::DocpathError;

/// Dispatches a function call to the correct implementation.
pub fn evaluate_function<'a, N>(
    function: Function,
    args: Vec<Value>,
    ctx: &EvaluationContext<'_, 'a, N>,
) -> Result<Value, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    match function {
        Function::Count => func_count(args, ctx),
        Function::Last => func_last(args, ctx),
        Function::Name => func_name(args, ctx),
        Function::Position => func_position(args, ctx),
    }
}

fn check_arity(
    function: Function,
    args: &[Value],
    allowed: std::ops::RangeInclusive<usize>,
) -> Result<(), DocpathError> {
    if allowed.contains(&args.len()) {
        return Ok(());
    }
    let expected = if allowed.start() == allowed.end() {
        format!("{}", allowed.start())
    } else {
        format!("{} to {}", allowed.start(), allowed.end())
    };
    Err(DocpathError::function(
        format!("{}()", function.name()),
        format!("expected {} arguments, got {}", expected, args.len()),
    ))
}

fn func_count<'a, N>(
    mut args: Vec<Value>,
    ctx: &EvaluationContext<'_, 'a, N>,
) -> Result<Value, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    check_arity(Function::Count, &args, 1..=1)?;
    match args.remove(0) {
        Value::Path(path) => Ok(Value::Int(ctx.resolve(&path)?.len() as i64)),
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        other => Err(DocpathError::function(
            "count()",
            format!("cannot count a {}", other.type_name()),
        )),
    }
}

fn func_last<'a, N>(args: Vec<Value>, ctx: &EvaluationContext<'_, 'a, N>) -> Result<Value, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    check_arity(Function::Last, &args, 0..=0)?;
    Ok(Value::Int(ctx.size as i64))
}

fn func_position<'a, N>(
    args: Vec<Value>,
    ctx: &EvaluationContext<'_, 'a, N>,
) -> Result<Value, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    check_arity(Function::Position, &args, 0..=0)?;
    Ok(Value::Int(ctx.position as i64))
}

/// The type tag of the candidate, or of the first match of a path argument.
fn func_name<'a, N>(mut args: Vec<Value>, ctx: &EvaluationContext<'_, 'a, N>) -> Result<Value, DocpathError>
where
    N: DocumentNode<'a> + 'a,
{
    check_arity(Function::Name, &args, 0..=1)?;
    let Some(arg) = args.pop() else {
        return Ok(Value::Str(ctx.node.type_tag().to_string()));
    };
    match arg {
        Value::Path(path) => Ok(Value::Str(
            ctx.resolve(&path)?
                .first()
                .map(|node| node.type_tag().to_string())
                .unwrap_or_default(),
        )),
        other => Err(DocpathError::function(
            "name()",
            format!("expected a path, got a {}", other.type_name()),
        )),
    }
}
