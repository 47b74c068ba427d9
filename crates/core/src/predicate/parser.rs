//! A `nom`-based parser for rewritten predicate text.

use super::Predicate;
use super::ast::*;
use crate::axes::Axis;
use crate::error::DocpathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, not, peek, recognize, value},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, terminated},
};

// --- Main Public Parser ---

pub fn parse_predicate(text: &str) -> Result<Expr, DocpathError> {
    check_assignment(text)?;
    match expression(text.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(DocpathError::predicate_syntax(
            text,
            format!("unexpected input '{}'", rem),
        )),
        Err(nom::Err::Failure(e)) if e.code == ErrorKind::Verify => {
            Err(DocpathError::UnknownFunction {
                function: leading_identifier(e.input).to_string(),
            })
        }
        Err(e) => Err(DocpathError::predicate_syntax(text, e.to_string())),
    }
}

/// Rejects a bare `=` outside string literals.
fn check_assignment(text: &str) -> Result<(), DocpathError> {
    let bytes = text.as_bytes();
    let mut quote = None;
    for (i, &byte) in bytes.iter().enumerate() {
        match (quote, byte) {
            (Some(open), b) if b == open => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(byte),
            (None, b'=') => {
                let previous = i.checked_sub(1).map(|p| bytes[p]);
                let next = bytes.get(i + 1).copied();
                let is_operator = matches!(previous, Some(b'=' | b'!' | b'<' | b'>'))
                    || next == Some(b'=');
                if !is_operator {
                    return Err(DocpathError::Assignment(text.to_string()));
                }
            }
            (None, _) => {}
        }
    }
    Ok(())
}

fn leading_identifier(input: &str) -> &str {
    let end = input
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(input.len());
    &input[..end]
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A keyword that is not the prefix of a longer identifier.
fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = Error<&'a str>> {
    terminated(tag(word), not(peek(take_while1(is_identifier_char))))
}

fn build_binary_expr_parser<'a, F, G>(
    sub_expr_parser: F,
    op_parser: G,
) -> impl FnMut(&'a str) -> IResult<&'a str, Expr>
where
    F: Parser<&'a str, Output = Expr, Error = Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = BinaryOperator, Error = Error<&'a str>> + Clone,
{
    move |input: &str| {
        let (input, mut left) = sub_expr_parser.clone().parse(input)?;
        let (input, remainder) =
            many0(pair(ws(op_parser.clone()), sub_expr_parser.clone())).parse(input)?;

        for (op, right) in remainder {
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok((input, left))
    }
}

// --- Expression Parsers (in order of precedence) ---

fn expression(input: &str) -> IResult<&str, Expr> {
    or_expr(input)
}

fn or_op(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::Or, keyword("or")).parse(input)
}

fn and_op(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::And, keyword("and")).parse(input)
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
    build_binary_expr_parser(and_expr, or_op)(input)
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
    build_binary_expr_parser(not_expr, and_op)(input)
}

fn not_expr(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(keyword("not")), not_expr), |expr| {
            Expr::Not(Box::new(expr))
        }),
        comparison_expr,
    ))
    .parse(input)
}

fn compare_op(input: &str) -> IResult<&str, CompareOperator> {
    alt((
        value(CompareOperator::Equals, tag("==")),
        value(CompareOperator::NotEquals, tag("!=")),
        value(CompareOperator::LessThanOrEqual, tag("<=")),
        value(CompareOperator::GreaterThanOrEqual, tag(">=")),
        value(CompareOperator::LessThan, tag("<")),
        value(CompareOperator::GreaterThan, tag(">")),
    ))
    .parse(input)
}

fn comparison_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = union_expr(input)?;
    let (input, rest) = many0(pair(ws(compare_op), union_expr)).parse(input)?;
    if rest.is_empty() {
        return Ok((input, first));
    }
    Ok((
        input,
        Expr::Compare {
            first: Box::new(first),
            rest,
        },
    ))
}

fn union_op(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::Union, char('|')).parse(input)
}

fn additive_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Plus, char('+')),
        value(BinaryOperator::Minus, char('-')),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::FloorDivide, tag("//")),
        value(BinaryOperator::Divide, char('/')),
        value(BinaryOperator::Multiply, char('*')),
        value(BinaryOperator::Modulo, char('%')),
    ))
    .parse(input)
}

fn union_expr(input: &str) -> IResult<&str, Expr> {
    build_binary_expr_parser(additive_expr, union_op)(input)
}

fn additive_expr(input: &str) -> IResult<&str, Expr> {
    build_binary_expr_parser(multiplicative_expr, additive_op)(input)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expr> {
    build_binary_expr_parser(unary_expr, multiplicative_op)(input)
}

fn unary_expr(input: &str) -> IResult<&str, Expr> {
    let unary_op = alt((
        value(UnaryOperator::Minus, char('-')),
        value(UnaryOperator::Plus, char('+')),
    ));
    alt((
        map(pair(ws(unary_op), unary_expr), |(op, expr)| Expr::Unary {
            op,
            expr: Box::new(expr),
        }),
        postfix_expr,
    ))
    .parse(input)
}

/// A primary followed by any number of `.test` member accesses and
/// `[...]` subscripts.
fn postfix_expr(input: &str) -> IResult<&str, Expr> {
    let (mut input, mut expr) = primary_expr(input)?;
    loop {
        if let Ok((rest, name)) =
            preceded(ws(char('.')), alt((node_type_test, member_name))).parse(input)
        {
            expr = match expr {
                Expr::Axis(axis) => Expr::Path(axis.step(name)),
                _ => return Err(nom::Err::Failure(Error::new(input, ErrorKind::Char))),
            };
            input = rest;
            continue;
        }
        if let Ok((rest, raw)) = ws(subscript).parse(input) {
            expr = Expr::Subscript {
                base: Box::new(expr),
                predicate: Predicate::canonical(raw),
            };
            input = rest;
            continue;
        }
        return Ok((input, expr));
    }
}

fn primary_expr(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        number,
        map(string_literal, Expr::Str),
        delimited(ws(char('(')), expression, ws(char(')'))),
        value(Expr::Path(Axis::Parent.step("node")), tag("..")),
        value(Expr::Path(Axis::SelfAxis.step("node")), char('.')),
        value(Expr::Path(Axis::Child.step("element")), char('*')),
        hyphenated_axis,
        map(node_type_test, |test| Expr::Path(Axis::Child.step(test))),
        name_expr,
    )))
    .parse(input)
}

// --- Literal Parsers ---

fn number(input: &str) -> IResult<&str, Expr> {
    let (rest, text) = recognize_float(input)?;
    let parsed = if text.contains(['.', 'e', 'E']) {
        text.parse().ok().map(Expr::Float)
    } else {
        text.parse().ok().map(Expr::Int)
    };
    match parsed {
        Some(expr) => Ok((rest, expr)),
        None => Err(nom::Err::Failure(Error::new(input, ErrorKind::Digit))),
    }
}

fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

// --- Name Parsers ---

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(is_identifier_char),
    ))
    .parse(input)
}

/// A name after a member access. Hyphens join identifier parts, so
/// `attribute.data-id` names one attribute.
fn member_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(identifier, many0(pair(char('-'), identifier)))).parse(input)
}

/// `node()`, `text()` or `comment()`, read as a node test.
fn node_type_test(input: &str) -> IResult<&str, &str> {
    terminated(
        alt((tag("node"), tag("text"), tag("comment"))),
        pair(open_paren, ws(char(')'))),
    )
    .parse(input)
}

/// Axis names such as `following-sibling`, which would otherwise read as a
/// subtraction. Only recognized right before a member access.
fn hyphenated_axis(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = terminated(
        alt((
            tag("ancestor-or-self"),
            tag("descendant-or-self"),
            tag("following-sibling"),
            tag("preceding-sibling"),
        )),
        peek(ws(char('.'))),
    )
    .parse(input)?;
    match Axis::lookup(name) {
        Some(axis) => Ok((rest, Expr::Axis(axis))),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Tag))),
    }
}

/// Literals, calls, axis names and child steps.
fn name_expr(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = identifier(input)?;
    match name {
        "True" => return Ok((rest, Expr::Bool(true))),
        "False" => return Ok((rest, Expr::Bool(false))),
        "and" | "or" | "not" => {
            return Err(nom::Err::Error(Error::new(input, ErrorKind::Tag)));
        }
        _ => {}
    }

    if peek(open_paren).parse(rest).is_ok() {
        let Some(function) = Function::from_name(name) else {
            return Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify)));
        };
        let (rest, args) = delimited(
            open_paren,
            separated_list0(ws(char(',')), expression),
            ws(char(')')),
        )
        .parse(rest)?;
        return Ok((rest, Expr::Call { function, args }));
    }

    let expr = match Axis::lookup(name) {
        Some(axis) => Expr::Axis(axis),
        None => Expr::Path(Axis::Child.step(name)),
    };
    Ok((rest, expr))
}

fn open_paren(input: &str) -> IResult<&str, char> {
    ws(char('(')).parse(input)
}

/// The raw text between a `[` and its matching `]`, skipping quoted literals.
fn subscript(input: &str) -> IResult<&str, &str> {
    let (body, _) = char('[').parse(input)?;
    let mut depth = 0usize;
    let mut quote = None;
    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') if depth == 0 => return Ok((&body[i + 1..], &body[..i])),
            (None, ']') => depth -= 1,
            (None, _) => {}
        }
    }
    Err(nom::Err::Failure(Error::new(input, ErrorKind::Char)))
}
