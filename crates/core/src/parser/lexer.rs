//! Splits docpath text into tokens. Bracketed predicates are captured whole
//! by a separate scanner.

use crate::error::DocpathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, peek, recognize, value},
    sequence::{pair, terminated},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'s> {
    Space,
    /// A name followed by `::`.
    Axis(&'s str),
    /// A name followed by `(`.
    Function(&'s str),
    Name(&'s str),
    At,
    DoubleColon,
    DoubleDot,
    Dot,
    DoubleSlash,
    Slash,
    Pipe,
    Star,
    LParen,
    RParen,
    /// The text between a `[` and its matching `]`.
    Predicate(&'s str),
}

/// A token and the byte offset it starts at.
pub type Lexed<'s> = (Token<'s>, usize);

pub fn tokenize(path: &str) -> Result<Vec<Lexed<'_>>, DocpathError> {
    let mut tokens = Vec::new();
    let mut rest = path;
    while !rest.is_empty() {
        let position = path.len() - rest.len();
        if rest.starts_with('[') {
            let (remaining, body) = predicate_body(path, position)?;
            tokens.push((Token::Predicate(body), position));
            rest = remaining;
            continue;
        }
        match token(rest) {
            Ok((remaining, token)) => {
                tokens.push((token, position));
                rest = remaining;
            }
            Err(_) => {
                return Err(DocpathError::Syntax {
                    path: path.to_string(),
                    position,
                });
            }
        }
    }
    Ok(tokens)
}

fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
    ))
    .parse(input)
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        value(Token::Space, multispace1),
        map(terminated(name, peek(pair(multispace0, tag("::")))), Token::Axis),
        map(terminated(name, peek(pair(multispace0, char('(')))), Token::Function),
        map(name, Token::Name),
        value(Token::At, char('@')),
        value(Token::DoubleColon, tag("::")),
        value(Token::DoubleDot, tag("..")),
        value(Token::Dot, char('.')),
        value(Token::DoubleSlash, tag("//")),
        value(Token::Slash, char('/')),
        value(Token::Pipe, char('|')),
        value(Token::Star, char('*')),
        value(Token::LParen, char('(')),
        value(Token::RParen, char(')')),
    ))
    .parse(input)
}

/// Scans the predicate opening at byte `start` of `path`, returning the
/// remaining input and the predicate text. Quoted literals are taken as-is,
/// nested brackets must balance and a backslash escapes the next character.
fn predicate_body(path: &str, start: usize) -> Result<(&str, &str), DocpathError> {
    let body = &path[start + 1..];
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            quote @ (b'"' | b'\'') => match body[i + 1..].find(char::from(quote)) {
                Some(offset) => {
                    i += offset + 2;
                    continue;
                }
                None => {
                    return Err(DocpathError::Syntax {
                        path: path.to_string(),
                        position: start + 1 + i,
                    });
                }
            },
            b'[' => depth += 1,
            b']' if depth == 0 => return Ok((&body[i + 1..], &body[..i])),
            b']' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    Err(DocpathError::UnterminatedPredicate {
        path: path.to_string(),
        position: start,
    })
}
