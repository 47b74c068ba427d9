//! Bracketed predicates: canonical rewriting, compilation and candidate filtering.
//!
//! A predicate's text is written in path shorthand (`@name == "n"`,
//! `./section`) and rewritten once into the member-access form the
//! expression grammar understands (`attribute.name == "n"`,
//! `self.node/section`). Both the rewrite and the compiled expression are
//! cached on first use.

mod ast;
mod eval;
mod functions;
mod operators;
mod parser;

pub use ast::{BinaryOperator, CompareOperator, Expr, Function, UnaryOperator};
pub use eval::{EvaluationContext, Value};
pub use parser::parse_predicate;

use crate::datasource::DocumentNode;
use crate::error::DocpathError;
use crate::node::Located;
use log::{debug, trace};
use std::fmt;
use std::sync::OnceLock;

/// Applied in order, outside string literals only.
const REWRITES: [(&str, &str); 6] = [
    ("::", "."),
    ("../", "parent.node/"),
    ("./", "self.node/"),
    ("^/", "root.node/"),
    ("@", "attribute."),
    (".*", ".element"),
];

#[derive(Debug, Clone)]
pub struct Predicate {
    raw: String,
    rewritten: OnceLock<String>,
    compiled: OnceLock<Result<Box<Expr>, DocpathError>>,
}

impl Predicate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            rewritten: OnceLock::new(),
            compiled: OnceLock::new(),
        }
    }

    /// A predicate whose text is already in rewritten form.
    pub(crate) fn canonical(text: &str) -> Self {
        Self {
            raw: text.to_string(),
            rewritten: OnceLock::from(text.to_string()),
            compiled: OnceLock::new(),
        }
    }

    /// The text as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The rewritten text, as rendered and compiled.
    pub fn text(&self) -> &str {
        self.rewritten.get_or_init(|| rewrite(&self.raw))
    }

    /// The compiled expression. A compilation error is cached and returned
    /// on every call.
    pub fn expression(&self) -> Result<&Expr, DocpathError> {
        self.compiled
            .get_or_init(|| {
                parse_predicate(self.text()).map(Box::new).inspect_err(|e| {
                    debug!("predicate [{}] failed to compile: {}", self.text(), e);
                })
            })
            .as_ref()
            .map(|expr| &**expr)
            .map_err(Clone::clone)
    }

    /// Keeps the candidates this predicate accepts, numbering positions from 1
    /// in the given order.
    pub fn filter<'a, N>(&self, candidates: Vec<Located<'a, N>>) -> Result<Vec<Located<'a, N>>, DocpathError>
    where
        N: DocumentNode<'a> + 'a,
    {
        let expr = self.expression()?;
        let size = candidates.len();
        let mut kept = Vec::with_capacity(size);
        for (index, (node, address)) in candidates.into_iter().enumerate() {
            let ctx = EvaluationContext {
                node: &node,
                address: &address,
                position: index + 1,
                size,
            };
            if eval::keeps(expr, &ctx)? {
                kept.push((node, address));
            }
        }
        trace!("predicate [{}] kept {} of {}", self.text(), kept.len(), size);
        Ok(kept)
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

fn rewrite(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find(['"', '\'']) {
        result.push_str(&rewrite_unquoted(&rest[..start]));
        let quote = if rest.as_bytes()[start] == b'"' { '"' } else { '\'' };
        let end = rest[start + 1..]
            .find(quote)
            .map_or(rest.len(), |offset| start + offset + 2);
        result.push_str(&rest[start..end]);
        rest = &rest[end..];
    }
    result.push_str(&rewrite_unquoted(rest));
    result
}

fn rewrite_unquoted(text: &str) -> String {
    REWRITES
        .iter()
        .fold(text.to_string(), |text, (from, to)| text.replace(from, to))
}
