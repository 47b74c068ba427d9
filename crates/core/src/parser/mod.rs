//! Compiles docpath text into a [`Docpath`].
//!
//! Compilation runs in three passes. The lexer splits the text into tokens,
//! capturing bracketed predicates verbatim. The tokens are then rewritten
//! into a small path algebra where `child::x` becomes `child.x` and `.`
//! becomes `self.node`. Finally the algebra is evaluated with `/`, `//` and
//! `|` acting as path composition.

mod algebra;
mod lexer;

use crate::ast::Docpath;
use crate::error::DocpathError;
use log::debug;
use std::str::FromStr;

/// Parses a docpath such as `//section[@name == "n"]/title`.
pub fn compile(text: &str) -> Result<Docpath, DocpathError> {
    let tokens = lexer::tokenize(text)?;
    let ops = algebra::rewrite(&tokens);
    debug!("compiling docpath '{}' as '{}'", text, algebra::render(&ops));
    let path = algebra::evaluate(&ops)?;
    debug!("compiled docpath '{}' to '{}'", text, path);
    Ok(path)
}

impl FromStr for Docpath {
    type Err = DocpathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}
