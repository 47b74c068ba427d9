use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocpathError {
    #[error("unknown axis '{0}'")]
    UnknownAxis(String),

    #[error("predicate '[{0}]' has no preceding step")]
    DetachedPredicate(String),

    #[error("operator '{operator}' cannot be applied to {operand}")]
    Composition { operator: String, operand: String },

    #[error("syntax error in docpath '{path}' at position {position}")]
    Syntax { path: String, position: usize },

    #[error("unterminated predicate in docpath '{path}' at position {position}")]
    UnterminatedPredicate { path: String, position: usize },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("unknown function '{function}'")]
    UnknownFunction { function: String },

    #[error("invalid use of assignment operator in: '{0}'")]
    Assignment(String),

    #[error("syntax error in predicate '{predicate}': {message}")]
    PredicateSyntax { predicate: String, message: String },

    #[error("function '{function}' error: {message}")]
    Function { function: String, message: String },

    #[error("evaluation error: {0}")]
    Evaluation(String),
}

impl DocpathError {
    pub fn composition(operator: impl Into<String>, operand: impl Into<String>) -> Self {
        Self::Composition {
            operator: operator.into(),
            operand: operand.into(),
        }
    }

    pub fn function(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Function {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn predicate_syntax(predicate: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PredicateSyntax {
            predicate: predicate.into(),
            message: message.into(),
        }
    }

    /// True for the errors raised while turning text into a compiled path.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            Self::Syntax { .. }
                | Self::UnterminatedPredicate { .. }
                | Self::InvalidPath(_)
                | Self::UnknownFunction { .. }
        )
    }
}
