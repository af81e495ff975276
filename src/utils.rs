use std::io;
use thiserror::Error;

/// Errors raised while building a generator from text
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Characters were left over after a complete top-level expression,
    /// typically a stray `>` or `|`
    #[error("Trailing input at offset {position}: unexpected '{found}'")]
    TrailingInput { position: usize, found: char },

    /// An alternation opened at `position` was never closed by `>`
    #[error("Unterminated alternation opened at offset {position}")]
    UnterminatedAlternation { position: usize },

    /// An alternation opened at `position` would nest deeper than allowed
    #[error("Alternation at offset {position} nested deeper than {max_depth} levels")]
    TooDeep { position: usize, max_depth: usize },

    #[error("Error at line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<GrammarError>,
    },

    #[error("Alternation must have at least one branch")]
    EmptyAlternation,

    #[error("Unknown catalog: {0}")]
    UnknownCatalog(String),
}

impl GrammarError {
    /// Attach a 1-based corpus line number to a parse error
    pub fn at_line(self, line: usize) -> Self {
        GrammarError::Line {
            line,
            source: Box::new(self),
        }
    }

    /// The line number of a corpus error, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            GrammarError::Line { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;
