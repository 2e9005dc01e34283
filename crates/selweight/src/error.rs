//! Error types for selector parsing.
//!
//! Only the parser fails. Specificity calculation and declaration comparison
//! are total over anything the parser produces.

use std::fmt;

use thiserror::Error;

/// What the parser saw where it expected something else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Found {
    /// A concrete character.
    Char(char),
    /// The input (or the enclosing group) ended.
    EndOfInput,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Char(c) => write!(f, "'{c}'"),
            Found::EndOfInput => f.write_str("end of input"),
        }
    }
}

impl From<Option<char>> for Found {
    fn from(c: Option<char>) -> Self {
        c.map_or(Found::EndOfInput, Found::Char)
    }
}

/// Errors that can occur while parsing selector text.
///
/// Every offset is a byte offset into the text handed to the outermost
/// parse call, even when the failure happened inside a nested
/// `:is()`/`:where()`/`:not()`/`:has()` argument.
///
/// # Examples
///
/// ```rust
/// use selweight::{ParseError, parse_selector_list};
///
/// let err = parse_selector_list("div > ", None).unwrap_err();
/// assert_eq!(err, ParseError::EmptySelector { offset: 6 });
/// ```
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A malformed token.
    #[error("selector syntax error at offset {offset}: expected {expected}, found {found}")]
    Syntax {
        offset: usize,
        expected: &'static str,
        found: Found,
    },

    /// An opening `(`, `[` or quote without its closing partner, or a stray
    /// closing `)`/`]`.
    #[error("unbalanced group at offset {offset}")]
    UnbalancedGroup { offset: usize },

    /// Functional pseudo-class arguments nested deeper than the configured limit.
    #[error("selector nesting exceeds the limit of {limit} levels")]
    DepthExceeded { limit: usize },

    /// An empty selector list, or a missing compound selector next to a
    /// combinator or comma.
    #[error("empty selector at offset {offset}")]
    EmptySelector { offset: usize },
}

impl ParseError {
    /// Byte offset of the failure, when the error has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { offset, .. }
            | ParseError::UnbalancedGroup { offset }
            | ParseError::EmptySelector { offset } => Some(*offset),
            ParseError::DepthExceeded { .. } => None,
        }
    }
}
