//! Thompson NFA compiler and line matcher
//!
//! This library turns a small regular expression language (literals, `.`,
//! `\` escapes, `|`, concatenation, `*`, `+`, `?` and parentheses) into a
//! flat table of indexed states, optionally compresses that table, and
//! simulates it against lines of text without backtracking.
//!
//! The table has a textual form (see [`format`]) so that compiling and
//! matching can run as separate processes connected by a pipe.

pub mod nfa;
pub mod compiler;
pub mod compress;
pub mod format;
pub mod matcher;

pub use nfa::{Fsm, State, StateId, StateKind, Target, Fragment};
pub use compiler::{Compiler, Config};
pub use compress::compress;
pub use format::TableError;
pub use matcher::{Matcher, MatchResult};

/// The result of compiling a regex to an FSM table
pub type CompileResult<T> = Result<T, CompileError>;

/// The ways a pattern can be malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Input left over after the top level expression
    UnexpectedCharacter,
    /// A character that cannot start or continue a construct here
    UnexpectedInput,
    /// An atom was required but the pattern ended
    UnexpectedEnd,
    /// `\` was the last character of the pattern
    IncompleteEscape,
    /// `(` without a matching `)`
    MissingClosingParen,
    /// Two repetition operators in a row, like `a*+`
    MultipleRepetition,
}

impl SyntaxErrorKind {
    fn message(self) -> &'static str {
        match self {
            SyntaxErrorKind::UnexpectedCharacter => "unexpected character",
            SyntaxErrorKind::UnexpectedInput => "unexpected input",
            SyntaxErrorKind::UnexpectedEnd => "unexpected end of input",
            SyntaxErrorKind::IncompleteEscape => "incomplete escape sequence",
            SyntaxErrorKind::MissingClosingParen => "missing closing parenthesis",
            SyntaxErrorKind::MultipleRepetition => "multiple repetition operators",
        }
    }
}

/// Errors that can occur during compilation
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The pattern does not follow the grammar
    Syntax {
        kind: SyntaxErrorKind,
        /// Character offset into the pattern
        position: usize,
        /// The offending character, `None` at end of input
        found: Option<char>,
    },
    /// Parentheses do not balance; detected before any state is built
    UnbalancedParens,
    /// Table bookkeeping went wrong; `dump` lists the table as built so far
    Internal { message: String, dump: String },
}

impl CompileError {
    pub(crate) fn internal(message: impl Into<String>, fsm: &Fsm) -> Self {
        CompileError::Internal {
            message: message.into(),
            dump: fsm.to_string(),
        }
    }

    /// The syntax error category, if this is a syntax error
    pub fn syntax_kind(&self) -> Option<SyntaxErrorKind> {
        match self {
            CompileError::Syntax { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Syntax { kind, position, found: Some(c) } => {
                write!(f, "{} at position {}: '{}'", kind.message(), position, c)
            }
            CompileError::Syntax { kind, position, found: None } => {
                write!(f, "{} at position {}: end of input", kind.message(), position)
            }
            CompileError::UnbalancedParens => write!(f, "invalid regex: mismatched parentheses"),
            CompileError::Internal { message, dump } => {
                write!(f, "internal error: {}\n{}", message, dump)
            }
        }
    }
}

impl std::error::Error for CompileError {}
