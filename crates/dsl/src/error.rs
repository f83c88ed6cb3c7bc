//! Error types for the invariant expression language
//!
//! Errors are staged: lexing and parsing reject malformed source, static
//! validation rejects well-formed source that touches anything outside the
//! allow-lists. All of them are load-time errors. Evaluation itself is
//! total and has no error type: a validated expression always produces a
//! value.

use thiserror::Error;

/// Errors produced while tokenizing source text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character outside the language's alphabet
    #[error("unexpected character '{ch}' at byte {pos}")]
    UnexpectedChar {
        /// The offending character
        ch: char,
        /// Byte offset in the source
        pos: usize,
    },

    /// A string literal with no closing quote
    #[error("unterminated string literal starting at byte {pos}")]
    UnterminatedString {
        /// Byte offset of the opening quote
        pos: usize,
    },

    /// An integer literal that does not fit in 64 bits
    #[error("invalid integer literal '{text}' at byte {pos}")]
    InvalidInteger {
        /// The literal text as written
        text: String,
        /// Byte offset of the literal
        pos: usize,
    },
}

/// Errors produced while parsing a token stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Tokenization failed
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A token that cannot appear here
    #[error("unexpected token {found} at byte {pos}, expected {expected}")]
    UnexpectedToken {
        /// Display form of the token found
        found: String,
        /// What the parser was looking for
        expected: &'static str,
        /// Byte offset of the token
        pos: usize,
    },

    /// Source ended mid-expression
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A complete expression was parsed but input remains
    #[error("trailing input at byte {pos}")]
    TrailingInput {
        /// Byte offset of the first leftover token
        pos: usize,
    },

    /// Expression nesting exceeds the parser's recursion bound
    #[error("expression nesting exceeds {max} levels")]
    TooDeep {
        /// The recursion bound
        max: usize,
    },
}

/// Errors produced by static validation of a parsed expression
///
/// Each variant names exactly what the expression is not allowed to touch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Path rooted outside the allow-list
    #[error("unknown path root '{root}' (allowed: state, transition, registry, ordering)")]
    UnknownRoot {
        /// The root identifier found
        root: String,
    },

    /// Path that reaches semantic data
    #[error("forbidden path '{path}': semantic data is not accessible to invariants")]
    ForbiddenPath {
        /// The full dotted path
        path: String,
    },

    /// Function outside the allow-list
    #[error("unknown function '{name}'")]
    UnknownFunction {
        /// The function name found
        name: String,
    },

    /// Function called with the wrong number of arguments
    #[error("function '{name}' takes {expected} argument(s), found {found}")]
    WrongArity {
        /// The function name
        name: String,
        /// Declared arity
        expected: usize,
        /// Number of arguments found
        found: usize,
    },

    /// Expression tree deeper than the depth bound
    #[error("expression depth {depth} exceeds bound {max}")]
    DepthExceeded {
        /// Measured depth
        depth: usize,
        /// The bound
        max: usize,
    },

    /// Integer literal outside the safe range
    #[error("integer literal {value} is outside the safe range")]
    IntegerOutOfRange {
        /// The literal value
        value: i64,
    },
}

/// Errors produced while compiling source to an evaluable expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Source is not a well-formed expression
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Source is well-formed but touches something outside the allow-lists
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}
