//! Error types for the lexer and parser.
//!
//! Every error is terminal: the first one aborts the conversion and no
//! partial document is returned.  Both kinds carry the line (1-based) and,
//! where the position is known, the column (1-based, in characters).

use thiserror::Error;

use crate::parser::Op;

/// Error produced while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at line {line}, column {column}")]
    UnexpectedChar { ch: char, line: usize, column: usize },

    #[error("unclosed string at line {line}, column {column}")]
    UnclosedString { line: usize, column: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnexpectedChar { line, .. } | LexError::UnclosedString { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            LexError::UnexpectedChar { column, .. }
            | LexError::UnclosedString { column, .. } => *column,
        }
    }
}

/// Error produced while building a [`Document`](crate::value::Document)
/// from tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The current token does not fit the grammar at this point.
    #[error("expected {expected}, found {found} at line {line}")]
    Unexpected {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    #[error("invalid number format: {text} at line {line}")]
    InvalidNumber {
        text: String,
        line: usize,
        column: usize,
    },

    /// A constant expression applied `+` or `*` to a non-numeric value.
    #[error("invalid operands for {op}: {lhs} and {rhs} at line {line}")]
    InvalidOperands {
        op: Op,
        lhs: &'static str,
        rhs: &'static str,
        line: usize,
        column: usize,
    },

    /// Arrays, dictionaries and constant expressions nested past `limit`.
    #[error("nesting deeper than {limit} levels at line {line}")]
    NestingTooDeep {
        limit: usize,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Unexpected { line, .. }
            | ParseError::InvalidNumber { line, .. }
            | ParseError::InvalidOperands { line, .. }
            | ParseError::NestingTooDeep { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            ParseError::Unexpected { column, .. }
            | ParseError::InvalidNumber { column, .. }
            | ParseError::InvalidOperands { column, .. }
            | ParseError::NestingTooDeep { column, .. } => *column,
        }
    }
}

/// Any failure of [`convert`](crate::convert) or
/// [`parse_document`](crate::parse_document).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn line(&self) -> usize {
        match self {
            Error::Lex(e) => e.line(),
            Error::Parse(e) => e.line(),
        }
    }

    pub fn column(&self) -> usize {
        match self {
            Error::Lex(e) => e.column(),
            Error::Parse(e) => e.column(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
