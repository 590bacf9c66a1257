//! Converter from OpenStep-flavoured configuration files to TOML-style text.
//!
//! The input language:
//!
//! ```text
//! -- comment
//! (define PORT 8080);
//! server := begin
//!     host := 'example.org';
//!     port := !PORT + 1];
//! end;
//! tags := #( 'a' 'b' );
//! ```
//!
//! Pipeline: [`lexer::tokenize`] → [`parser::parse`] →
//! [`serialize::to_toml`].  The whole input is held in memory and the first
//! error aborts the run.
//!
//! # Quick start
//!
//! ```rust
//! let out = stepconf::convert("(define N 2); x := !N * 21]; name := 'demo';").unwrap();
//! assert_eq!(out, "x = 42\nname = \"demo\"\n");
//! ```

pub mod cli;
pub mod error;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod serialize;
pub mod value;

// Re-exports for convenience.
pub use error::{Error, LexError, ParseError};
pub use value::{Dict, Document, Value};

/// Lex and parse `src` into a [`Document`].
pub fn parse_document(src: &str) -> Result<Document, Error> {
    let tokens = lexer::tokenize(src)?;
    Ok(parser::parse(tokens)?)
}

/// Convert source text to rendered output in one step.
pub fn convert(src: &str) -> Result<String, Error> {
    let doc = parse_document(src)?;
    Ok(serialize::to_toml(&doc))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
