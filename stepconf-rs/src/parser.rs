//! Recursive-descent parser.
//!
//! Grammar (informal):
//!
//! ```text
//! document   := ( define | binding )*
//! define     := '(' 'define' IDENT value ')' ';'
//! binding    := IDENT ':=' value ';'
//! value      := NUMBER | STRING | IDENT | array | dict | const_expr
//! array      := '#' '(' value* ')'
//! dict       := 'begin' binding* 'end'
//! const_expr := '!' '['? value ( ('+' | '*') value )* ']'
//! ```
//!
//! Constant expressions fold strictly left to right: `!2 + 3 * 4]` is 20.
//! Identifiers in value position are replaced by the constant of that name
//! if one has been defined earlier in the file; otherwise they stay bare.

use std::collections::HashMap;
use std::fmt;

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::value::{Dict, Document, Value};

/// Operator of a constant expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Mul,
}

impl Op {
    /// Apply to two operands; `None` if either is not numeric.
    pub fn apply(self, lhs: &Value, rhs: &Value) -> Option<Value> {
        match self {
            Op::Add => lhs.try_add(rhs),
            Op::Mul => lhs.try_mul(rhs),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::Add => "+",
            Op::Mul => "*",
        })
    }
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// How many arrays, dictionaries and constant expressions may enclose one
/// another.
pub const MAX_DEPTH: usize = 128;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Open compound values around the cursor.
    depth: usize,
    /// `(define NAME value);` table.  Later definitions replace earlier ones.
    constants: HashMap<String, Value>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map_or(1, |t| t.line + 1);
            tokens.push(Token::new(TokenKind::Eof, "", line, 1));
        }
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            constants: HashMap::new(),
        }
    }

    /// Look up a constant registered so far.
    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Consume the current token.  The cursor never moves past end-of-input.
    fn advance(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.to_string()))
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let t = self.peek();
        ParseError::Unexpected {
            expected: expected.into(),
            found: t.describe(),
            line: t.line,
            column: t.column,
        }
    }

    // ── Grammar ───────────────────────────────────────────────────────────────

    /// Parse the whole token sequence.
    pub fn parse(&mut self) -> Result<Document, ParseError> {
        let mut doc = Document::new();
        loop {
            match self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::LParen => self.parse_define()?,
                TokenKind::Ident => {
                    let (key, value) = self.parse_binding()?;
                    if doc.contains_key(&key) {
                        log::debug!("top-level key `{key}` rebound");
                    }
                    doc.insert(key, value);
                }
                _ => return Err(self.unexpected("'(' or identifier")),
            }
        }
        log::debug!(
            "parsed {} bindings, {} constants",
            doc.len(),
            self.constants.len()
        );
        Ok(doc)
    }

    fn parse_define(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Define)?;
        let name = self.expect(TokenKind::Ident)?.text;
        let value = self.parse_value()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        log::debug!("define {name} = {value}");
        self.constants.insert(name, value);
        Ok(())
    }

    /// `IDENT := value ;`
    fn parse_binding(&mut self) -> Result<(String, Value), ParseError> {
        let key = self.expect(TokenKind::Ident)?.text;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_value()?;
        self.expect(TokenKind::Semicolon)?;
        Ok((key, value))
    }

    pub fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.peek().kind {
            TokenKind::Number => {
                let tok = self.advance();
                parse_number(&tok)
            }
            TokenKind::Str => Ok(Value::Str(self.advance().text)),
            TokenKind::Hash | TokenKind::Begin | TokenKind::Bang => self.parse_nested(),
            TokenKind::Ident => {
                let tok = self.advance();
                Ok(match self.constants.get(&tok.text) {
                    Some(v) => v.clone(),
                    None => Value::Ident(tok.text),
                })
            }
            _ => Err(self.unexpected("value")),
        }
    }

    /// Array, dictionary or constant expression, one level deeper.
    fn parse_nested(&mut self) -> Result<Value, ParseError> {
        if self.depth >= MAX_DEPTH {
            let t = self.peek();
            return Err(ParseError::NestingTooDeep {
                limit: MAX_DEPTH,
                line: t.line,
                column: t.column,
            });
        }
        self.depth += 1;
        let value = match self.peek().kind {
            TokenKind::Hash => self.parse_array(),
            TokenKind::Begin => self.parse_dict(),
            _ => self.parse_const_expr(),
        };
        self.depth -= 1;
        value
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.expect(TokenKind::Hash)?;
        self.expect(TokenKind::LParen)?;
        let mut items = Vec::new();
        while !matches!(self.peek().kind, TokenKind::RParen | TokenKind::Eof) {
            items.push(self.parse_value()?);
        }
        self.expect(TokenKind::RParen)?;
        Ok(Value::Array(items))
    }

    fn parse_dict(&mut self) -> Result<Value, ParseError> {
        self.expect(TokenKind::Begin)?;
        let mut dict = Dict::new();
        while !matches!(self.peek().kind, TokenKind::End | TokenKind::Eof) {
            if self.peek().kind != TokenKind::Ident {
                return Err(self.unexpected("identifier or 'end'"));
            }
            let (key, value) = self.parse_binding()?;
            dict.insert(key, value);
        }
        self.expect(TokenKind::End)?;
        Ok(Value::Dict(dict))
    }

    fn parse_const_expr(&mut self) -> Result<Value, ParseError> {
        self.expect(TokenKind::Bang)?;
        self.eat(TokenKind::LBracket);
        let mut acc = self.parse_value()?;
        while !matches!(self.peek().kind, TokenKind::RBracket | TokenKind::Eof) {
            let (line, column) = (self.peek().line, self.peek().column);
            let op = self.parse_op()?;
            let rhs = self.parse_value()?;
            acc = op
                .apply(&acc, &rhs)
                .ok_or_else(|| ParseError::InvalidOperands {
                    op,
                    lhs: acc.type_name(),
                    rhs: rhs.type_name(),
                    line,
                    column,
                })?;
        }
        self.expect(TokenKind::RBracket)?;
        Ok(acc)
    }

    /// A `+`/`*` token, or an identifier spelled `+`/`*`.
    fn parse_op(&mut self) -> Result<Op, ParseError> {
        let tok = self.peek();
        let op = match (tok.kind, tok.text.as_str()) {
            (TokenKind::Plus, _) | (TokenKind::Ident, "+") => Op::Add,
            (TokenKind::Star, _) | (TokenKind::Ident, "*") => Op::Mul,
            _ => return Err(self.unexpected("'+' or '*'")),
        };
        self.advance();
        Ok(op)
    }
}

/// Literal shape decides the type: `.`, `e` or `E` means float.  Literals
/// out of range for `i64` or `f64` are invalid.
fn parse_number(tok: &Token) -> Result<Value, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        text: tok.text.clone(),
        line: tok.line,
        column: tok.column,
    };
    if tok.text.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
        match tok.text.parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(Value::Float(x)),
            _ => Err(invalid()),
        }
    } else {
        tok.text.parse().map(Value::Int).map_err(|_| invalid())
    }
}

/// Parse a full token sequence into a [`Document`].
pub fn parse(tokens: Vec<Token>) -> Result<Document, ParseError> {
    Parser::new(tokens).parse()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
