//! Line-oriented lexer.
//!
//! The source is processed one line at a time:
//!
//! - blank lines and lines starting with `--` are skipped;
//! - a line starting with `=begin` opens a block comment that runs through
//!   the next line reading exactly `=cut` (or to the end of the input);
//! - inside a line, `--` ends the line.
//!
//! Strings are single-quoted with no escapes and must close on the same
//! line.  Numbers are matched with two anchored patterns (scientific first,
//! then plain/decimal) so that their text reaches the parser unchanged.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::LexError;

// ── Token ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    Ident,
    Number,
    Str,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Assign, // :=
    Hash,
    Bang,
    Define,
    Begin,
    End,
    Plus,
    Star,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Eof => "end of input",
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Semicolon => "';'",
            TokenKind::Assign => "':='",
            TokenKind::Hash => "'#'",
            TokenKind::Bang => "'!'",
            TokenKind::Define => "'define'",
            TokenKind::Begin => "'begin'",
            TokenKind::End => "'end'",
            TokenKind::Plus => "'+'",
            TokenKind::Star => "'*'",
        };
        f.write_str(s)
    }
}

/// One lexeme with its position.
///
/// `text` is the literal source text, except for strings where it is the
/// content between the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Human-readable description used in parse errors.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Ident => format!("identifier `{}`", self.text),
            TokenKind::Number => format!("number {}", self.text),
            TokenKind::Str => format!("string '{}'", self.text),
            kind => kind.to_string(),
        }
    }
}

// ── Numeric patterns ──────────────────────────────────────────────────────────

fn scientific_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?[0-9]+\.?[0-9]*[eE][+-]?[0-9]+").expect("scientific pattern")
    })
}

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?[0-9]+(\.[0-9]*)?").expect("decimal pattern"))
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

/// Lexer state for a single source line.
struct Lexer<'a> {
    src: &'a str,
    line: usize,
    /// Byte offset into `src`.
    pos: usize,
    /// 1-based character column of `pos`.
    col: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str, line: usize) -> Self {
        Lexer {
            src,
            line,
            pos: 0,
            col: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek2(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn column(&self) -> usize {
        self.col
    }

    /// Move past `len` bytes, keeping the character column in step.
    fn bump(&mut self, len: usize) -> &'a str {
        let src = self.src;
        let text = &src[self.pos..self.pos + len];
        self.pos += len;
        self.col += text.chars().count();
        text
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump(c.len_utf8());
        }
    }

    fn unexpected(&self, ch: char) -> LexError {
        LexError::UnexpectedChar {
            ch,
            line: self.line,
            column: self.column(),
        }
    }

    fn read_string(&mut self) -> Result<&'a str, LexError> {
        let body = &self.rest()[1..];
        let Some(end) = body.find('\'') else {
            return Err(LexError::UnclosedString {
                line: self.line,
                column: self.column(),
            });
        };
        self.bump(end + 2);
        Ok(&body[..end])
    }

    fn read_number(&mut self, first: char) -> Result<&'a str, LexError> {
        let rest = self.rest();
        let Some(m) = scientific_re()
            .find(rest)
            .or_else(|| decimal_re().find(rest))
        else {
            return Err(self.unexpected(first));
        };
        Ok(self.bump(m.end()))
    }

    fn read_ident(&mut self) -> &'a str {
        let len = self
            .rest()
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(self.rest().len());
        self.bump(len)
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_ws();
        let Some(ch) = self.peek() else {
            return Ok(None);
        };
        if self.rest().starts_with("--") {
            return Ok(None);
        }

        let column = self.column();
        let (kind, text) = match ch {
            '\'' => (TokenKind::Str, self.read_string()?),
            c if c.is_ascii_digit() => (TokenKind::Number, self.read_number(c)?),
            '+' | '-' if self.peek2().is_some_and(|c| c.is_ascii_digit()) => {
                (TokenKind::Number, self.read_number(ch)?)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let ident = self.read_ident();
                let kind = match ident {
                    "define" => TokenKind::Define,
                    "begin" => TokenKind::Begin,
                    "end" => TokenKind::End,
                    _ => TokenKind::Ident,
                };
                (kind, ident)
            }
            ':' => {
                if !self.rest().starts_with(":=") {
                    return Err(self.unexpected(':'));
                }
                (TokenKind::Assign, self.bump(2))
            }
            c => {
                let kind = match c {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    ';' => TokenKind::Semicolon,
                    '#' => TokenKind::Hash,
                    '!' => TokenKind::Bang,
                    '+' => TokenKind::Plus,
                    '*' => TokenKind::Star,
                    other => return Err(self.unexpected(other)),
                };
                (kind, self.bump(1))
            }
        };
        Ok(Some(Token::new(kind, text, self.line, column)))
    }

    fn tokenize_into(mut self, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        while let Some(t) = self.next_token()? {
            log::trace!("{}:{} {} {:?}", t.line, t.column, t.kind, t.text);
            tokens.push(t);
        }
        Ok(())
    }
}

/// Tokenize a whole source text.
///
/// The returned sequence always ends with a [`TokenKind::Eof`] token placed
/// on the line after the last source line.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lines = src.lines().enumerate();

    while let Some((i, raw)) = lines.next() {
        let lineno = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with("--") {
            continue;
        }
        if line.starts_with("=begin") {
            let closed = lines.by_ref().any(|(_, l)| l.trim() == "=cut");
            if !closed {
                log::debug!("block comment opened at line {lineno} runs to end of input");
            }
            continue;
        }
        Lexer::new(raw, lineno).tokenize_into(&mut tokens)?;
    }

    let eof_line = src.lines().count() + 1;
    tokens.push(Token::new(TokenKind::Eof, "", eof_line, 1));
    log::debug!("lexed {} tokens", tokens.len());
    Ok(tokens)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn texts(src: &str) -> Vec<String> {
        tokenize(src).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn simple_bindings() {
        use TokenKind::*;
        assert_eq!(
            kinds("server_name := 'test'; port := 8080;"),
            vec![Ident, Assign, Str, Semicolon, Ident, Assign, Number, Semicolon, Eof]
        );
    }

    #[test]
    fn string_content_is_verbatim() {
        let toks = tokenize(r#"x := 'a "b" \n c';"#).unwrap();
        assert_eq!(toks[2].kind, TokenKind::Str);
        assert_eq!(toks[2].text, r#"a "b" \n c"#);
    }

    #[test]
    fn punctuation_and_keywords() {
        use TokenKind::*;
        assert_eq!(
            kinds("(define x #( ) begin end ! [ ] + * ;"),
            vec![
                LParen, Define, Ident, Hash, LParen, RParen, Begin, End, Bang, LBracket,
                RBracket, Plus, Star, Semicolon, Eof
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            texts("1 -2 +3 4.5 6. 1e5 2.5E-3 -7e+2"),
            vec!["1", "-2", "+3", "4.5", "6.", "1e5", "2.5E-3", "-7e+2", ""]
        );
    }

    #[test]
    fn scientific_match_is_exact() {
        // The exponent ends the literal; the following `-3` is a new number.
        assert_eq!(texts("1e5-3"), vec!["1e5", "-3", ""]);
    }

    #[test]
    fn identifier_glued_to_number() {
        use TokenKind::*;
        assert_eq!(kinds("12abc"), vec![Number, Ident, Eof]);
    }

    #[test]
    fn plus_without_digit_is_operator() {
        use TokenKind::*;
        assert_eq!(kinds("1 + 2"), vec![Number, Plus, Number, Eof]);
        assert_eq!(kinds("1 +2"), vec![Number, Number, Eof]);
    }

    #[test]
    fn lone_minus_is_error() {
        let err = tokenize("x := - 1;").unwrap_err();
        assert_eq!(err, LexError::UnexpectedChar { ch: '-', line: 1, column: 6 });
    }

    #[test]
    fn bare_colon_is_error() {
        let err = tokenize("x : 1;").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedChar { ch: ':', line: 1, .. }));
    }

    #[test]
    fn unknown_char_reports_position() {
        let err = tokenize("a := 1;\n  b := @;").unwrap_err();
        assert_eq!(err, LexError::UnexpectedChar { ch: '@', line: 2, column: 8 });
    }

    #[test]
    fn unclosed_string() {
        let err = tokenize("ok := 1;\nx := 'abc;").unwrap_err();
        assert_eq!(err, LexError::UnclosedString { line: 2, column: 6 });
    }

    #[test]
    fn comments() {
        use TokenKind::*;
        let src = "-- full line\n\n   -- indented\nx := 1; -- trailing\ny := 2;--tight\n";
        assert_eq!(
            kinds(src),
            vec![Ident, Assign, Number, Semicolon, Ident, Assign, Number, Semicolon, Eof]
        );
    }

    #[test]
    fn block_comment() {
        let src = "a := 1;\n=begin\nthis is @ not lexed\n=cut\nb := 2;";
        let toks = tokenize(src).unwrap();
        let idents: Vec<_> = toks
            .iter()
            .filter(|t| t.kind == TokenKind::Ident)
            .map(|t| (t.text.as_str(), t.line))
            .collect();
        assert_eq!(idents, vec![("a", 1), ("b", 5)]);
    }

    #[test]
    fn indented_cut_ends_block_comment() {
        let toks = tokenize("=begin\nx @\n   =cut  \nb := 2;").unwrap();
        assert_eq!((toks[0].text.as_str(), toks[0].line), ("b", 4));
    }

    #[test]
    fn unterminated_block_comment_skips_rest() {
        use TokenKind::*;
        assert_eq!(kinds("a := 1;\n=begin\n'unclosed\n@@@"), vec![
            Ident, Assign, Number, Semicolon, Eof
        ]);
    }

    #[test]
    fn positions() {
        let toks = tokenize("\n  key := 'v';").unwrap();
        assert_eq!((toks[0].line, toks[0].column), (2, 3));
        assert_eq!((toks[1].line, toks[1].column), (2, 7));
        assert_eq!((toks[2].line, toks[2].column), (2, 10));
        let eof = toks.last().unwrap();
        assert_eq!((eof.kind, eof.line), (TokenKind::Eof, 3));
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let toks = tokenize("s := 'héllo wörld'; t := 1;").unwrap();
        let t = toks.iter().find(|t| t.text == "t").unwrap();
        assert_eq!(t.column, 21);
    }

    #[test]
    fn long_line_columns() {
        let src = "1 ".repeat(20_000);
        let toks = tokenize(&src).unwrap();
        assert_eq!(toks.len(), 20_001);
        assert_eq!(toks[19_999].column, 2 * 19_999 + 1);
    }

    #[test]
    fn identifiers_are_ascii() {
        let err = tokenize("x\u{b2} := 1;").unwrap_err();
        assert_eq!(err, LexError::UnexpectedChar { ch: '\u{b2}', line: 1, column: 2 });
        let err = tokenize("v := \u{663};").unwrap_err();
        assert_eq!(err, LexError::UnexpectedChar { ch: '\u{663}', line: 1, column: 6 });
        let err = tokenize("\u{e9}t\u{e9} := 1;").unwrap_err();
        assert_eq!(err, LexError::UnexpectedChar { ch: '\u{e9}', line: 1, column: 1 });
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn describe() {
        assert_eq!(Token::new(TokenKind::Ident, "foo", 1, 1).describe(), "identifier `foo`");
        assert_eq!(Token::new(TokenKind::Semicolon, ";", 1, 1).describe(), "';'");
        assert_eq!(Token::new(TokenKind::Eof, "", 1, 1).describe(), "end of input");
    }
}
