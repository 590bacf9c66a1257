//! TOML-style rendering of a [`Document`].
//!
//! Output is one `key = value` line per top-level binding, in document
//! order.  Nested arrays and dictionaries are written inline.  The format
//! follows TOML's look but is not validated TOML: strings are not escaped
//! and inline tables may nest arbitrarily.
//!
//! | Value | Rendering |
//! |-------|-----------|
//! | `Int` | `42`, `-7` |
//! | `Float` | one fractional digit: `3.1`, `1000.0` |
//! | `Str`, `Ident` | `"text"` (verbatim) |
//! | `Array` | `[1, 2, 3]`, `[]` |
//! | `Dict` | `{ a = 1, b = "x" }`, `{  }` |

use std::fmt::{self, Write};

use crate::value::{Document, Value};

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:.1}"),
            Value::Str(s) | Value::Ident(s) => write!(f, "\"{s}\""),
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Value::Dict(dict) => {
                f.write_str("{ ")?;
                for (i, (key, value)) in dict.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// Render a whole document, one newline-terminated line per binding.
pub fn to_toml(doc: &Document) -> String {
    let mut out = String::new();
    for (key, value) in doc {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{key} = {value}");
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
