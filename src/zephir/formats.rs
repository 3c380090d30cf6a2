//! Token stream output formats
//!
//!     raw   One `<kind path>\t<repr of text>` line per token, the layout of the Pygments
//!           raw token formatter. Handy for diffs and snapshots.
//!     json  A pretty-printed array of `{kind, text, start}` objects.
//!
//! Rendering to terminals or HTML belongs to the host and is not done here.

use crate::zephir::token::Token;
use std::fmt::Write;

pub fn to_raw(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        // writing into a String cannot fail
        let _ = writeln!(out, "{}\t{}", token.kind, python_repr(&token.text));
    }
    out
}

pub fn to_json(tokens: &[Token]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tokens)
}

/// Quote `text` the way Python's `repr` quotes a `str`.
fn python_repr(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
