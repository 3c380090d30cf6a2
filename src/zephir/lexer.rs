//! Lexer front end
//!
//! [ZephirLexer] bundles the compiled grammar with what a host needs around it: the
//! lexer's name, aliases and filename globs for dispatch, and the input preprocessing
//! options every Pygments lexer accepts.
//!
//! Two entry points:
//!
//!     get_tokens_unprocessed  Lexes the text as given. Token texts concatenate back to it.
//!     get_tokens              Normalizes newlines, applies the strip/tab/newline options,
//!                             then lexes the normalized text.

use crate::zephir::grammar::ZEPHIR;
use crate::zephir::lexing::{Tokenizer, Tokens};
use crate::zephir::token::Token;
use glob::Pattern;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::Path;

/// Input preprocessing options. Defaults match Pygments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LexerOptions {
    /// Strip leading and trailing newlines.
    pub stripnl: bool,
    /// Strip all leading and trailing whitespace. Takes precedence over `stripnl`.
    pub stripall: bool,
    /// Make sure the input ends with a newline.
    pub ensurenl: bool,
    /// Expand tabs to this many columns; 0 leaves tabs alone.
    pub tabsize: usize,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            stripnl: true,
            stripall: false,
            ensurenl: true,
            tabsize: 0,
        }
    }
}

impl LexerOptions {
    /// Apply the options to `text`, in the order Pygments does.
    pub fn preprocess(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let text = if self.stripall {
            text.trim()
        } else if self.stripnl {
            text.trim_matches('\n')
        } else {
            text.as_str()
        };
        let mut text = if self.tabsize > 0 {
            expand_tabs(text, self.tabsize)
        } else {
            text.to_string()
        };
        if self.ensurenl && !text.ends_with('\n') {
            text.push('\n');
        }
        text
    }
}

/// Column-aware tab expansion: each tab moves to the next multiple of `tabsize`.
fn expand_tabs(text: &str, tabsize: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let width = tabsize - column % tabsize;
                out.extend(std::iter::repeat(' ').take(width));
                column += width;
            }
            '\n' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}

static FILENAME_PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    ZephirLexer::FILENAMES
        .iter()
        .map(|glob| Pattern::new(glob).expect("filename globs are valid"))
        .collect()
});

/// fnmatch-style test of a bare file name against a set of globs.
fn matches_any(patterns: &[Pattern], name: &str) -> bool {
    patterns.iter().any(|pattern| pattern.matches(name))
}

#[derive(Debug, Clone, Default)]
pub struct ZephirLexer {
    options: LexerOptions,
}

impl ZephirLexer {
    pub const NAME: &'static str = "Zephir";
    pub const ALIASES: &'static [&'static str] = &["zephir"];
    pub const FILENAMES: &'static [&'static str] = &["*.zep"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LexerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// True if the file name of `path` matches one of the lexer's globs.
    pub fn matches_filename(path: impl AsRef<Path>) -> bool {
        let Some(name) = path.as_ref().file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        matches_any(&FILENAME_PATTERNS, name)
    }

    /// True if `alias` names this lexer (case-insensitive).
    pub fn has_alias(alias: &str) -> bool {
        Self::ALIASES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(alias))
    }

    /// Lex `text` exactly as given.
    pub fn get_tokens_unprocessed<'s>(&self, text: &'s str) -> Tokens<'static, 's> {
        Tokenizer::new(&ZEPHIR).tokenize(text)
    }

    /// Preprocess `text` according to the options, then lex it.
    pub fn get_tokens(&self, text: &str) -> Vec<Token> {
        let text = self.options.preprocess(text);
        self.get_tokens_unprocessed(&text).collect()
    }
}
