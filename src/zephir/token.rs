//! Token kinds and tokens
//!
//!     Kinds follow the Pygments token hierarchy, restricted to the categories the Zephir
//!     grammar emits. Every kind except the top-level categories has a parent, so a host
//!     can style `Keyword.Reserved` by falling back to `Keyword` when it has no specific rule.
//!
//!     Error is the fallback kind: it is emitted, one character at a time, wherever no rule
//!     of the current state matches.

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    Error,
    Comment,
    CommentSingle,
    CommentMultiline,
    Operator,
    Punctuation,
    Keyword,
    KeywordDeclaration,
    KeywordReserved,
    KeywordConstant,
    Name,
    NameBuiltin,
    NameOther,
    Number,
    NumberFloat,
    NumberHex,
    NumberInteger,
    String,
    StringRegex,
    StringDouble,
    StringSingle,
}

impl TokenKind {
    /// The enclosing category, or `None` for top-level kinds.
    pub fn parent(self) -> Option<TokenKind> {
        use TokenKind::*;
        match self {
            CommentSingle | CommentMultiline => Some(Comment),
            KeywordDeclaration | KeywordReserved | KeywordConstant => Some(Keyword),
            NameBuiltin | NameOther => Some(Name),
            NumberFloat | NumberHex | NumberInteger => Some(Number),
            StringRegex | StringDouble | StringSingle => Some(String),
            Text | Error | Comment | Operator | Punctuation | Keyword | Name | Number
            | String => None,
        }
    }

    /// True if `self` is `other` or one of its descendants.
    pub fn is_subtype_of(self, other: TokenKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// The last component of the dotted path, e.g. `Reserved` for `Keyword.Reserved`.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Text => "Text",
            Error => "Error",
            Comment => "Comment",
            CommentSingle => "Single",
            CommentMultiline => "Multiline",
            Operator => "Operator",
            Punctuation => "Punctuation",
            Keyword => "Keyword",
            KeywordDeclaration => "Declaration",
            KeywordReserved => "Reserved",
            KeywordConstant => "Constant",
            Name => "Name",
            NameBuiltin => "Builtin",
            NameOther => "Other",
            Number => "Number",
            NumberFloat => "Float",
            NumberHex => "Hex",
            NumberInteger => "Integer",
            String => "String",
            StringRegex => "Regex",
            StringDouble => "Double",
            StringSingle => "Single",
        }
    }

    /// Dotted path rooted at `Token`, as Pygments prints it: `Token.Keyword.Reserved`.
    pub fn path(self) -> String {
        let mut parts = vec![self.name()];
        let mut current = self.parent();
        while let Some(kind) = current {
            parts.push(kind.name());
            current = kind.parent();
        }
        parts.push("Token");
        parts.reverse();
        parts.join(".")
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A classified slice of the scanned text. `start` is a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
        }
    }

    /// Byte offset one past the end of the token.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }
}
