//! Declarative rule definitions
//!
//! Grammars are written as `const` slices of [RuleDef]. The helpers here are `const fn`
//! so a whole table can live in a `static` without any runtime construction:
//!
//! ```text
//! const ROOT: &[RuleDef] = &[
//!     include("whitespace"),
//!     rule(r"[{(]", TokenKind::Punctuation).push("inner"),
//!     rule(r"[a-z]+", TokenKind::NameOther),
//! ];
//! ```

use crate::zephir::token::TokenKind;

/// What a matching rule does to the state stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Push(&'static str),
    Pop,
    Replace(&'static str),
}

/// Regex flags, applied per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    pub dot_matches_new_line: bool,
    pub case_insensitive: bool,
    pub multi_line: bool,
}

impl Flags {
    pub const NONE: Flags = Flags {
        dot_matches_new_line: false,
        case_insensitive: false,
        multi_line: false,
    };

    pub const DOTALL: Flags = Flags {
        dot_matches_new_line: true,
        case_insensitive: false,
        multi_line: false,
    };
}

/// A single matching rule, before compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    pub pattern: &'static str,
    pub kind: TokenKind,
    pub action: Action,
    pub flags: Flags,
    pub at_start: bool,
    pub lookahead: Option<&'static str>,
}

/// An entry in a state's rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDef {
    Match(RuleSpec),
    /// Splice another state's rules in at this position.
    Include(&'static str),
}

pub const fn rule(pattern: &'static str, kind: TokenKind) -> RuleDef {
    RuleDef::Match(RuleSpec {
        pattern,
        kind,
        action: Action::None,
        flags: Flags::NONE,
        at_start: false,
        lookahead: None,
    })
}

pub const fn include(state: &'static str) -> RuleDef {
    RuleDef::Include(state)
}

impl RuleDef {
    const fn map(self, f: RuleSpecEdit) -> RuleDef {
        match self {
            RuleDef::Match(mut spec) => {
                match f {
                    RuleSpecEdit::Action(action) => spec.action = action,
                    RuleSpecEdit::Flags(flags) => spec.flags = flags,
                    RuleSpecEdit::AtStart => spec.at_start = true,
                    RuleSpecEdit::Lookahead(pattern) => spec.lookahead = Some(pattern),
                }
                RuleDef::Match(spec)
            }
            RuleDef::Include(state) => RuleDef::Include(state),
        }
    }

    pub const fn push(self, state: &'static str) -> RuleDef {
        self.map(RuleSpecEdit::Action(Action::Push(state)))
    }

    pub const fn pop(self) -> RuleDef {
        self.map(RuleSpecEdit::Action(Action::Pop))
    }

    pub const fn replace(self, state: &'static str) -> RuleDef {
        self.map(RuleSpecEdit::Action(Action::Replace(state)))
    }

    pub const fn flags(self, flags: Flags) -> RuleDef {
        self.map(RuleSpecEdit::Flags(flags))
    }

    /// Only try this rule at offset 0 of the input.
    pub const fn at_start(self) -> RuleDef {
        self.map(RuleSpecEdit::AtStart)
    }

    /// Require `pattern` to match right after this rule's match, without consuming it.
    pub const fn lookahead(self, pattern: &'static str) -> RuleDef {
        self.map(RuleSpecEdit::Lookahead(pattern))
    }
}

#[derive(Clone, Copy)]
enum RuleSpecEdit {
    Action(Action),
    Flags(Flags),
    AtStart,
    Lookahead(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFS: &[RuleDef] = &[
        include("ws"),
        rule(r"\(", TokenKind::Punctuation).push("inner"),
        rule(r"\)", TokenKind::Punctuation).pop(),
        rule(r"", TokenKind::Text).at_start().lookahead(r"\s"),
        rule(r"/\*.*?\*/", TokenKind::CommentMultiline).flags(Flags::DOTALL),
    ];

    #[test]
    fn test_builders_in_const_context() {
        assert_eq!(DEFS[0], RuleDef::Include("ws"));

        let RuleDef::Match(push) = DEFS[1] else {
            panic!("expected a rule");
        };
        assert_eq!(push.action, Action::Push("inner"));
        assert_eq!(push.flags, Flags::NONE);

        let RuleDef::Match(pop) = DEFS[2] else {
            panic!("expected a rule");
        };
        assert_eq!(pop.action, Action::Pop);

        let RuleDef::Match(start) = DEFS[3] else {
            panic!("expected a rule");
        };
        assert!(start.at_start);
        assert_eq!(start.lookahead, Some(r"\s"));
        assert_eq!(start.action, Action::None);

        let RuleDef::Match(comment) = DEFS[4] else {
            panic!("expected a rule");
        };
        assert!(comment.flags.dot_matches_new_line);
    }

    #[test]
    fn test_modifiers_leave_includes_alone() {
        assert_eq!(include("ws").push("x"), RuleDef::Include("ws"));
    }
}
