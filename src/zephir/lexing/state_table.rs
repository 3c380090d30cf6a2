//! Compiled state table
//!
//! Built once from a declarative grammar. Includes are flattened, action targets are
//! resolved to indices and every pattern is compiled anchored at its start, so the scan
//! loop never looks anything up by name.

use crate::zephir::error::LexerError;
use crate::zephir::lexing::rules::{Action, RuleDef, RuleSpec};
use crate::zephir::token::TokenKind;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use tracing::debug;

pub const ROOT_STATE: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

/// A stack action with its target resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Push(StateId),
    Pop,
    Replace(StateId),
}

#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    lookahead: Option<Regex>,
    at_start: bool,
    pub kind: TokenKind,
    pub transition: Transition,
}

impl Rule {
    /// Length of the match starting exactly at `offset`, if any.
    ///
    /// The lookahead is only checked against the match the pattern prefers; shorter
    /// alternatives are not retried.
    pub fn match_at(&self, text: &str, offset: usize) -> Option<usize> {
        if self.at_start && offset != 0 {
            return None;
        }
        let rest = &text[offset..];
        let len = self.regex.find(rest)?.end();
        if let Some(lookahead) = &self.lookahead {
            if !lookahead.is_match(&rest[len..]) {
                return None;
            }
        }
        Some(len)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

#[derive(Debug, Clone)]
struct State {
    name: String,
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
pub struct StateTable {
    states: Vec<State>,
    root: StateId,
}

impl StateTable {
    /// Compile a grammar given as `(state name, rules)` pairs.
    pub fn build(defs: &[(&'static str, &[RuleDef])]) -> Result<Self, LexerError> {
        let ids: HashMap<&str, StateId> = defs
            .iter()
            .enumerate()
            .map(|(idx, (name, _))| (*name, StateId(idx)))
            .collect();
        let root = *ids.get(ROOT_STATE).ok_or(LexerError::MissingRoot)?;
        let by_name: HashMap<&str, &[RuleDef]> =
            defs.iter().map(|(name, rules)| (*name, *rules)).collect();

        let mut states = Vec::with_capacity(defs.len());
        for (name, _) in defs {
            let mut specs = Vec::new();
            let mut visiting = Vec::new();
            flatten(*name, &by_name, &mut visiting, &mut specs)?;

            let rules = specs
                .iter()
                .map(|spec| compile(name, spec, &ids))
                .collect::<Result<Vec<_>, _>>()?;
            states.push(State {
                name: (*name).to_string(),
                rules,
            });
        }

        debug!(
            states = states.len(),
            rules = states.iter().map(|s| s.rules.len()).sum::<usize>(),
            "built state table"
        );
        Ok(Self { states, root })
    }

    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|state| state.name == name)
            .map(StateId)
    }

    pub fn state_name(&self, id: StateId) -> &str {
        &self.states[id.0].name
    }

    /// The flattened rules of a state, in match order.
    pub fn rules(&self, id: StateId) -> &[Rule] {
        &self.states[id.0].rules
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

fn flatten<'d>(
    name: &'static str,
    by_name: &HashMap<&str, &'d [RuleDef]>,
    visiting: &mut Vec<&'static str>,
    out: &mut Vec<RuleSpec>,
) -> Result<(), LexerError> {
    if visiting.contains(&name) {
        return Err(LexerError::RecursiveInclude {
            state: name.to_string(),
        });
    }
    let defs = by_name.get(name).ok_or_else(|| LexerError::UnknownState {
        state: name.to_string(),
        referenced_from: visiting.last().copied().unwrap_or(ROOT_STATE).to_string(),
    })?;

    visiting.push(name);
    for def in defs.iter() {
        match def {
            RuleDef::Match(spec) => out.push(*spec),
            RuleDef::Include(included) => flatten(*included, by_name, visiting, out)?,
        }
    }
    visiting.pop();
    Ok(())
}

fn compile(
    state: &str,
    spec: &RuleSpec,
    ids: &HashMap<&str, StateId>,
) -> Result<Rule, LexerError> {
    let build = |pattern: &str| {
        RegexBuilder::new(&format!(r"\A(?:{})", pattern))
            .dot_matches_new_line(spec.flags.dot_matches_new_line)
            .case_insensitive(spec.flags.case_insensitive)
            .multi_line(spec.flags.multi_line)
            .build()
            .map_err(|source| LexerError::InvalidPattern {
                state: state.to_string(),
                pattern: pattern.to_string(),
                source,
            })
    };
    let resolve = |target: &str| {
        ids.get(target)
            .copied()
            .ok_or_else(|| LexerError::UnknownState {
                state: target.to_string(),
                referenced_from: state.to_string(),
            })
    };

    let transition = match spec.action {
        Action::None => Transition::None,
        Action::Pop => Transition::Pop,
        Action::Push(target) => Transition::Push(resolve(target)?),
        Action::Replace(target) => Transition::Replace(resolve(target)?),
    };

    Ok(Rule {
        regex: build(spec.pattern)?,
        lookahead: spec.lookahead.map(build).transpose()?,
        at_start: spec.at_start,
        kind: spec.kind,
        transition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zephir::lexing::rules::{include, rule, Flags};

    const WS: &[RuleDef] = &[rule(r"\s+", TokenKind::Text)];
    const ROOT: &[RuleDef] = &[
        rule(r"\(", TokenKind::Punctuation).push("inner"),
        include("ws"),
        rule(r"[a-z]+", TokenKind::NameOther),
    ];
    const INNER: &[RuleDef] = &[
        include("ws"),
        rule(r"\)", TokenKind::Punctuation).pop(),
    ];

    #[test]
    fn test_includes_are_flattened_in_place() {
        let table = StateTable::build(&[("root", ROOT), ("ws", WS), ("inner", INNER)]).unwrap();
        let root = table.root();
        let patterns: Vec<_> = table.rules(root).iter().map(|r| r.pattern()).collect();
        assert_eq!(patterns, vec![r"\A(?:\()", r"\A(?:\s+)", r"\A(?:[a-z]+)"]);

        let inner = table.state_id("inner").unwrap();
        assert_eq!(table.rules(inner).len(), 2);
        assert_eq!(table.rules(inner)[1].transition, Transition::Pop);
        assert_eq!(table.rules(root)[0].transition, Transition::Push(inner));
        assert_eq!(table.state_name(inner), "inner");
    }

    #[test]
    fn test_missing_root() {
        let err = StateTable::build(&[("ws", WS)]).unwrap_err();
        assert!(matches!(err, LexerError::MissingRoot));
    }

    #[test]
    fn test_unknown_include() {
        let err = StateTable::build(&[("root", ROOT), ("inner", INNER)]).unwrap_err();
        match err {
            LexerError::UnknownState {
                state,
                referenced_from,
            } => {
                assert_eq!(state, "ws");
                assert_eq!(referenced_from, "root");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_push_target() {
        const BAD: &[RuleDef] = &[rule(r"x", TokenKind::Text).push("nowhere")];
        let err = StateTable::build(&[("root", BAD)]).unwrap_err();
        assert!(matches!(err, LexerError::UnknownState { state, .. } if state == "nowhere"));
    }

    #[test]
    fn test_recursive_include() {
        const A: &[RuleDef] = &[include("b")];
        const B: &[RuleDef] = &[include("a")];
        let err = StateTable::build(&[("root", A), ("a", A), ("b", B)]).unwrap_err();
        assert!(matches!(err, LexerError::RecursiveInclude { .. }));
    }

    #[test]
    fn test_invalid_pattern() {
        const BAD: &[RuleDef] = &[rule(r"(unclosed", TokenKind::Text)];
        let err = StateTable::build(&[("root", BAD)]).unwrap_err();
        assert!(matches!(err, LexerError::InvalidPattern { ref state, .. } if state == "root"));
    }

    #[test]
    fn test_match_is_anchored() {
        const DEFS: &[RuleDef] = &[rule(r"b", TokenKind::Text)];
        let table = StateTable::build(&[("root", DEFS)]).unwrap();
        let rule = &table.rules(table.root())[0];
        assert_eq!(rule.match_at("ab", 0), None);
        assert_eq!(rule.match_at("ab", 1), Some(1));
    }

    #[test]
    fn test_at_start_and_lookahead() {
        const DEFS: &[RuleDef] = &[
            rule(r"", TokenKind::Text).at_start().lookahead(r"\s"),
            rule(r"\\", TokenKind::Operator).lookahead(r"\n"),
        ];
        let table = StateTable::build(&[("root", DEFS)]).unwrap();
        let rules = table.rules(table.root());

        assert_eq!(rules[0].match_at(" x", 0), Some(0));
        assert_eq!(rules[0].match_at("x ", 0), None);
        assert_eq!(rules[0].match_at("x  ", 1), None);

        assert_eq!(rules[1].match_at("\\\n", 0), Some(1));
        assert_eq!(rules[1].match_at("\\n", 0), None);
    }

    #[test]
    fn test_rule_flags_reach_the_regex() {
        const CASELESS: Flags = Flags {
            case_insensitive: true,
            ..Flags::NONE
        };
        const MULTILINE: Flags = Flags {
            multi_line: true,
            ..Flags::NONE
        };
        const DEFS: &[RuleDef] = &[
            rule(r"select", TokenKind::Keyword).flags(CASELESS),
            rule(r"[a-z]+$", TokenKind::NameOther).flags(MULTILINE),
            rule(r"[a-z]+$", TokenKind::NameOther),
            rule(r"a.b", TokenKind::Text).flags(Flags::DOTALL),
        ];
        let table = StateTable::build(&[("root", DEFS)]).unwrap();
        let rules = table.rules(table.root());

        assert_eq!(rules[0].match_at("SeLeCt", 0), Some(6));
        assert_eq!(rules[1].match_at("ab\ncd", 0), Some(2));
        assert_eq!(rules[2].match_at("ab\ncd", 0), None);
        assert_eq!(rules[2].match_at("ab\ncd", 3), Some(2));
        assert_eq!(rules[3].match_at("a\nb", 0), Some(3));
    }
}
