//! Scan loop
//!
//! [Tokens] is a lazy iterator owning the only mutable state of a scan: the offset and the
//! state stack. Nothing is shared between scans, so a table can be used from many threads
//! at once and every call to [Tokenizer::tokenize] starts over from offset 0.
//!
//! Zero-length matches
//!
//!     A rule may match the empty string (typically to switch state without consuming
//!     input). Such a match applies its action but emits no token. To guarantee progress,
//!     a (state, rule) pair that matched empty at some offset is skipped if the scan comes
//!     back to that state before the offset moves. Since there are finitely many pairs,
//!     every offset eventually either advances through a real match or falls back to an
//!     Error token.

use crate::zephir::lexing::state_table::{StateId, StateTable, Transition};
use crate::zephir::token::{Token, TokenKind};
use tracing::{debug, trace};

/// The active states, bottom to top. The bottom entry is the root state and never leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStack {
    states: Vec<StateId>,
}

impl StateStack {
    pub fn new(root: StateId) -> Self {
        Self { states: vec![root] }
    }

    pub fn top(&self) -> StateId {
        // never empty: pop stops at the root
        self.states[self.states.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Push(state) => self.states.push(state),
            Transition::Pop => {
                if self.states.len() > 1 {
                    self.states.pop();
                }
            }
            Transition::Replace(state) => {
                if self.states.len() > 1 {
                    let last = self.states.len() - 1;
                    self.states[last] = state;
                } else {
                    // the root stays at the bottom
                    self.states.push(state);
                }
            }
        }
    }
}

/// A handle running a compiled table over source text.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'t> {
    table: &'t StateTable,
}

impl<'t> Tokenizer<'t> {
    pub fn new(table: &'t StateTable) -> Self {
        Self { table }
    }

    pub fn tokenize<'s>(&self, text: &'s str) -> Tokens<'t, 's> {
        Tokens {
            table: self.table,
            text,
            offset: 0,
            stack: StateStack::new(self.table.root()),
            stalled: Vec::new(),
        }
    }
}

pub struct Tokens<'t, 's> {
    table: &'t StateTable,
    text: &'s str,
    offset: usize,
    stack: StateStack,
    /// (state, rule index) pairs that matched empty at the current offset
    stalled: Vec<(StateId, usize)>,
}

impl Tokens<'_, '_> {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    fn emit(&mut self, kind: TokenKind, len: usize) -> Token {
        let start = self.offset;
        self.offset += len;
        self.stalled.clear();
        Token::new(kind, &self.text[start..self.offset], start)
    }

    fn transition(&mut self, transition: Transition) {
        if transition == Transition::None {
            return;
        }
        let table = self.table;
        let from = table.state_name(self.stack.top());
        self.stack.apply(transition);
        trace!(
            offset = self.offset,
            from,
            to = table.state_name(self.stack.top()),
            depth = self.stack.depth(),
            "state transition"
        );
    }
}

impl Iterator for Tokens<'_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let table = self.table;
        while self.offset < self.text.len() {
            let state = self.stack.top();
            let matched = table
                .rules(state)
                .iter()
                .enumerate()
                .filter(|(idx, _)| !self.stalled.contains(&(state, *idx)))
                .find_map(|(idx, rule)| {
                    rule.match_at(self.text, self.offset)
                        .map(|len| (idx, rule, len))
                });

            match matched {
                Some((idx, rule, 0)) => {
                    self.stalled.push((state, idx));
                    self.transition(rule.transition);
                }
                Some((_, rule, len)) => {
                    let token = self.emit(rule.kind, len);
                    self.transition(rule.transition);
                    return Some(token);
                }
                None => {
                    let len = self.text[self.offset..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                    debug!(
                        offset = self.offset,
                        state = table.state_name(state),
                        "no rule matched, emitting error token"
                    );
                    return Some(self.emit(TokenKind::Error, len));
                }
            }
        }
        None
    }
}
