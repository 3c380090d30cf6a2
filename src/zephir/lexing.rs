//! Lexing engine
//!
//! A generic regex-driven tokenizer with a state stack. Nothing in here knows about Zephir:
//! a grammar is a list of named states, each an ordered list of [RuleDef]s, and the engine
//! only ever sees it through a compiled [StateTable].
//!
//! Structure:
//!
//!     rules        Declarative rule definitions (patterns, kinds, actions, flags).
//!     state_table  Compilation of the definitions: include flattening, regex building,
//!                  action target resolution.
//!     tokenizer    The scan loop, yielding tokens lazily from a local state stack.
//!
//! Matching
//!
//!     Every pattern is anchored at the current offset and matched against the remainder
//!     of the input. Rules are tried top to bottom and the first match wins, so earlier
//!     rules shadow later ones. Two features of the source grammars have no direct form in
//!     the `regex` crate and are carried as rule data instead:
//!     - `at_start`: the rule is only tried at offset 0 (what `^` means without multiline).
//!     - `lookahead`: a pattern that must match right after the rule's match, unconsumed.
//!
//! Recovery
//!
//!     When no rule of the current state matches, one character is emitted as
//!     `TokenKind::Error` and the scan continues. A scan never fails.

pub mod rules;
pub mod state_table;
pub mod tokenizer;

pub use rules::{include, rule, Action, Flags, RuleDef, RuleSpec};
pub use state_table::{Rule, StateId, StateTable, Transition};
pub use tokenizer::{StateStack, Tokenizer, Tokens};
