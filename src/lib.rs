//! # zephir
//!
//! A syntax highlighting lexer for the Zephir language.
//!
//! The lexer is a table of regular-expression rules grouped into named states,
//! driven by a small generic engine that tracks a stack of active states. See
//! the [zephir module](zephir) for the layout.

pub mod zephir;

pub use zephir::lexer::ZephirLexer;
pub use zephir::token::{Token, TokenKind};
