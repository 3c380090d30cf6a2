//! Zephir lexer
//!
//! Structure:
//!
//!     token       Token kinds (the Pygments categories Zephir uses) and tokens.
//!     lexing      The generic regex/state-stack engine. Knows nothing about Zephir.
//!     grammar     The Zephir rule table, as declarative data.
//!     lexer       The lexer front end: metadata, input preprocessing options.
//!     formats     Raw token dump and JSON output.
//!     config      Loading lexer options from TOML.
//!     error       Construction-time errors. Scanning itself never fails.
//!
//! The pipeline is simply: source -> (optional preprocessing) -> lexing with the
//! grammar table -> tokens -> (optional) formats.

pub mod config;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod lexer;
pub mod lexing;
pub mod token;

pub use error::LexerError;
pub use lexer::{LexerOptions, ZephirLexer};
pub use token::{Token, TokenKind};
