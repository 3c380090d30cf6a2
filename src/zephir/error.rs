//! Errors raised while building a state table or loading configuration.
//!
//! Scanning has no error path: unmatched input becomes `TokenKind::Error` tokens.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexerError {
    #[error("invalid pattern {pattern:?} in state '{state}': {source}")]
    InvalidPattern {
        state: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("state '{state}' referenced from '{referenced_from}' is not defined")]
    UnknownState {
        state: String,
        referenced_from: String,
    },

    #[error("state '{state}' includes itself")]
    RecursiveInclude { state: String },

    #[error("state table has no 'root' state")]
    MissingRoot,

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}
