//! Lexer configuration
//!
//! The `[lexer]` table maps onto [LexerOptions]. `defaults/zephir.default.toml` is compiled
//! in and always forms the bottom layer, so a user file only needs the keys it changes.

use crate::zephir::error::LexerError;
use crate::zephir::lexer::{LexerOptions, ZephirLexer};
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const DEFAULT_TOML: &str = include_str!("../../defaults/zephir.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ZephirConfig {
    pub lexer: LexerOptions,
}

impl ZephirConfig {
    pub fn lexer(&self) -> ZephirLexer {
        ZephirLexer::with_options(self.lexer.clone())
    }
}

/// Stacks TOML sources over the embedded lexer defaults. Later layers win.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file that must exist; `build` fails otherwise.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        debug!(path = %path.display(), required, "layering lexer config");
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override one option by dotted key, e.g. `("lexer.tabsize", 4)`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, LexerError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ZephirConfig, LexerError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<ZephirConfig, LexerError> {
    Loader::new().build()
}
