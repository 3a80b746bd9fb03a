//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Vocabulary;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Known technology names
    #[serde(default)]
    pub vocabulary: Vocabulary,

    /// Boundary rules for tag extraction
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Query tokenizer and cache settings
    #[serde(default)]
    pub query: QueryConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log verbosity
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.vocabulary.validate()?;

        for c in self.query.symbol_chars.chars() {
            if !is_symbol_candidate(c) {
                return Err(AppError::validation(format!(
                    "query.symbol_chars contains unusable character {c:?}"
                )));
            }
        }
        for c in self
            .matching
            .sticky_symbols
            .chars()
            .chain(self.matching.joiner_symbols.chars())
        {
            if !is_symbol_candidate(c) {
                return Err(AppError::validation(format!(
                    "matching symbols contain unusable character {c:?}"
                )));
            }
        }
        if let Some(c) = self
            .matching
            .sticky_symbols
            .chars()
            .find(|c| self.matching.joiner_symbols.contains(*c))
        {
            return Err(AppError::validation(format!(
                "{c:?} is both a sticky and a joiner symbol"
            )));
        }
        if self.query.cache_capacity == 0 {
            return Err(AppError::validation("query.cache_capacity must be > 0"));
        }
        Ok(())
    }
}

fn is_symbol_candidate(c: char) -> bool {
    !(c.is_alphanumeric() || c.is_whitespace() || matches!(c, '(' | ')' | '"'))
}

/// Word-boundary rules used when looking for tech names in posting text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Symbols that always continue a word ("C" never matches inside "C++")
    #[serde(default = "defaults::sticky_symbols")]
    pub sticky_symbols: String,

    /// Symbols that continue a word only when an alphanumeric follows them
    #[serde(default = "defaults::joiner_symbols")]
    pub joiner_symbols: String,

    /// Convert HTML posting bodies to plain text before matching
    #[serde(default = "defaults::strip_html")]
    pub strip_html: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            sticky_symbols: defaults::sticky_symbols(),
            joiner_symbols: defaults::joiner_symbols(),
            strip_html: defaults::strip_html(),
        }
    }
}

/// Query language settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Symbol characters allowed inside unquoted identifiers
    #[serde(default = "defaults::symbol_chars")]
    pub symbol_chars: String,

    /// Maximum number of parsed queries kept in the cache
    #[serde(default = "defaults::cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            symbol_chars: defaults::symbol_chars(),
            cache_capacity: defaults::cache_capacity(),
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON reports
    #[serde(default = "defaults::pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: defaults::pretty(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn sticky_symbols() -> String {
        "+#".into()
    }
    pub fn joiner_symbols() -> String {
        ".-".into()
    }
    pub fn strip_html() -> bool {
        true
    }
    pub fn symbol_chars() -> String {
        "+#.-".into()
    }
    pub fn cache_capacity() -> usize {
        256
    }
    pub fn pretty() -> bool {
        true
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
