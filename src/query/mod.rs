//! Tech-stack query language.
//!
//! A raw query string goes through the [`Tokenizer`], then [`parse`] builds an
//! [`Expr`] tree, and [`evaluate`] decides whether a posting's [`TagSet`]
//! satisfies it.
//!
//! [`TagSet`]: crate::models::TagSet

mod cache;
mod eval;
mod expr;
mod parser;
mod token;

use std::sync::Arc;

pub use cache::QueryCache;
pub use eval::evaluate;
pub use expr::{Expr, Term};
pub use parser::parse;
pub use token::{Token, TokenKind, Tokenizer};

use crate::error::QueryError;
use crate::models::{Config, Vocabulary};

/// Tokenizes, parses and canonicalizes queries for one vocabulary.
#[derive(Debug)]
pub struct QueryEngine {
    tokenizer: Tokenizer,
    vocabulary: Vocabulary,
    cache: QueryCache,
}

impl QueryEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            tokenizer: Tokenizer::from_config(config),
            vocabulary: config.vocabulary.clone(),
            cache: QueryCache::new(config.query.cache_capacity),
        }
    }

    /// Parse a query and map alias terms onto canonical names.
    pub fn compile(&self, query: &str) -> Result<Expr, QueryError> {
        let tokens = self.tokenizer.tokenize(query);
        let expr = parse(&tokens)?;
        Ok(expr.resolve_aliases(&self.vocabulary))
    }

    /// Like [`QueryEngine::compile`], reusing earlier results for the same string.
    pub fn compile_cached(&self, query: &str) -> Result<Arc<Expr>, QueryError> {
        if let Some(expr) = self.cache.get(query) {
            return Ok(expr);
        }
        let expr = Arc::new(self.compile(query)?);
        self.cache.insert(query, Arc::clone(&expr));
        Ok(expr)
    }

    /// Swap in a new vocabulary and drop every cached query.
    pub fn set_vocabulary(&mut self, vocabulary: Vocabulary) {
        self.tokenizer = self.tokenizer.clone().with_vocabulary(&vocabulary);
        self.vocabulary = vocabulary;
        self.cache.invalidate();
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
}
