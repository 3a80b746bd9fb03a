//! Process-scoped cache of parsed queries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::query::Expr;

/// Parsed expressions keyed by raw query string.
///
/// Bounded; once `capacity` entries are held the cache is emptied before the
/// next insert. Call [`QueryCache::invalidate`] when the vocabulary changes.
#[derive(Debug)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, Arc<Expr>>>,
    capacity: usize,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, query: &str) -> Option<Arc<Expr>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(query)
            .cloned()
    }

    pub fn insert(&self, query: &str, expr: Arc<Expr>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= self.capacity && !entries.contains_key(query) {
            log::debug!("Query cache full ({} entries), clearing", entries.len());
            entries.clear();
        }
        entries.insert(query.to_string(), expr);
    }

    /// Drop every cached expression.
    pub fn invalidate(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
