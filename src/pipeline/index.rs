//! Posting index: each posting paired with its extracted tag set.
//!
//! The index is built once per dataset load and never mutated afterwards.
//! [`Catalog`] publishes the current index to concurrent readers and swaps in
//! a freshly built one on reload, so in-flight filters keep working against
//! the snapshot they started with.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::models::{Posting, TagSet};
use crate::pipeline::TagExtractor;
use crate::query::Expr;

/// Immutable dataset snapshot with precomputed tag sets.
#[derive(Debug, Clone)]
pub struct PostingIndex {
    postings: Vec<Posting>,
    tags: Vec<TagSet>,
    built_at: DateTime<Utc>,
}

impl Default for PostingIndex {
    fn default() -> Self {
        Self {
            postings: Vec::new(),
            tags: Vec::new(),
            built_at: Utc::now(),
        }
    }
}

impl PostingIndex {
    /// Extract tags for every posting.
    pub fn build(postings: Vec<Posting>, extractor: &TagExtractor) -> Self {
        let tags = postings.iter().map(|p| extractor.extract(&p.text)).collect();
        Self {
            postings,
            tags,
            built_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    /// Postings with their tag sets, in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (&Posting, &TagSet)> {
        self.postings.iter().zip(&self.tags)
    }

    /// Tag set of the posting with the given id.
    pub fn tags_of(&self, id: u64) -> Option<&TagSet> {
        self.postings
            .iter()
            .position(|p| p.id == id)
            .map(|i| &self.tags[i])
    }

    /// Postings satisfying `expr`, in dataset order.
    pub fn filter(&self, expr: &Expr) -> Vec<&Posting> {
        self.iter()
            .filter(|(_, tags)| expr.matches(tags))
            .map(|(posting, _)| posting)
            .collect()
    }

    /// Number of postings carrying each tag, most frequent first.
    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for tags in &self.tags {
            for tag in tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }

        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}

/// Process-wide holder of the current [`PostingIndex`].
#[derive(Debug)]
pub struct Catalog {
    extractor: TagExtractor,
    current: RwLock<Arc<PostingIndex>>,
    /// Serializes rebuilds; readers never take it
    writer: Mutex<()>,
}

impl Catalog {
    pub fn new(extractor: TagExtractor) -> Self {
        Self {
            extractor,
            current: RwLock::new(Arc::new(PostingIndex::default())),
            writer: Mutex::new(()),
        }
    }

    /// The index currently published to readers.
    pub fn snapshot(&self) -> Arc<PostingIndex> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Rebuild the index from a new dataset and publish it.
    ///
    /// Tag extraction runs outside the read/write lock; only the pointer
    /// swap is exclusive.
    pub fn reload(&self, postings: Vec<Posting>) -> Arc<PostingIndex> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let index = Arc::new(PostingIndex::build(postings, &self.extractor));
        log::debug!("Rebuilt posting index with {} postings", index.len());

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&index);
        index
    }

    /// Filter the current snapshot, returning owned postings.
    pub fn filter(&self, expr: &Expr) -> Vec<Posting> {
        self.snapshot().filter(expr).into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;
    use crate::query::QueryEngine;

    fn sample_postings() -> Vec<Posting> {
        vec![
            Posting::new(1, "Acme | Python, React | Remote"),
            Posting::new(2, "Globex | C++ and Rust | Onsite"),
            Posting::new(3, "Initech | Python, Angular"),
            Posting::new(4, "Hooli | Embedded C | Onsite"),
        ]
    }

    fn index() -> PostingIndex {
        PostingIndex::build(sample_postings(), &TagExtractor::from_config(&Config::default()))
    }

    fn ids(postings: &[&Posting]) -> Vec<u64> {
        postings.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_filter_preserves_order() {
        let engine = QueryEngine::new(&Config::default());
        let index = index();

        let expr = engine.compile("Python AND (React OR Angular)").unwrap();
        assert_eq!(ids(&index.filter(&expr)), vec![1, 3]);

        let expr = engine.compile("C AND NOT C++").unwrap();
        assert_eq!(ids(&index.filter(&expr)), vec![4]);

        let expr = engine.compile("C++").unwrap();
        assert_eq!(ids(&index.filter(&expr)), vec![2]);
    }

    #[test]
    fn test_tags_of() {
        let index = index();
        assert!(index.tags_of(2).unwrap().contains("c++"));
        assert!(!index.tags_of(2).unwrap().contains("c"));
        assert!(index.tags_of(99).is_none());
    }

    #[test]
    fn test_tag_counts() {
        let counts = index().tag_counts();
        assert_eq!(counts[0], ("python".to_string(), 2));
        assert!(counts.contains(&("rust".to_string(), 1)));
    }

    #[test]
    fn test_catalog_reload_swaps_snapshot() {
        let catalog = Catalog::new(TagExtractor::from_config(&Config::default()));
        assert!(catalog.snapshot().is_empty());

        let before = catalog.snapshot();
        catalog.reload(sample_postings());

        assert!(before.is_empty());
        assert_eq!(catalog.snapshot().len(), 4);

        let expr = Expr::term("rust");
        assert_eq!(catalog.filter(&expr).len(), 1);
    }

    #[test]
    fn test_catalog_concurrent_readers() {
        let catalog = Arc::new(Catalog::new(TagExtractor::from_config(&Config::default())));
        catalog.reload(sample_postings());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || catalog.filter(&Expr::term("python")).len())
            })
            .collect();
        catalog.reload(sample_postings());

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
    }
}
