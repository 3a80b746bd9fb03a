//! Normalized set of technology names detected in a posting.

use std::collections::HashSet;
use std::collections::hash_set;

use serde::{Deserialize, Serialize};

use crate::models::Vocabulary;

/// Set of normalized (case-folded, trimmed) technology names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet(HashSet<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name, normalizing it first.
    pub fn insert(&mut self, name: &str) -> bool {
        self.0.insert(Vocabulary::normalize(name))
    }

    /// Membership test for an already-normalized name.
    pub fn contains(&self, normalized: &str) -> bool {
        self.0.contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, String> {
        self.0.iter()
    }

    /// Tags in alphabetical order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.0.iter().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl<'a> FromIterator<&'a str> for TagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a String;
    type IntoIter = hash_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
