//! Tag extraction: which known technologies a posting mentions.
//!
//! Matching is case-insensitive and boundary-aware. A name only counts when
//! the characters around it do not continue a word:
//!
//! - alphanumerics and sticky symbols (`+`, `#`) always continue a word, so
//!   `C` is not found inside `C++`, `C#` or `Clojure`;
//! - joiner symbols (`.`, `-`) continue a word only when an alphanumeric sits
//!   on their far side, so `js` is not found inside `Node.js` but `Python.`
//!   at the end of a sentence still yields `Python`.

use crate::models::{Config, MatchingConfig, TagSet, Vocabulary};
use crate::utils::text::{collapse_whitespace, html_to_text};

/// Extracts normalized tag sets from posting text.
#[derive(Debug, Clone)]
pub struct TagExtractor {
    /// (surface form, canonical name), longest surface form first
    patterns: Vec<(String, String)>,
    sticky: Vec<char>,
    joiners: Vec<char>,
    strip_html: bool,
}

impl TagExtractor {
    pub fn new(vocabulary: &Vocabulary, matching: &MatchingConfig) -> Self {
        let mut patterns: Vec<(String, String)> = vocabulary.alias_map().into_iter().collect();
        patterns.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self {
            patterns,
            sticky: matching.sticky_symbols.chars().collect(),
            joiners: matching.joiner_symbols.chars().collect(),
            strip_html: matching.strip_html,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.vocabulary, &config.matching)
    }

    /// Every canonical name whose name or alias occurs in `text`.
    ///
    /// Names are tested independently; `C` and `C++` may both be present.
    pub fn extract(&self, text: &str) -> TagSet {
        let plain = if self.strip_html {
            html_to_text(text)
        } else {
            collapse_whitespace(text)
        };
        let haystack = plain.to_lowercase();

        let mut tags = TagSet::new();
        for (form, canonical) in &self.patterns {
            if tags.contains(canonical) {
                continue;
            }
            if self.occurs(&haystack, form) {
                tags.insert(canonical);
            }
        }
        tags
    }

    fn occurs(&self, haystack: &str, needle: &str) -> bool {
        haystack.match_indices(needle).any(|(start, matched)| {
            let end = start + matched.len();
            !self.continues_word(haystack[..start].chars().rev())
                && !self.continues_word(haystack[end..].chars())
        })
    }

    /// Whether the characters walking away from a match extend the word.
    fn continues_word(&self, mut outward: impl Iterator<Item = char>) -> bool {
        match outward.next() {
            None => false,
            Some(c) if c.is_alphanumeric() || self.sticky.contains(&c) => true,
            Some(c) if self.joiners.contains(&c) => outward.next().is_some_and(char::is_alphanumeric),
            Some(_) => false,
        }
    }
}

/// Extract tags with the default boundary rules.
pub fn extract_tags(text: &str, vocabulary: &Vocabulary) -> TagSet {
    TagExtractor::new(vocabulary, &MatchingConfig::default()).extract(text)
}
