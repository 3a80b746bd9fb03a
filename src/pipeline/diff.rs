//! Diff calculation between two posting snapshots.
//!
//! Every valid posting of the updated snapshot is classified against the
//! original one: **new** when its id is unknown, **updated** when its text
//! differs, **unchanged** otherwise. Unchanged postings are only counted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{MalformedRecord, Posting, SnapshotSide};
use crate::pipeline::snapshot::{SkipCounts, Snapshot};

/// Totals of a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total_original: usize,
    pub total_updated: usize,
    pub new_entries: usize,
    pub updated_entries: usize,
    pub unchanged_entries: usize,
    #[serde(default)]
    pub skipped_original: SkipCounts,
    #[serde(default)]
    pub skipped_updated: SkipCounts,
}

/// Result of comparing two snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffReport {
    /// Postings whose id is absent from the original snapshot
    pub new_entries: Vec<Posting>,
    /// Postings whose text changed
    pub updated_entries: Vec<Posting>,
    pub summary: DiffSummary,
    /// Entries excluded from the comparison, both sides
    #[serde(default)]
    pub malformed: Vec<MalformedRecord>,
}

impl DiffReport {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.new_entries.is_empty() || !self.updated_entries.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.new_entries.len() + self.updated_entries.len()
    }
}

/// Calculator for computing diffs between snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffCalculator;

impl DiffCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Calculate the diff between two validated snapshots.
    pub fn calculate(&self, original: &Snapshot, updated: &Snapshot) -> DiffReport {
        log::debug!("Building lookup from {} original entries", original.len());
        let lookup: HashMap<u64, &Posting> =
            original.postings.iter().map(|p| (p.id, p)).collect();

        let mut new_entries = Vec::new();
        let mut updated_entries = Vec::new();
        let mut unchanged = 0;

        for posting in &updated.postings {
            match lookup.get(&posting.id) {
                None => new_entries.push(posting.clone()),
                Some(previous) if previous.text != posting.text => {
                    updated_entries.push(posting.clone())
                }
                Some(_) => unchanged += 1,
            }
        }

        log::info!(
            "Comparison complete: {} new, {} updated, {} unchanged",
            new_entries.len(),
            updated_entries.len(),
            unchanged
        );

        let summary = DiffSummary {
            total_original: original.len(),
            total_updated: updated.len(),
            new_entries: new_entries.len(),
            updated_entries: updated_entries.len(),
            unchanged_entries: unchanged,
            skipped_original: original.skipped,
            skipped_updated: updated.skipped,
        };

        DiffReport {
            new_entries,
            updated_entries,
            summary,
            malformed: original
                .malformed
                .iter()
                .chain(&updated.malformed)
                .cloned()
                .collect(),
        }
    }
}

/// Convenience function to diff two raw snapshots.
pub fn calculate_diff(original: &[Value], updated: &[Value]) -> DiffReport {
    let original = Snapshot::from_entries(original, SnapshotSide::Original);
    let updated = Snapshot::from_entries(updated, SnapshotSide::Updated);
    DiffCalculator::new().calculate(&original, &updated)
}

/// Diff two lists of already-typed postings.
pub fn diff_postings(original: Vec<Posting>, updated: Vec<Posting>) -> DiffReport {
    let original = Snapshot::from_postings(original, SnapshotSide::Original);
    let updated = Snapshot::from_postings(updated, SnapshotSide::Updated);
    DiffCalculator::new().calculate(&original, &updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(id: u64, text: &str) -> Value {
        json!({
            "id": id,
            "by": "poster",
            "time": 1_700_000_000,
            "text": text,
            "type": "comment",
            "parent": 1
        })
    }

    fn ids(postings: &[Posting]) -> Vec<u64> {
        postings.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_no_changes() {
        let prev = vec![entry(1, "Title 1"), entry(2, "Title 2")];
        let curr = prev.clone();

        let result = calculate_diff(&prev, &curr);
        assert!(!result.has_changes());
        assert_eq!(result.change_count(), 0);
        assert_eq!(result.summary.unchanged_entries, 2);
    }

    #[test]
    fn test_new_and_updated() {
        let prev = vec![entry(1, "A")];
        let curr = vec![entry(1, "B"), entry(2, "C")];

        let result = calculate_diff(&prev, &curr);
        assert_eq!(ids(&result.new_entries), vec![2]);
        assert_eq!(ids(&result.updated_entries), vec![1]);
        assert_eq!(result.updated_entries[0].text, "B");
        assert_eq!(
            result.summary,
            DiffSummary {
                total_original: 1,
                total_updated: 2,
                new_entries: 1,
                updated_entries: 1,
                unchanged_entries: 0,
                ..DiffSummary::default()
            }
        );
    }

    #[test]
    fn test_order_follows_updated_input() {
        let prev = vec![entry(5, "x"), entry(6, "y")];
        let curr = vec![
            entry(9, "new 9"),
            entry(6, "y2"),
            entry(7, "new 7"),
            entry(5, "x2"),
            entry(8, "new 8"),
        ];

        let result = calculate_diff(&prev, &curr);
        assert_eq!(ids(&result.new_entries), vec![9, 7, 8]);
        assert_eq!(ids(&result.updated_entries), vec![6, 5]);
    }

    #[test]
    fn test_removed_entries_are_ignored() {
        let prev = vec![entry(1, "Keep"), entry(2, "Gone")];
        let curr = vec![entry(1, "Keep")];

        let result = calculate_diff(&prev, &curr);
        assert!(!result.has_changes());
        assert_eq!(result.summary.total_original, 2);
        assert_eq!(result.summary.unchanged_entries, 1);
    }

    #[test]
    fn test_text_comparison_is_exact() {
        let prev = vec![entry(1, "Rust")];
        let curr = vec![entry(1, "Rust ")];
        assert_eq!(calculate_diff(&prev, &curr).summary.updated_entries, 1);
    }

    #[test]
    fn test_malformed_entries_reported_not_fatal() {
        let prev = vec![entry(1, "A"), json!({"id": 2})];
        let curr = vec![
            entry(1, "A"),
            json!({"text": "orphan"}),
            json!({"id": 3, "deleted": true}),
            entry(4, "D"),
        ];

        let result = calculate_diff(&prev, &curr);
        assert_eq!(ids(&result.new_entries), vec![4]);
        assert_eq!(result.summary.unchanged_entries, 1);
        assert_eq!(result.summary.skipped_original.malformed, 1);
        assert_eq!(result.summary.skipped_updated.malformed, 1);
        assert_eq!(result.summary.skipped_updated.deleted, 1);
        assert_eq!(result.malformed.len(), 2);
        assert_eq!(result.malformed[0].side, SnapshotSide::Original);
        assert_eq!(result.malformed[1].side, SnapshotSide::Updated);
    }

    #[test]
    fn test_empty_to_full() {
        let prev: Vec<Value> = vec![];
        let curr = vec![entry(1, "First")];

        let result = calculate_diff(&prev, &curr);
        assert_eq!(result.new_entries.len(), 1);
        assert_eq!(result.summary.total_original, 0);
    }

    #[test]
    fn test_diff_postings() {
        let result = diff_postings(
            vec![Posting::new(1, "A")],
            vec![Posting::new(1, "A"), Posting::new(2, "B")],
        );
        assert_eq!(ids(&result.new_entries), vec![2]);
        assert_eq!(result.summary.unchanged_entries, 1);
    }

    #[test]
    fn test_odd_optional_fields_do_not_make_entries_malformed() {
        let prev = vec![json!({"id": 1, "text": "A"})];
        let curr = vec![
            json!({"id": 1, "text": "A", "time": "2024-01-01"}),
            json!({"id": 2, "text": "B", "by": 42}),
            json!({"id": 3, "text": "C", "parent": null}),
        ];

        let result = calculate_diff(&prev, &curr);
        assert!(result.malformed.is_empty());
        assert_eq!(result.summary.unchanged_entries, 1);
        assert_eq!(ids(&result.new_entries), vec![2, 3]);
        assert_eq!(serde_json::to_value(&result.new_entries[1]).unwrap(), curr[2]);
    }

    #[test]
    fn test_new_entries_keep_pass_through_fields() {
        let prev: Vec<Value> = vec![];
        let curr = vec![json!({"id": 1, "text": "A", "kids": [10, 11]})];

        let result = calculate_diff(&prev, &curr);
        let out = serde_json::to_value(&result.new_entries[0]).unwrap();
        assert_eq!(out, curr[0]);
    }
}
