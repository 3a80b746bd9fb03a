//! Validation of raw snapshot entries.
//!
//! A snapshot is the JSON array written by the collector. Before two
//! snapshots can be compared every entry is classified: deleted entries are
//! skipped first (they may lack `text`), then entries without a usable `id`
//! or `text` are recorded as malformed, then repeated ids are dropped so the
//! first occurrence wins.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{MalformedRecord, Posting, SnapshotSide};

/// How many entries of one snapshot were left out, and why.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    pub malformed: usize,
    pub duplicates: usize,
    pub deleted: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.malformed + self.duplicates + self.deleted
    }
}

/// Valid, de-duplicated postings of one snapshot, in input order.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub side: SnapshotSide,
    pub postings: Vec<Posting>,
    pub skipped: SkipCounts,
    pub malformed: Vec<MalformedRecord>,
}

impl Snapshot {
    /// Classify raw JSON entries.
    pub fn from_entries(entries: &[Value], side: SnapshotSide) -> Self {
        let mut snapshot = Self::empty(side);
        let mut seen = HashSet::new();

        for (index, entry) in entries.iter().enumerate() {
            if Posting::is_deleted(entry) {
                snapshot.skipped.deleted += 1;
                continue;
            }

            let posting = match Posting::from_value(entry) {
                Ok(posting) => posting,
                Err(reason) => {
                    let record = MalformedRecord {
                        side,
                        index,
                        id: entry.get("id").and_then(Value::as_u64),
                        reason,
                    };
                    log::warn!("Skipping {record}");
                    snapshot.skipped.malformed += 1;
                    snapshot.malformed.push(record);
                    continue;
                }
            };

            if !seen.insert(posting.id) {
                log::warn!("Duplicate id {} found in {side} at index {index}", posting.id);
                snapshot.skipped.duplicates += 1;
                continue;
            }

            snapshot.postings.push(posting);
        }

        snapshot.log_skips();
        snapshot
    }

    /// Already-typed postings; only duplicates can be skipped.
    pub fn from_postings(postings: Vec<Posting>, side: SnapshotSide) -> Self {
        let mut snapshot = Self::empty(side);
        let mut seen = HashSet::new();

        for (index, posting) in postings.into_iter().enumerate() {
            if seen.insert(posting.id) {
                snapshot.postings.push(posting);
            } else {
                log::warn!("Duplicate id {} found in {side} at index {index}", posting.id);
                snapshot.skipped.duplicates += 1;
            }
        }

        snapshot.log_skips();
        snapshot
    }

    fn empty(side: SnapshotSide) -> Self {
        Self {
            side,
            postings: Vec::new(),
            skipped: SkipCounts::default(),
            malformed: Vec::new(),
        }
    }

    fn log_skips(&self) {
        if self.skipped.malformed > 0 {
            log::warn!("Skipped {} invalid entries in {}", self.skipped.malformed, self.side);
        }
        if self.skipped.duplicates > 0 {
            log::warn!("Skipped {} duplicate entries in {}", self.skipped.duplicates, self.side);
        }
        if self.skipped.deleted > 0 {
            log::info!("Skipped {} deleted entries in {}", self.skipped.deleted, self.side);
        }
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
