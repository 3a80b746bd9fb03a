//! Storage abstractions for posting snapshots and reports.
//!
//! Snapshots are JSON arrays of posting records written by the collector.
//! Reports are JSON documents produced by this crate.
//!
//! ## Layout
//!
//! ```text
//! {root}/
//! ├── config.toml              # Vocabulary and matching rules
//! ├── jobs_2025-01.json        # Snapshot (array of postings)
//! ├── jobs_2025-02.json
//! └── updated_entries.json     # Comparison report
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::{MalformedRecord, Posting};
use crate::pipeline::{DiffReport, DiffSummary};

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about a storage write operation.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Where the document was written
    pub location: String,
    /// Number of postings in the document
    pub count: usize,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// Comparison report as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    /// RFC 3339 timestamp of the comparison
    pub comparison_date: DateTime<Utc>,
    pub original_file: String,
    pub updated_file: String,
    pub summary: DiffSummary,
    pub new_entries: Vec<Posting>,
    pub updated_entries: Vec<Posting>,
    #[serde(default)]
    pub malformed: Vec<MalformedRecord>,
}

impl ComparisonOutput {
    pub fn new(report: DiffReport, original_file: &str, updated_file: &str) -> Self {
        Self {
            comparison_date: Utc::now(),
            original_file: original_file.to_string(),
            updated_file: updated_file.to_string(),
            summary: report.summary,
            new_entries: report.new_entries,
            updated_entries: report.updated_entries,
            malformed: report.malformed,
        }
    }

    pub fn change_count(&self) -> usize {
        self.new_entries.len() + self.updated_entries.len()
    }
}

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Load the raw entries of a snapshot. The document must be a JSON array.
    async fn load_entries(&self, key: &str) -> Result<Vec<Value>>;

    /// Write a comparison report.
    async fn write_comparison(&self, key: &str, output: &ComparisonOutput)
    -> Result<WriteMetadata>;

    /// Write a list of postings (e.g. a filtered subset) as a snapshot.
    async fn write_postings(&self, key: &str, postings: &[Posting]) -> Result<WriteMetadata>;
}
