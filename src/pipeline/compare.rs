// src/pipeline/compare.rs

//! Snapshot comparison pipeline.

use std::path::Path;

use crate::error::Result;
use crate::models::SnapshotSide;
use crate::pipeline::{DiffCalculator, Snapshot};
use crate::storage::{ComparisonOutput, SnapshotStorage};
use crate::utils::log;

/// Compare two snapshots and write the report to `output`.
///
/// `log_file` is only mentioned in the closing summary; the caller routes
/// log output there.
pub async fn run_compare(
    storage: &dyn SnapshotStorage,
    original: &str,
    updated: &str,
    output: &str,
    log_file: Option<&Path>,
) -> Result<ComparisonOutput> {
    log::header("HN Job Posting Comparison");

    // The two snapshots are independent; read them concurrently.
    let (original_entries, updated_entries) =
        tokio::try_join!(storage.load_entries(original), storage.load_entries(updated))?;

    let original_snapshot = Snapshot::from_entries(&original_entries, SnapshotSide::Original);
    let updated_snapshot = Snapshot::from_entries(&updated_entries, SnapshotSide::Updated);

    let report = DiffCalculator::new().calculate(&original_snapshot, &updated_snapshot);
    let comparison = ComparisonOutput::new(report, original, updated);
    let written = storage.write_comparison(output, &comparison).await?;

    let summary = &comparison.summary;
    log::separator();
    log::summary(
        "Comparison",
        &[
            ("Original entries", summary.total_original.to_string()),
            ("Updated entries", summary.total_updated.to_string()),
            ("New entries", summary.new_entries.to_string()),
            ("Updated entries (changed)", summary.updated_entries.to_string()),
            ("Unchanged", summary.unchanged_entries.to_string()),
            (
                "Skipped (original)",
                summary.skipped_original.total().to_string(),
            ),
            (
                "Skipped (updated)",
                summary.skipped_updated.total().to_string(),
            ),
        ],
    );
    log::sub_item(&format!("Results saved to: {}", written.location));
    log::sub_item(&format!("Compared at: {}", written.timestamp.to_rfc3339()));
    if let Some(path) = log_file {
        log::sub_item(&format!("Log saved to: {}", path.display()));
    }

    Ok(comparison)
}
