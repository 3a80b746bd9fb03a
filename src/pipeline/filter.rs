// src/pipeline/filter.rs

//! Dataset filtering and tag statistics pipelines.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, Posting, SnapshotSide};
use crate::pipeline::{Catalog, PostingIndex, Snapshot, TagExtractor};
use crate::query::QueryEngine;
use crate::storage::SnapshotStorage;
use crate::utils::log;
use crate::utils::text::headline;

const HEADLINE_CHARS: usize = 80;

async fn load_index(
    config: &Config,
    storage: &dyn SnapshotStorage,
    dataset: &str,
) -> Result<Arc<PostingIndex>> {
    let entries = storage.load_entries(dataset).await?;
    let snapshot = Snapshot::from_entries(&entries, SnapshotSide::Dataset);

    let catalog = Catalog::new(TagExtractor::from_config(config));
    Ok(catalog.reload(snapshot.postings))
}

/// Filter a dataset by a tech-stack query.
///
/// Matching postings keep their dataset order. When `output` is given they
/// are also written there as a JSON array.
pub async fn run_filter(
    config: &Config,
    storage: &dyn SnapshotStorage,
    dataset: &str,
    query: &str,
    output: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<Posting>> {
    let engine = QueryEngine::new(config);
    let expr = engine.compile(query)?;
    log::header(&format!("Filter: {expr}"));

    let index = load_index(config, storage, dataset).await?;
    let matches: Vec<Posting> = index.filter(&expr).into_iter().cloned().collect();

    for posting in matches.iter().take(limit.unwrap_or(usize::MAX)) {
        let author = posting.by().unwrap_or("-");
        let when = posting
            .posted_at()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        log::sub_item(&format!(
            "#{} {} {} | {}",
            posting.id,
            when,
            author,
            headline(&posting.text, HEADLINE_CHARS)
        ));
    }

    if let Some(key) = output {
        storage.write_postings(key, &matches).await?;
    }

    log::summary(
        "Filter",
        &[
            ("Query", expr.to_string()),
            ("Postings", index.len().to_string()),
            ("Matched", matches.len().to_string()),
        ],
    );

    Ok(matches)
}

/// Count tag frequency across a dataset, most frequent first.
pub async fn run_tags(
    config: &Config,
    storage: &dyn SnapshotStorage,
    dataset: &str,
    top: Option<usize>,
) -> Result<Vec<(String, usize)>> {
    log::header("Tag frequency");

    let index = load_index(config, storage, dataset).await?;
    let mut counts = index.tag_counts();
    if let Some(top) = top {
        counts.truncate(top);
    }

    for (tag, count) in &counts {
        log::sub_item(&format!("{count:>6}  {tag}"));
    }
    log::summary(
        "Tags",
        &[
            ("Postings", index.len().to_string()),
            ("Distinct tags", index.tag_counts().len().to_string()),
        ],
    );

    Ok(counts)
}
