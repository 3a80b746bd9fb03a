//! Local filesystem storage implementation.
//!
//! Keys are paths relative to the storage root; absolute paths are used
//! as-is. Writes go to a temporary sibling first and are renamed into place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Posting;
use crate::storage::{ComparisonOutput, SnapshotStorage, WriteMetadata};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    pretty: bool,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            pretty: true,
        }
    }

    /// Toggle pretty-printed JSON output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<PathBuf> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        self.write_bytes(key, &bytes).await
    }
}

#[async_trait]
impl SnapshotStorage for LocalStorage {
    async fn load_entries(&self, key: &str) -> Result<Vec<Value>> {
        let path = self.path(key);
        log::info!("Loading JSON file: {}", path.display());

        let bytes = tokio::fs::read(&path).await?;
        let entries = match serde_json::from_slice::<Value>(&bytes)? {
            Value::Array(entries) => entries,
            other => {
                let kind = match other {
                    Value::Null => "null",
                    Value::Bool(_) => "boolean",
                    Value::Number(_) => "number",
                    Value::String(_) => "string",
                    Value::Object(_) => "object",
                    Value::Array(_) => "array",
                };
                return Err(AppError::snapshot(
                    path.display().to_string(),
                    format!("expected a JSON array, got {kind}"),
                ));
            }
        };

        log::info!("Loaded {} entries from {}", entries.len(), path.display());
        Ok(entries)
    }

    async fn write_comparison(
        &self,
        key: &str,
        output: &ComparisonOutput,
    ) -> Result<WriteMetadata> {
        let path = self.write_json(key, output).await?;
        log::info!("Results saved to {}", path.display());

        Ok(WriteMetadata {
            location: path.display().to_string(),
            count: output.change_count(),
            timestamp: output.comparison_date,
        })
    }

    async fn write_postings(&self, key: &str, postings: &[Posting]) -> Result<WriteMetadata> {
        let path = self.write_json(key, postings).await?;
        log::info!("{} postings written to {}", postings.len(), path.display());

        Ok(WriteMetadata {
            location: path.display().to_string(),
            count: postings.len(),
            timestamp: Utc::now(),
        })
    }
}
