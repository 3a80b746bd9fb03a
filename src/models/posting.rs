//! Job posting record as produced by the upstream collector.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single job posting (one top-level comment of a "Who is hiring?" thread).
///
/// Only `id` and `text` are interpreted. Every other field is kept verbatim,
/// whatever its type, so reports echo the full record back; the accessors
/// below read the usual HN fields when they have the expected shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Posting {
    /// Item identifier
    pub id: u64,

    /// Comment body (HTML fragment)
    pub text: String,

    /// Any other fields (`by`, `time`, `type`, `parent`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Posting {
    /// Create a posting with only the required fields set.
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            extra: Map::new(),
        }
    }

    /// Author username.
    pub fn by(&self) -> Option<&str> {
        self.extra.get("by").and_then(Value::as_str)
    }

    /// Unix timestamp of the post.
    pub fn time(&self) -> Option<i64> {
        self.extra.get("time").and_then(Value::as_i64)
    }

    /// Item type (normally "comment").
    pub fn kind(&self) -> Option<&str> {
        self.extra.get("type").and_then(Value::as_str)
    }

    /// Parent item (the monthly thread).
    pub fn parent(&self) -> Option<u64> {
        self.extra.get("parent").and_then(Value::as_u64)
    }

    /// Validate a raw JSON entry and convert it into a posting.
    ///
    /// The error is a human-readable reason; the caller attaches position
    /// and snapshot side.
    pub fn from_value(value: &Value) -> std::result::Result<Self, String> {
        let object = value
            .as_object()
            .ok_or_else(|| "entry is not an object".to_string())?;

        let id = match object.get("id") {
            None => return Err("missing 'id' field".to_string()),
            Some(id) => id
                .as_u64()
                .ok_or_else(|| format!("'id' is not an unsigned integer: {id}"))?,
        };

        match object.get("text") {
            None => return Err(format!("[id: {id}] missing 'text' field")),
            Some(Value::String(_)) => {}
            Some(_) => return Err(format!("[id: {id}] 'text' is not a string")),
        }

        serde_json::from_value(value.clone()).map_err(|e| format!("[id: {id}] {e}"))
    }

    /// Whether a raw entry is flagged as deleted upstream.
    pub fn is_deleted(value: &Value) -> bool {
        value.get("deleted").and_then(Value::as_bool) == Some(true)
    }

    /// Posting time as a UTC timestamp.
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.time().and_then(|t| DateTime::from_timestamp(t, 0))
    }
}

/// Which snapshot a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSide {
    Original,
    Updated,
    /// A dataset loaded for filtering rather than comparison
    Dataset,
}

impl fmt::Display for SnapshotSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSide::Original => write!(f, "original"),
            SnapshotSide::Updated => write!(f, "updated"),
            SnapshotSide::Dataset => write!(f, "dataset"),
        }
    }
}

/// A record that could not take part in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRecord {
    /// Snapshot the record was read from
    pub side: SnapshotSide,

    /// Position of the record in its snapshot array
    pub index: usize,

    /// Identifier, when one could be read
    pub id: Option<u64>,

    /// Why the record was rejected
    pub reason: String,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entry at index {} in {}: {}",
            self.index, self.side, self.reason
        )
    }
}
