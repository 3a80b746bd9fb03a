// src/models/mod.rs

//! Domain models for the jobstack application.
//!
//! This module contains the data structures shared by the query engine,
//! the diff engine and the CLI.

mod config;
mod posting;
mod tag_set;
mod vocabulary;

// Re-export all public types
pub use config::{Config, LoggingConfig, MatchingConfig, OutputConfig, QueryConfig};
pub use posting::{MalformedRecord, Posting, SnapshotSide};
pub use tag_set::TagSet;
pub use vocabulary::{Technology, Vocabulary};
