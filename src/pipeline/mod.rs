//! Pipeline entry points and the engines behind them.
//!
//! - `run_compare`: Diff two posting snapshots and write a report
//! - `run_filter`: Select the postings matching a tech-stack query
//! - `run_tags`: Count how often each technology is mentioned

pub mod compare;
pub mod diff;
pub mod filter;
pub mod index;
pub mod snapshot;
pub mod tags;

pub use compare::run_compare;
pub use diff::{DiffCalculator, DiffReport, DiffSummary, calculate_diff, diff_postings};
pub use filter::{run_filter, run_tags};
pub use index::{Catalog, PostingIndex};
pub use snapshot::{SkipCounts, Snapshot};
pub use tags::{TagExtractor, extract_tags};
