// src/lib.rs

//! jobstack: Hacker News job posting diffs and tech-stack queries

pub mod error;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod storage;
pub mod utils;
