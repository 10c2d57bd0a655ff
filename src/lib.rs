//! Macroeconomic panel pipeline: raw country-by-year CSV in, cleaned and
//! enriched tables, per-country and global summaries, PNG charts and an HTML
//! dashboard out. Every stage reads its input file fresh and writes its
//! output before the next stage runs.

pub mod charts;
pub mod clean;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod features;
pub mod global;
pub mod iso;
pub mod models;
pub mod partition;
pub mod stats;
pub mod storage;
pub mod summary;
pub mod trends;

pub use error::{PipelineError, Result};
