//! Manga catalog pipeline.
//!
//! Two stages, each run as its own binary:
//!   1. cleaner: raw scraped JSON -> deduplicated, normalized JSON + CSV
//!   2. loader:  cleaned JSON -> `manga` table in SQLite (upsert by manga_id)
//!
//! The stages only share the cleaned JSON file on disk.

pub mod clean;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod load;
pub mod record;
pub mod repair;
pub mod stats;
pub mod utils;

pub use crate::config::PipelineConfig;
pub use crate::error::{PipelineError, Result};
pub use crate::record::{CleanedRecord, RawField, RawRecord};
