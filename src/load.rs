//! Loader stage: cleaned JSON -> `manga` table.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::db;
use crate::error::Result;
use crate::export;
use crate::record::CleanedRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records upserted in this run.
    pub upserted: usize,
    /// Records without a manga_id; there is no key to upsert them by.
    pub skipped_no_id: usize,
    /// Rows in the table after the load.
    pub table_rows: usize,
}

impl LoadSummary {
    pub fn print(&self) {
        println!("Records written to SQLite: {}", self.upserted);
        if self.skipped_no_id > 0 {
            println!("Skipped (no manga_id): {}", self.skipped_no_id);
        }
        println!("Rows in table: {}", self.table_rows);
    }
}

pub fn run(config: &PipelineConfig) -> Result<LoadSummary> {
    info!(input = ?config.output_json_path, db = ?config.db_path, "Starting loader");
    let records: Vec<CleanedRecord> = export::read_json(&config.output_json_path)?;

    let conn = db::connect(&config.db_path)?;
    db::create_table(&conn)?;

    let (keyed, unkeyed): (Vec<&CleanedRecord>, Vec<&CleanedRecord>) =
        records.iter().partition(|r| r.manga_id.is_some());
    for rec in &unkeyed {
        warn!(url = %rec.url, "skipping record without manga_id");
    }

    let pb = progress_bar(keyed.len());
    let upserted = db::upsert_all(&conn, &keyed, || pb.inc(1))?;
    pb.finish_and_clear();

    let summary = LoadSummary {
        upserted,
        skipped_no_id: unkeyed.len(),
        table_rows: db::count_rows(&conn)?,
    };
    info!(?summary, "Load finished");
    Ok(summary)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}
