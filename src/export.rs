use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::record::CleanedRecord;

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))
        }
        _ => Ok(()),
    }
}

/// Indented JSON array, UTF-8, non-ASCII kept as-is.
pub fn write_json(path: &Path, records: &[CleanedRecord]) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).map_err(|e| PipelineError::json(path, e))?;
    writer.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

/// CSV with a header row; nulls are written as empty cells.
pub fn write_csv(path: &Path, records: &[CleanedRecord]) -> Result<()> {
    ensure_parent(path)?;
    let csv_err = |source| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;
    // explicit header so an empty collection still gets one
    writer.write_record(CleanedRecord::COLUMNS).map_err(csv_err)?;
    for rec in records {
        writer.serialize(rec).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(PipelineError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| PipelineError::json(path, e))
}
