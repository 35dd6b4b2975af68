//! Cleaner stage: raw scraped records -> cleaned collection.
//!
//! Passes, in order:
//!   1. dedup by url (first occurrence wins)
//!   2. normalize fields (fill, trim, title-case, de-quote, repair, parse, derive)
//!   3. drop rows with an empty title
//!   4. drop rows outside the required url prefix
//!   5. stats over the survivors (reported, not persisted)

use itertools::Itertools;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::export;
use crate::record::{CleanedRecord, RawField, RawRecord};
use crate::repair::repair_truncated;
use crate::stats::CleanStats;
use crate::utils::{
    manga_id_from_url, parse_rating, parse_timestamp, parse_year, strip_outer_quotes, title_case,
};

/// Filled in when a scraped record has no rating at all.
const MISSING_RATING: &str = "0.0";

#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub records: Vec<CleanedRecord>,
    pub stats: CleanStats,
}

/// Read the raw collection, clean it, and write both exports.
/// Nothing is written unless every pass succeeded.
pub fn run(config: &PipelineConfig) -> Result<CleanOutcome> {
    info!(input = ?config.input_path, prefix = %config.required_url_prefix, "Starting cleaner");
    let raw: Vec<RawRecord> = export::read_json(&config.input_path)?;
    let outcome = clean_records(raw, &config.required_url_prefix);

    export::write_json(&config.output_json_path, &outcome.records)?;
    export::write_csv(&config.output_csv_path, &outcome.records)?;
    info!(
        json = ?config.output_json_path,
        csv = ?config.output_csv_path,
        records = outcome.records.len(),
        "Cleaned collection written"
    );
    Ok(outcome)
}

pub fn clean_records(raw: Vec<RawRecord>, url_prefix: &str) -> CleanOutcome {
    let mut stats = CleanStats {
        loaded: raw.len(),
        ..CleanStats::default()
    };

    let unique = dedup_by_url(raw);
    stats.duplicates_removed = stats.loaded - unique.len();

    let mut records = Vec::with_capacity(unique.len());
    for rec in unique.into_iter().map(normalize) {
        if rec.title.is_empty() {
            debug!(url = %rec.url, "dropping record with empty title");
            stats.dropped_empty_title += 1;
            continue;
        }
        records.push(rec);
    }

    records.retain(|rec| {
        let keep = rec.url.starts_with(url_prefix);
        if !keep {
            debug!(url = %rec.url, "dropping record outside url prefix");
            stats.dropped_url_prefix += 1;
        }
        keep
    });

    stats.summarize(&records);
    CleanOutcome { records, stats }
}

/// Keep the first record seen for each url. Records without a url share
/// one key, so only the first of them survives.
pub fn dedup_by_url(raw: Vec<RawRecord>) -> Vec<RawRecord> {
    raw.into_iter().unique_by(RawRecord::url_text).collect()
}

/// Field-level cleaning of one record. Never fails: unparseable values
/// become null (or empty for text fields).
pub fn normalize(raw: RawRecord) -> CleanedRecord {
    let title = text_field(raw.title.as_ref())
        .map(|t| title_case(t.trim()))
        .unwrap_or_default();

    let description = text_field(raw.description.as_ref())
        .map(|d| repair_truncated(&strip_outer_quotes(d.trim())))
        .unwrap_or_default();

    let year = raw
        .year
        .as_ref()
        .map(RawField::to_text)
        .and_then(|y| parse_year(&y));

    let rating = match raw.rating.as_ref() {
        Some(r) => parse_rating(&r.to_text()),
        None => parse_rating(MISSING_RATING),
    };

    let cover_url = raw.cover_url.as_ref().map(RawField::to_text).unwrap_or_default();
    let url = raw.url.as_ref().map(RawField::to_text).unwrap_or_default();
    let scraped_at = raw
        .scraped_at
        .as_ref()
        .map(RawField::to_text)
        .and_then(|s| parse_timestamp(&s));

    CleanedRecord {
        manga_id: manga_id_from_url(&url),
        title,
        description,
        year,
        rating,
        has_cover: !cover_url.is_empty(),
        cover_url,
        url,
        scraped_at,
    }
}

/// Only real strings count as text; numbers or arrays in a text
/// column are treated as missing.
fn text_field(field: Option<&RawField>) -> Option<&str> {
    field.and_then(RawField::as_text)
}
