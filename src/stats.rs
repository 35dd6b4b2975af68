use crate::record::CleanedRecord;
use crate::repair::is_possibly_truncated;

/// Counters and aggregates gathered during one cleaner run.
/// Printed to stdout only; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanStats {
    pub loaded: usize,
    pub duplicates_removed: usize,
    pub dropped_empty_title: usize,
    pub dropped_url_prefix: usize,
    pub saved: usize,
    pub avg_description_len: Option<f64>,
    pub possibly_truncated: usize,
    pub year_range: Option<(i64, i64)>,
    pub avg_rating: Option<f64>,
    pub with_cover: usize,
}

impl CleanStats {
    /// Fill in the aggregates computed over the surviving records.
    pub fn summarize(&mut self, records: &[CleanedRecord]) {
        self.saved = records.len();
        self.avg_description_len = mean(records.iter().map(|r| r.description.chars().count() as f64));
        self.possibly_truncated = records
            .iter()
            .filter(|r| is_possibly_truncated(&r.description))
            .count();

        let years = records.iter().filter_map(|r| r.year);
        self.year_range = years.fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        });
        self.avg_rating = mean(records.iter().filter_map(|r| r.rating));
        self.with_cover = records.iter().filter(|r| r.has_cover).count();
    }

    pub fn dropped(&self) -> usize {
        self.dropped_empty_title + self.dropped_url_prefix
    }

    pub fn print_loaded(&self) {
        println!("Loaded {} raw records", self.loaded);
        println!("  duplicates removed: {}", self.duplicates_removed);
    }

    pub fn print_descriptions(&self) {
        println!("\nDescriptions:");
        println!("  average length: {} chars", fmt_opt(self.avg_description_len, 0));
        println!(
            "  possibly truncated: {} of {}",
            self.possibly_truncated, self.saved
        );
    }

    pub fn print_summary(&self) {
        println!("\nAfter cleaning:");
        println!(
            "  dropped: {} (empty title {}, foreign url {})",
            self.dropped(),
            self.dropped_empty_title,
            self.dropped_url_prefix
        );
        println!("  saved records: {}", self.saved);
        match self.year_range {
            Some((lo, hi)) => println!("  years: {} - {}", lo, hi),
            None => println!("  years: -"),
        }
        println!("  average rating: {}", fmt_opt(self.avg_rating, 2));
        println!(
            "  with cover: {} of {} ({:.1}%)",
            self.with_cover,
            self.saved,
            percent(self.with_cover, self.saved)
        );
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

fn fmt_opt(val: Option<f64>, precision: usize) -> String {
    match val {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
