//! Field-level helpers shared by the cleaning passes.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Extract the manga slug from a catalog URL.
/// Expected format: .../manga/<id>/...
pub fn manga_id_from_url(url: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"/manga/([^/]+)/").unwrap());
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
/// "one-punch MAN" -> "One-Punch Man", "3d kanojo" -> "3D Kanojo".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Remove one leading and one trailing `"` if present.
pub fn strip_outer_quotes(s: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"^"|"$"#).unwrap());
    re.replace_all(s, "").into_owned()
}

pub fn parse_year(raw: &str) -> Option<i64> {
    let val = raw.trim();
    if let Ok(year) = val.parse::<i64>() {
        return Some(year);
    }
    let f = parse_float(val)?;
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

pub fn parse_rating(raw: &str) -> Option<f64> {
    parse_float(raw.trim())
}

fn parse_float(val: &str) -> Option<f64> {
    val.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Lenient timestamp parsing; offsets are normalized to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let val = raw.trim();
    if val.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(val) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(val, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(val, fmt) {
            return Some(dt.naive_utc());
        }
    }
    NaiveDate::parse_from_str(val, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
