use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A single scraped value. Scrapers are not consistent about types
/// (`"2019"` vs `2019`), so anything JSON can hold is accepted here and
/// narrowed during cleaning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Text(String),
    Number(Number),
    Other(Value),
}

impl RawField {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawField::Text(s) => Some(s),
            _ => None,
        }
    }

    /// String form used for fields that are compared or parsed as text.
    pub fn to_text(&self) -> String {
        match self {
            RawField::Text(s) => s.clone(),
            RawField::Number(n) => n.to_string(),
            RawField::Other(Value::Bool(b)) => b.to_string(),
            RawField::Other(_) => String::new(),
        }
    }
}

impl From<&str> for RawField {
    fn from(s: &str) -> Self {
        RawField::Text(s.to_string())
    }
}

/// Scraper output row. Every field may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub title: Option<RawField>,
    pub description: Option<RawField>,
    pub year: Option<RawField>,
    pub rating: Option<RawField>,
    pub cover_url: Option<RawField>,
    pub url: Option<RawField>,
    pub scraped_at: Option<RawField>,
}

impl RawRecord {
    pub fn url_text(&self) -> Option<String> {
        self.url.as_ref().map(RawField::to_text)
    }
}

/// Output of the cleaner, input of the loader. Field order is the
/// column order of the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub manga_id: Option<String>,
    pub title: String,
    pub description: String,
    pub year: Option<i64>,
    pub rating: Option<f64>,
    pub has_cover: bool,
    pub cover_url: String,
    pub url: String,
    #[serde(with = "timestamp", default)]
    pub scraped_at: Option<NaiveDateTime>,
}

impl CleanedRecord {
    pub const COLUMNS: [&'static str; 9] = [
        "manga_id",
        "title",
        "description",
        "year",
        "rating",
        "has_cover",
        "cover_url",
        "url",
        "scraped_at",
    ];
}

pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::utils::parse_timestamp;

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

    pub fn format(ts: &NaiveDateTime) -> String {
        ts.format(FORMAT).to_string()
    }

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_some(&format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn raw_record_accepts_mixed_types_and_missing_keys() {
        let json = r#"{"title": "Solo", "year": 2019, "rating": "9.1", "url": null, "extra": [1]}"#;
        let rec: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.title, Some(RawField::from("Solo")));
        assert_eq!(rec.year.as_ref().map(RawField::to_text).as_deref(), Some("2019"));
        assert_eq!(rec.rating, Some(RawField::from("9.1")));
        assert_eq!(rec.url, None);
        assert_eq!(rec.description, None);
    }

    #[test]
    fn non_string_field_has_no_text_view() {
        let rec: RawRecord = serde_json::from_str(r#"{"title": 42, "cover_url": ["a"]}"#).unwrap();
        assert_eq!(rec.title.as_ref().and_then(RawField::as_text), None);
        assert_eq!(rec.cover_url.as_ref().map(RawField::to_text).as_deref(), Some(""));
    }

    #[test]
    fn cleaned_record_timestamp_text_form() {
        let rec = CleanedRecord {
            manga_id: Some("abc".into()),
            title: "Abc".into(),
            description: String::new(),
            year: Some(2020),
            rating: None,
            has_cover: false,
            cover_url: String::new(),
            url: "https://remanga.org/manga/abc/".into(),
            scraped_at: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["scraped_at"], "2024-01-15 10:30:00");
        assert_eq!(json["rating"], Value::Null);

        let back: CleanedRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, rec);
    }
}
