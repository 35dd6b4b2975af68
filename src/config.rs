use std::path::{Path, PathBuf};

use ::config::{Config, Environment};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_INPUT_PATH: &str = "data/raw_manga.json";
pub const DEFAULT_OUTPUT_JSON_PATH: &str = "data/cleaned_manga.json";
pub const DEFAULT_OUTPUT_CSV_PATH: &str = "data/cleaned_manga.csv";
pub const DEFAULT_DB_PATH: &str = "data/output.db";
pub const DEFAULT_URL_PREFIX: &str = "https://remanga.org/";

const ENV_PREFIX: &str = "MANGA";

/// Paths and filters shared by both stages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_json_path: PathBuf,
    pub output_csv_path: PathBuf,
    pub db_path: PathBuf,
    /// Rows whose `url` does not start with this are dropped by the cleaner.
    pub required_url_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_json_path: PathBuf::from(DEFAULT_OUTPUT_JSON_PATH),
            output_csv_path: PathBuf::from(DEFAULT_OUTPUT_CSV_PATH),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            required_url_prefix: DEFAULT_URL_PREFIX.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with `MANGA_*` environment variables
    /// (e.g. `MANGA_DB_PATH`).
    pub fn load() -> Result<Self> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("input_path", DEFAULT_INPUT_PATH)?
            .set_default("output_json_path", DEFAULT_OUTPUT_JSON_PATH)?
            .set_default("output_csv_path", DEFAULT_OUTPUT_CSV_PATH)?
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("required_url_prefix", DEFAULT_URL_PREFIX)?
            .add_source(env)
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Same file names as the defaults, placed under `dir` instead of `data/`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        PipelineConfig {
            input_path: dir.join("raw_manga.json"),
            output_json_path: dir.join("cleaned_manga.json"),
            output_csv_path: dir.join("cleaned_manga.csv"),
            db_path: dir.join("output.db"),
            required_url_prefix: DEFAULT_URL_PREFIX.to_string(),
        }
    }
}
