use anyhow::Result;
use manga_pipeline::{load, PipelineConfig, PipelineError};
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let config = PipelineConfig::load()?;
    info!(settings_loaded = ?config, msg = "Starting manga loader");

    println!("Manga SQLite Loader");
    println!("===================\n");
    println!("Database: {:?}\n", config.db_path);

    let summary = match load::run(&config) {
        Ok(summary) => summary,
        Err(PipelineError::MissingInput { path }) => {
            println!("File {} not found. Run the cleaner first.", path.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    summary.print();

    println!("\nDone.");
    Ok(())
}
