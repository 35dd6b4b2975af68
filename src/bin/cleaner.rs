use anyhow::Result;
use manga_pipeline::{clean, PipelineConfig, PipelineError};
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
    info!(settings_loaded = ?config, msg = "Starting manga cleaner");

    println!("Manga Data Cleaning");
    println!("===================\n");

    let outcome = match clean::run(&config) {
        Ok(outcome) => outcome,
        Err(PipelineError::MissingInput { path }) => {
            println!("File {} not found", path.display());
            println!("  Run the scraper first to produce it.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    outcome.stats.print_loaded();
    outcome.stats.print_descriptions();
    outcome.stats.print_summary();
    println!(
        "\nWrote {:?} and {:?}",
        config.output_json_path, config.output_csv_path
    );

    println!("\nDone.");
    Ok(())
}
