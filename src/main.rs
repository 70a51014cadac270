use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use housing_ingest::{DataIngestion, DataIngestionConfig};

/// Download, extract and split the housing dataset.
#[derive(Debug, Parser)]
#[command(name = "housing-ingest", version, about)]
struct Cli {
    /// Ingestion config file (defaults to $HOUSING_INGEST_CONFIG, then ./ingest.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config =
        DataIngestionConfig::load(cli.config.as_deref()).context("loading ingestion config")?;

    let ingestion = DataIngestion::new(config)?;
    let artifact = ingestion.initiate_data_ingestion()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&artifact).context("serializing artifact")?
    );
    Ok(())
}
