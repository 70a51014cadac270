// Configuration for one ingestion run.
//
// Lookup order:
// 1. Explicit path (CLI --config)
// 2. Path from HOUSING_INGEST_CONFIG
// 3. ./ingest.toml
//
// HOUSING_INGEST_DOWNLOAD_URL overrides the download URL after loading.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_ENV: &str = "HOUSING_INGEST_CONFIG";
pub const DOWNLOAD_URL_ENV: &str = "HOUSING_INGEST_DOWNLOAD_URL";
pub const DEFAULT_CONFIG_FILE: &str = "./ingest.toml";

/// Immutable description of where data comes from and where each stage
/// writes its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataIngestionConfig {
    pub dataset_download_url: String,
    pub tgz_download_dir: PathBuf,
    pub raw_data_dir: PathBuf,
    pub ingested_train_dir: PathBuf,
    pub ingested_test_dir: PathBuf,
    #[serde(default)]
    pub split: SplitConfig,
}

/// Stratified split settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Continuous column the income category is derived from.
    pub stratify_column: String,
    /// Fraction of rows that go to the test set.
    pub test_size: f64,
    /// Seed for the shuffle; fixed so reruns give the same partition.
    pub random_state: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            stratify_column: "median_income".to_string(),
            test_size: 0.2,
            random_state: 42,
        }
    }
}

impl DataIngestionConfig {
    /// Build a config with the default split settings.
    pub fn new(
        dataset_download_url: impl Into<String>,
        tgz_download_dir: impl Into<PathBuf>,
        raw_data_dir: impl Into<PathBuf>,
        ingested_train_dir: impl Into<PathBuf>,
        ingested_test_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dataset_download_url: dataset_download_url.into(),
            tgz_download_dir: tgz_download_dir.into(),
            raw_data_dir: raw_data_dir.into(),
            ingested_train_dir: ingested_train_dir.into(),
            ingested_test_dir: ingested_test_dir.into(),
            split: SplitConfig::default(),
        }
    }

    pub fn with_split(mut self, split: SplitConfig) -> Self {
        self.split = split;
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse ingestion config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a specific config file.
    pub fn from_file_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config file (explicit path, env var, default file), then
    /// apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match env::var(CONFIG_PATH_ENV) {
                Ok(p) => PathBuf::from(p),
                Err(_) => PathBuf::from(DEFAULT_CONFIG_FILE),
            },
        };
        if !path.exists() {
            bail!(
                "No ingestion config found at {} (set {CONFIG_PATH_ENV} or pass --config)",
                path.display()
            );
        }

        let mut config = Self::from_file_path(&path)?;
        if let Ok(url) = env::var(DOWNLOAD_URL_ENV) {
            log::debug!("Download URL overridden by {DOWNLOAD_URL_ENV}");
            config.dataset_download_url = url;
            config.validate()?;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dataset_download_url.trim().is_empty() {
            bail!("dataset_download_url must not be empty");
        }
        for (name, dir) in [
            ("tgz_download_dir", &self.tgz_download_dir),
            ("raw_data_dir", &self.raw_data_dir),
            ("ingested_train_dir", &self.ingested_train_dir),
            ("ingested_test_dir", &self.ingested_test_dir),
        ] {
            if dir.as_os_str().is_empty() {
                bail!("{name} must not be empty");
            }
        }
        self.split.validate()
    }
}

impl SplitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.stratify_column.is_empty() {
            bail!("split.stratify_column must not be empty");
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            bail!("split.test_size must be in (0, 1), got {}", self.test_size);
        }
        Ok(())
    }
}
