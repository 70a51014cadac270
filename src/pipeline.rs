use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::acquire;
use crate::artifact::DataIngestionArtifact;
use crate::config::DataIngestionConfig;
use crate::data::loader::{load_file, locate_single_file};
use crate::data::split::StratifiedShuffleSplit;
use crate::data::strata::income_categories;
use crate::data::writer::write_csv;
use crate::error::{Result, Stage, StageExt};
use crate::events::{IngestionEvent, IngestionObserver, LogObserver};
use crate::extract;

pub const SUCCESS_MESSAGE: &str = "Data ingestion completed successfully.";

// ---------------------------------------------------------------------------
// DataIngestion – acquire → extract → partition
// ---------------------------------------------------------------------------

/// Runs the ingestion stage for one configuration.
///
/// Each step returns an [`IngestionError`](crate::IngestionError) tagged with
/// the stage it failed in; nothing is retried or cleaned up.
pub struct DataIngestion<O = LogObserver> {
    config: DataIngestionConfig,
    observer: O,
}

impl DataIngestion<LogObserver> {
    pub fn new(config: DataIngestionConfig) -> Result<Self> {
        Self::with_observer(config, LogObserver)
    }
}

impl<O: IngestionObserver> DataIngestion<O> {
    pub fn with_observer(config: DataIngestionConfig, observer: O) -> Result<Self> {
        config.validate().at_stage(Stage::Config)?;
        Ok(Self { config, observer })
    }

    pub fn config(&self) -> &DataIngestionConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Full run. The first failing step ends the run and its error is
    /// returned as is.
    pub fn initiate_data_ingestion(&self) -> Result<DataIngestionArtifact> {
        self.observer.on_event(&IngestionEvent::RunStarted);

        let result = self.run();
        match &result {
            Ok(artifact) => self
                .observer
                .on_event(&IngestionEvent::RunCompleted { artifact }),
            Err(error) => self.observer.on_event(&IngestionEvent::RunFailed { error }),
        }
        result
    }

    fn run(&self) -> Result<DataIngestionArtifact> {
        let tgz_file_path = self.download_housing_data()?;
        self.extract_tgz_file(&tgz_file_path)?;
        self.split_data_as_train_test()
    }

    /// Fetch the archive into `tgz_download_dir` and return its path.
    pub fn download_housing_data(&self) -> Result<PathBuf> {
        let path = acquire::download(
            &self.config.dataset_download_url,
            &self.config.tgz_download_dir,
        )
        .at_stage(Stage::Download)?;
        self.observer
            .on_event(&IngestionEvent::Downloaded { archive: &path });
        Ok(path)
    }

    /// Unpack the archive into `raw_data_dir`.
    pub fn extract_tgz_file(&self, tgz_file_path: &Path) -> Result<()> {
        extract::extract_archive(tgz_file_path, &self.config.raw_data_dir)
            .at_stage(Stage::Extract)?;
        self.observer.on_event(&IngestionEvent::Extracted {
            raw_data_dir: &self.config.raw_data_dir,
        });
        Ok(())
    }

    /// Load the extracted table, split it by income category and write the
    /// train and test CSVs.
    pub fn split_data_as_train_test(&self) -> Result<DataIngestionArtifact> {
        self.partition().at_stage(Stage::Split)
    }

    fn partition(&self) -> anyhow::Result<DataIngestionArtifact> {
        let split_config = &self.config.split;

        let raw_file = locate_single_file(&self.config.raw_data_dir)?;
        let file_name = output_file_name(&raw_file)?;

        log::info!("Reading file [{}]", raw_file.display());
        let table =
            load_file(&raw_file).with_context(|| format!("loading {}", raw_file.display()))?;
        self.observer.on_event(&IngestionEvent::Loaded {
            path: &raw_file,
            rows: table.len(),
            columns: table.columns.len(),
        });

        let incomes = table.numeric_column(&split_config.stratify_column)?;
        let categories = income_categories(&incomes);

        let split = StratifiedShuffleSplit::new(split_config.test_size, split_config.random_state)
            .split(&categories)
            .context("stratified split")?;
        self.observer.on_event(&IngestionEvent::Split {
            train_rows: split.train_indices.len(),
            test_rows: split.test_indices.len(),
            strata: &split.strata,
        });

        let train_set = table.take(&split.train_indices);
        let test_set = table.take(&split.test_indices);

        let train_file_path = self.config.ingested_train_dir.join(&file_name);
        let test_file_path = self.config.ingested_test_dir.join(&file_name);

        for (subset, path) in [(&train_set, &train_file_path), (&test_set, &test_file_path)] {
            write_csv(subset, path)?;
            self.observer.on_event(&IngestionEvent::Written {
                path,
                rows: subset.len(),
            });
        }

        Ok(DataIngestionArtifact {
            train_file_path,
            test_file_path,
            is_ingested: true,
            message: SUCCESS_MESSAGE.to_string(),
        })
    }
}

/// Outputs keep the raw file's name; Parquet inputs are written as `.csv`.
fn output_file_name(raw_file: &Path) -> anyhow::Result<String> {
    let name = raw_file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", raw_file.display()))?;

    let path = Path::new(name);
    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));

    if is_parquet {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
        Ok(format!("{stem}.csv"))
    } else {
        Ok(name.to_string())
    }
}
