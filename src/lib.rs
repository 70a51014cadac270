//! Data-ingestion stage of the housing price pipeline.
//!
//! Downloads the housing archive, unpacks it, and writes a stratified
//! 80/20 train/test split of the contained table:
//!
//! ```text
//!   dataset_download_url
//!        │  acquire
//!        ▼
//!   tgz_download_dir/housing.tgz
//!        │  extract
//!        ▼
//!   raw_data_dir/housing.csv
//!        │  data::{loader, strata, split, writer}
//!        ▼
//!   ingested_train_dir/housing.csv + ingested_test_dir/housing.csv
//! ```

pub mod acquire;
pub mod artifact;
pub mod config;
pub mod data;
pub mod dirs;
pub mod error;
pub mod events;
pub mod extract;
pub mod pipeline;

pub use artifact::DataIngestionArtifact;
pub use config::{DataIngestionConfig, SplitConfig};
pub use error::{IngestionError, Stage};
pub use events::{IngestionEvent, IngestionObserver, LogObserver};
pub use pipeline::DataIngestion;
