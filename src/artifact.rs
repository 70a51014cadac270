use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Outcome of a completed ingestion run, handed to the next pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataIngestionArtifact {
    pub train_file_path: PathBuf,
    pub test_file_path: PathBuf,
    pub is_ingested: bool,
    pub message: String,
}

impl fmt::Display for DataIngestionArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "train=[{}] test=[{}] is_ingested={} message=\"{}\"",
            self.train_file_path.display(),
            self.test_file_path.display(),
            self.is_ingested,
            self.message
        )
    }
}
