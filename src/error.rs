use std::fmt;

// ---------------------------------------------------------------------------
// Stage – where in the pipeline a failure originated
// ---------------------------------------------------------------------------

/// Origin tag attached to every [`IngestionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Download,
    Extract,
    Split,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Download => "download",
            Stage::Extract => "extract",
            Stage::Split => "split",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// IngestionError – the single pipeline-level error
// ---------------------------------------------------------------------------

/// Every failure of an ingestion run, whatever its origin (network,
/// filesystem, parse, archive), surfaces as this one type.
///
/// The underlying cause is kept as an `anyhow` chain, so `{:#}` or `{:?}`
/// prints the full context trail down to the original I/O error.
#[derive(Debug, thiserror::Error)]
#[error("data ingestion failed at {stage} stage")]
pub struct IngestionError {
    stage: Stage,
    #[source]
    source: anyhow::Error,
}

impl IngestionError {
    pub fn new(stage: Stage, source: anyhow::Error) -> Self {
        Self { stage, source }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The wrapped cause (including its context chain).
    pub fn inner(&self) -> &anyhow::Error {
        &self.source
    }
}

pub type Result<T, E = IngestionError> = std::result::Result<T, E>;

/// Wrap an `anyhow` result into an [`IngestionError`] tagged with `stage`.
pub(crate) trait StageExt<T> {
    fn at_stage(self, stage: Stage) -> Result<T>;
}

impl<T> StageExt<T> for anyhow::Result<T> {
    fn at_stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| IngestionError::new(stage, e))
    }
}
