//! Progress events of one ingestion run and the sinks that receive them.

use std::path::Path;

use crate::artifact::DataIngestionArtifact;
use crate::data::split::StratumAllocation;
use crate::data::strata::IncomeCategory;
use crate::error::IngestionError;

/// Something that happened during a run.
#[derive(Debug)]
pub enum IngestionEvent<'a> {
    RunStarted,
    Downloaded {
        archive: &'a Path,
    },
    Extracted {
        raw_data_dir: &'a Path,
    },
    Loaded {
        path: &'a Path,
        rows: usize,
        columns: usize,
    },
    Split {
        train_rows: usize,
        test_rows: usize,
        strata: &'a [StratumAllocation<IncomeCategory>],
    },
    Written {
        path: &'a Path,
        rows: usize,
    },
    RunCompleted {
        artifact: &'a DataIngestionArtifact,
    },
    RunFailed {
        error: &'a IngestionError,
    },
}

impl IngestionEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            IngestionEvent::RunStarted => "run_started",
            IngestionEvent::Downloaded { .. } => "downloaded",
            IngestionEvent::Extracted { .. } => "extracted",
            IngestionEvent::Loaded { .. } => "loaded",
            IngestionEvent::Split { .. } => "split",
            IngestionEvent::Written { .. } => "written",
            IngestionEvent::RunCompleted { .. } => "run_completed",
            IngestionEvent::RunFailed { .. } => "run_failed",
        }
    }
}

/// Receives the events of a run. One observer is owned by each
/// [`DataIngestion`](crate::pipeline::DataIngestion).
pub trait IngestionObserver {
    fn on_event(&self, event: &IngestionEvent<'_>);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl IngestionObserver for LogObserver {
    fn on_event(&self, event: &IngestionEvent<'_>) {
        let banner = "=".repeat(20);
        match event {
            IngestionEvent::RunStarted => {
                log::info!("{banner} Data Ingestion log started {banner}");
            }
            IngestionEvent::Downloaded { archive } => {
                log::info!("File [{}] has been downloaded successfully", archive.display());
            }
            IngestionEvent::Extracted { raw_data_dir } => {
                log::info!("Raw data available in [{}]", raw_data_dir.display());
            }
            IngestionEvent::Loaded {
                path,
                rows,
                columns,
            } => {
                log::info!("Read [{}]: {rows} rows x {columns} columns", path.display());
            }
            IngestionEvent::Split {
                train_rows,
                test_rows,
                strata,
            } => {
                log::info!("Split data into {train_rows} train / {test_rows} test rows");
                for s in strata.iter() {
                    log::debug!(
                        "income_cat {}: {} train, {} test",
                        s.key,
                        s.train_rows,
                        s.test_rows
                    );
                }
            }
            IngestionEvent::Written { path, rows } => {
                log::info!("Exported {rows} rows to [{}]", path.display());
            }
            IngestionEvent::RunCompleted { artifact } => {
                log::info!("Data Ingestion artifact: [{artifact}]");
                log::info!("{banner} Data Ingestion log completed {banner}");
            }
            IngestionEvent::RunFailed { error } => {
                log::error!("{error}: {:#}", error.inner());
            }
        }
    }
}
