//! One worker, end to end: open the input, ingest its shard, aggregate and
//! select the busiest sensors.
//!
//! Workers share nothing. Each opens its own handle to the input and owns its
//! records and totals until it returns its report.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{error, info};
use traffic_core::{Partition, SensorTotals, WorkerReport};

use crate::config::MalformedPolicy;
use crate::ingest::{IngestError, read_shard};

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Error opening input file {}: {source}", .path.display())]
    InputUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Settings every worker of a group shares.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub input: PathBuf,
    pub top_k: usize,
    pub malformed: MalformedPolicy,
}

pub fn open_input(path: &Path) -> Result<BufReader<File>, WorkerError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| WorkerError::InputUnavailable {
            path: path.to_path_buf(),
            source,
        })
}

/// Run one worker of the group to completion.
pub fn run_worker(
    settings: &WorkerSettings,
    partition: Partition,
) -> Result<WorkerReport, WorkerError> {
    let rank = partition.rank();
    let reader = open_input(&settings.input).inspect_err(|e| {
        error!(rank, error = %e, "worker cannot open input");
    })?;

    let shard = read_shard(reader, partition, settings.malformed).inspect_err(|e| {
        error!(rank, error = %e, "worker stopped");
    })?;

    let totals: SensorTotals = shard.records.iter().collect();
    let report = WorkerReport::from_totals(partition, &totals, settings.top_k, shard.stats);
    info!(
        rank,
        sensors = totals.len(),
        reported = report.top.len(),
        "worker finished"
    );
    Ok(report)
}
