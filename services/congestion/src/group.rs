//! Static worker group.
//!
//! Each rank runs as an independent blocking task given only its
//! `(rank, size)` pair. There is no message passing between workers and no
//! barrier; the coordinator only waits for every task to finish and then
//! hands the outcomes back in rank order for printing.

use futures::future::join_all;
use tracing::info;
use traffic_core::{Partition, WorkerReport};

use crate::config::{ConfigError, CongestionConfig};
use crate::worker::{WorkerError, WorkerSettings, run_worker};

#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    #[error(transparent)]
    Worker(#[from] WorkerError),
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// What one rank produced.
#[derive(Debug)]
pub struct WorkerOutcome {
    pub partition: Partition,
    pub result: Result<WorkerReport, GroupError>,
}

impl WorkerOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run every partition the config selects and collect their outcomes.
///
/// A failing worker does not stop its siblings; its error is returned in its
/// own outcome.
pub async fn run_group(config: &CongestionConfig) -> Result<Vec<WorkerOutcome>, ConfigError> {
    let partitions = config.partitions()?;
    let settings = WorkerSettings {
        input: config.input.clone(),
        top_k: config.top_k,
        malformed: config.malformed,
    };
    info!(
        workers = config.workers,
        running = partitions.len(),
        input = %config.input.display(),
        "starting worker group"
    );

    let tasks = partitions.iter().map(|&partition| {
        let settings = settings.clone();
        tokio::task::spawn_blocking(move || run_worker(&settings, partition))
    });
    let joined = join_all(tasks).await;

    Ok(partitions
        .into_iter()
        .zip(joined)
        .map(|(partition, joined)| WorkerOutcome {
            partition,
            result: joined
                .map_err(GroupError::from)
                .and_then(|r| r.map_err(GroupError::from)),
        })
        .collect())
}

/// Process exit status for a finished group: 0 only if every worker
/// succeeded.
pub fn exit_code(outcomes: &[WorkerOutcome]) -> i32 {
    if outcomes.iter().all(WorkerOutcome::is_ok) {
        0
    } else {
        1
    }
}
