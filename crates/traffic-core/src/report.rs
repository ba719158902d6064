//! A worker's congestion report.

use std::fmt;

use serde::Serialize;

use crate::aggregate::{SensorTotal, SensorTotals};
use crate::partition::Partition;

/// Line accounting for one worker's pass over the input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub lines_read: u64,
    pub records_parsed: u64,
    pub records_retained: u64,
    pub blank_lines: u64,
    pub malformed_lines: u64,
}

/// The busiest sensors in one worker's shard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    #[serde(flatten)]
    pub partition: Partition,
    pub top: Vec<SensorTotal>,
    pub stats: IngestStats,
}

impl WorkerReport {
    pub fn from_totals(
        partition: Partition,
        totals: &SensorTotals,
        k: usize,
        stats: IngestStats,
    ) -> WorkerReport {
        WorkerReport {
            partition,
            top: totals.top_k(k),
            stats,
        }
    }

    pub fn rank(&self) -> u32 {
        self.partition.rank()
    }
}

/// The plain-text block: a header line followed by one line per sensor.
impl fmt::Display for WorkerReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Process {} congested traffic lights:", self.rank())?;
        for entry in &self.top {
            writeln!(
                f,
                "Traffic Light ID: {}, Total Cars Passed: {}",
                entry.sensor_id, entry.total
            )?;
        }
        Ok(())
    }
}
