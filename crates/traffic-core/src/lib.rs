//! Core types for sharded traffic-sensor congestion reports.
//!
//! Parsing, static partitioning, per-worker aggregation and top-k selection
//! live here so the service crate only has to deal with files, tasks and
//! output.

pub mod aggregate;
pub mod partition;
pub mod record;
pub mod report;

pub use aggregate::{SensorTotal, SensorTotals, TOP_CONGESTED};
pub use partition::{Partition, PartitionError};
pub use record::{ParseError, TrafficRecord};
pub use report::{IngestStats, WorkerReport};
