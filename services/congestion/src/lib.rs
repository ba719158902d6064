// congestion: Library entry point.
// Exposes modules for integration testing.

pub mod config;
pub mod group;
pub mod ingest;
pub mod output;
pub mod util;
pub mod worker;

pub use config::{CongestionConfig, MalformedPolicy, OutputFormat};
pub use group::{WorkerOutcome, run_group};
pub use worker::{WorkerError, WorkerSettings, run_worker};
