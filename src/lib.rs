//! Sharded traffic congestion reports.
//!
//! Umbrella crate for the workspace: [`traffic_core`] holds the record
//! format, partition rule and top-k aggregation; [`congestion`] runs them as
//! a static worker group over an input file.

pub use congestion;
pub use traffic_core;
