//! Rendering of collected worker reports.
//!
//! Only successful workers produce output here; failures are reported on
//! stderr by the caller.

use std::io::Write;

use traffic_core::WorkerReport;

use crate::config::OutputFormat;
use crate::group::WorkerOutcome;

pub fn write_reports<W: Write>(
    out: &mut W,
    outcomes: &[WorkerOutcome],
    format: OutputFormat,
) -> std::io::Result<()> {
    let reports: Vec<&WorkerReport> = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .collect();
    match format {
        OutputFormat::Text => {
            for report in reports {
                write!(out, "{}", report)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &reports)?;
            writeln!(out)?;
        }
    }
    out.flush()
}
