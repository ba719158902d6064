//! Ingest/partition: one pass over the input, keeping this worker's shard.
//!
//! The source is read line by line in file order and consumed exactly once.
//! Bytes that are not valid UTF-8 are replaced before parsing, so they can
//! only ever surface as a malformed line, never as a read failure.

use std::convert::TryFrom;
use std::io::BufRead;

use tracing::{debug, warn};
use traffic_core::{IngestStats, ParseError, Partition, TrafficRecord};

use crate::config::MalformedPolicy;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("reading input: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed line {line}: {source}")]
    Malformed { line: u64, source: ParseError },
}

/// The records one worker retained, in input order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Shard {
    pub records: Vec<TrafficRecord>,
    pub stats: IngestStats,
}

/// Read every line of `reader` and keep the records `partition` owns.
pub fn read_shard<R: BufRead>(
    mut reader: R,
    partition: Partition,
    policy: MalformedPolicy,
) -> Result<Shard, IngestError> {
    let mut shard = Shard::default();
    let mut buf = Vec::new();
    let rank = partition.rank();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        shard.stats.lines_read += 1;
        let line_no = shard.stats.lines_read;
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            shard.stats.blank_lines += 1;
            continue;
        }

        match TrafficRecord::try_from(line) {
            Ok(record) => {
                shard.stats.records_parsed += 1;
                if partition.retains(&record) {
                    shard.stats.records_retained += 1;
                    shard.records.push(record);
                }
            }
            Err(source) => match policy {
                MalformedPolicy::Skip => {
                    shard.stats.malformed_lines += 1;
                    warn!(rank, line = line_no, error = %source, "skipping malformed line");
                }
                MalformedPolicy::Fail => {
                    return Err(IngestError::Malformed {
                        line: line_no,
                        source,
                    });
                }
            },
        }
    }

    debug!(
        rank,
        size = partition.size(),
        lines = shard.stats.lines_read,
        retained = shard.stats.records_retained,
        malformed = shard.stats.malformed_lines,
        "input consumed"
    );
    Ok(shard)
}
