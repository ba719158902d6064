//! Static sharding of sensors across a fixed-size worker group.
//!
//! A record belongs to the worker whose rank equals
//! `sensor_id.rem_euclid(size)`. The Euclidean remainder is always in
//! `0..size`, including for negative sensor ids, so every record has exactly
//! one owner for every group size.

use std::fmt;

use serde::Serialize;

use crate::record::TrafficRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    #[error("worker group must have at least one worker")]
    EmptyGroup,
    #[error("rank {rank} is out of range for a group of {size} workers")]
    RankOutOfRange { rank: u32, size: u32 },
}

/// One worker's identity within its group: `rank` in `0..size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Partition {
    rank: u32,
    size: u32,
}

impl Partition {
    pub fn new(rank: u32, size: u32) -> Result<Partition, PartitionError> {
        if size == 0 {
            return Err(PartitionError::EmptyGroup);
        }
        if rank >= size {
            return Err(PartitionError::RankOutOfRange { rank, size });
        }
        Ok(Partition { rank, size })
    }

    /// Every partition of a group of `size` workers, in rank order.
    pub fn group(size: u32) -> Result<Vec<Partition>, PartitionError> {
        if size == 0 {
            return Err(PartitionError::EmptyGroup);
        }
        Ok((0..size).map(|rank| Partition { rank, size }).collect())
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn owns(&self, sensor_id: i64) -> bool {
        owner_of(sensor_id, self.size) == self.rank
    }

    pub fn retains(&self, record: &TrafficRecord) -> bool {
        self.owns(record.sensor_id)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.rank, self.size)
    }
}

/// Rank that owns `sensor_id` in a group of `size` workers.
///
/// # Panics
///
/// Panics if `size` is zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn owner_of(sensor_id: i64, size: u32) -> u32 {
    assert!(size > 0, "worker group must not be empty");
    // The remainder is in 0..size, which always fits in u32.
    sensor_id.rem_euclid(i64::from(size)) as u32
}
