//! Per-worker totals and top-k selection.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::record::TrafficRecord;

/// Number of sensors reported per worker unless configured otherwise.
pub const TOP_CONGESTED: usize = 3;

/// One ranked entry: a sensor and the cars counted across its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorTotal {
    pub sensor_id: i64,
    pub total: u64,
}

impl SensorTotal {
    /// Busiest first; equal totals fall back to ascending sensor id.
    pub fn rank_cmp(a: &SensorTotal, b: &SensorTotal) -> Ordering {
        b.total
            .cmp(&a.total)
            .then_with(|| a.sensor_id.cmp(&b.sensor_id))
    }
}

/// Cumulative car count per sensor for one worker's shard.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SensorTotals {
    totals: HashMap<i64, u64>,
}

impl SensorTotals {
    pub fn new() -> Self {
        SensorTotals::default()
    }

    /// Add `count` to the sensor's running total. Totals saturate at
    /// `u64::MAX`.
    pub fn add(&mut self, sensor_id: i64, count: u64) {
        let total = self.totals.entry(sensor_id).or_insert(0);
        *total = total.saturating_add(count);
    }

    pub fn add_record(&mut self, record: &TrafficRecord) {
        self.add(record.sensor_id, record.count);
    }

    pub fn get(&self, sensor_id: i64) -> Option<u64> {
        self.totals.get(&sensor_id).copied()
    }

    /// Number of distinct sensors seen.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// The `k` busiest sensors, busiest first.
    ///
    /// Only the selected prefix is sorted; the rest of the entries are
    /// partitioned out without being ordered.
    pub fn top_k(&self, k: usize) -> Vec<SensorTotal> {
        let mut entries: Vec<SensorTotal> = self
            .totals
            .iter()
            .map(|(&sensor_id, &total)| SensorTotal { sensor_id, total })
            .collect();
        let k = k.min(entries.len());
        if k == 0 {
            return Vec::new();
        }
        if k < entries.len() {
            entries.select_nth_unstable_by(k - 1, SensorTotal::rank_cmp);
            entries.truncate(k);
        }
        entries.sort_unstable_by(SensorTotal::rank_cmp);
        entries
    }
}

impl<'a> FromIterator<&'a TrafficRecord> for SensorTotals {
    fn from_iter<I: IntoIterator<Item = &'a TrafficRecord>>(records: I) -> Self {
        let mut totals = SensorTotals::new();
        records.into_iter().for_each(|r| totals.add_record(r));
        totals
    }
}

impl Extend<TrafficRecord> for SensorTotals {
    fn extend<I: IntoIterator<Item = TrafficRecord>>(&mut self, records: I) {
        records.into_iter().for_each(|r| self.add_record(&r));
    }
}
