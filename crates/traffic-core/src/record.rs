//! Traffic sensor line parsing.
//!
//! Each input line carries a labelled timestamp, a labelled sensor id and a
//! labelled car count:
//!
//! ```text
//! Generated: 2024-01-01T00:00,Traffic Light ID:1:Cars Passed:10
//! ```
//!
//! The timestamp label is a fixed 11 characters and is stripped without
//! inspection. The two numeric fields are located by the `:` that ends their
//! labels, so `Traffic Light ID: 1, Cars Passed: 10` parses the same way.
//!
//! A line that does not have this shape is rejected with a [`ParseError`];
//! the parser never substitutes default values for fields it could not read.

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Width of the label in front of the timestamp (`"Generated: "`).
pub const TIMESTAMP_LABEL_LEN: usize = 11;

const TIMESTAMP_LABEL: &str = "Generated: ";
const SENSOR_LABEL: &str = "Traffic Light ID";
const COUNT_LABEL: &str = "Cars Passed";

// ---------------------------------------------------------------------------
// ParseError
// ---------------------------------------------------------------------------

/// Why a line could not be turned into a [`TrafficRecord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("missing ',' after the timestamp field")]
    MissingSeparator,
    #[error("timestamp field is shorter than its {TIMESTAMP_LABEL_LEN} character label")]
    TimestampTooShort,
    #[error("missing ':' after the {field} label")]
    MissingLabel { field: &'static str },
    #[error("invalid {field} value '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("negative count '{0}'")]
    NegativeCount(String),
    #[error("unexpected trailing data '{0}'")]
    TrailingData(String),
}

// ---------------------------------------------------------------------------
// TrafficRecord
// ---------------------------------------------------------------------------

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficRecord {
    pub timestamp: String,
    pub sensor_id: i64,
    pub count: u64,
}

impl TrafficRecord {
    pub fn new(timestamp: impl Into<String>, sensor_id: i64, count: u64) -> TrafficRecord {
        TrafficRecord {
            timestamp: timestamp.into(),
            sensor_id,
            count,
        }
    }
}

impl TryFrom<&str> for TrafficRecord {
    type Error = ParseError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let (stamp_field, rest) = line.split_once(',').ok_or(ParseError::MissingSeparator)?;
        let timestamp = stamp_field
            .get(TIMESTAMP_LABEL_LEN..)
            .ok_or(ParseError::TimestampTooShort)?
            .to_owned();

        let (_, rest) = rest
            .split_once(':')
            .ok_or(ParseError::MissingLabel { field: "sensor id" })?;
        let (digits, rest) = split_integer(rest.trim_start());
        let sensor_id = digits
            .parse::<i64>()
            .map_err(|_| invalid_number("sensor id", digits, rest))?;

        let rest = rest.trim_start_matches(is_separator);
        let (_, rest) = rest
            .split_once(':')
            .ok_or(ParseError::MissingLabel { field: "count" })?;
        let (digits, trailing) = split_integer(rest.trim_start());
        if digits.starts_with('-') {
            return Err(ParseError::NegativeCount(digits.to_owned()));
        }
        let count = digits
            .parse::<u64>()
            .map_err(|_| invalid_number("count", digits, trailing))?;

        let trailing = trailing.trim();
        if !trailing.is_empty() {
            return Err(ParseError::TrailingData(trailing.to_owned()));
        }

        Ok(TrafficRecord {
            timestamp,
            sensor_id,
            count,
        })
    }
}

impl FromStr for TrafficRecord {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        TrafficRecord::try_from(line)
    }
}

/// Renders the record back into the canonical input line.
impl fmt::Display for TrafficRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{},{}:{}:{}:{}",
            TIMESTAMP_LABEL, self.timestamp, SENSOR_LABEL, self.sensor_id, COUNT_LABEL, self.count
        )
    }
}

// ---------------------------------------------------------------------------
// Tokenizer helpers
// ---------------------------------------------------------------------------

fn is_separator(c: char) -> bool {
    c == ',' || c == ':' || c.is_whitespace()
}

/// Split an optionally signed run of ASCII digits off the front of `s`.
fn split_integer(s: &str) -> (&str, &str) {
    let sign = usize::from(s.starts_with(['-', '+']));
    let end = s[sign..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + sign);
    s.split_at(end)
}

fn invalid_number(field: &'static str, digits: &str, rest: &str) -> ParseError {
    let value = if digits.is_empty() {
        rest.split(is_separator).next().unwrap_or_default()
    } else {
        digits
    };
    ParseError::InvalidNumber {
        field,
        value: value.to_owned(),
    }
}
