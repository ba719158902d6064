//! Congestion report configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file (`--config`), then command line flags.
//!
//! # File format
//! ```toml
//! input = "data.txt"
//! workers = 4
//! # rank = 2          # run only this worker of the group
//! top_k = 3
//! malformed = "skip"  # or "fail"
//! format = "text"     # or "json"
//! ```
//! Every key is optional; unknown keys are rejected.

use serde::Deserialize;
use std::convert::TryFrom;
use std::fmt;
use std::path::{Path, PathBuf};
use traffic_core::{Partition, PartitionError, TOP_CONGESTED};

/// Input file used when neither the config file nor the CLI names one.
pub const DEFAULT_INPUT: &str = "data.txt";

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// What a worker does with a line that is not a valid record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Log a warning, count the line and keep reading.
    #[default]
    Skip,
    /// Stop the worker at the first malformed line.
    Fail,
}

impl TryFrom<&str> for MalformedPolicy {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "skip" => Ok(MalformedPolicy::Skip),
            "fail" => Ok(MalformedPolicy::Fail),
            other => Err(ConfigError::InvalidValue(format!(
                "malformed must be \"skip\" or \"fail\", got \"{}\"",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl TryFrom<&str> for OutputFormat {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::InvalidValue(format!(
                "format must be \"text\" or \"json\", got \"{}\"",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Effective configuration after defaults, file and CLI are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CongestionConfig {
    pub input: PathBuf,
    pub workers: u32,
    /// Run only this rank of the group; `None` runs every rank.
    pub rank: Option<u32>,
    pub top_k: usize,
    pub malformed: MalformedPolicy,
    pub format: OutputFormat,
}

impl Default for CongestionConfig {
    fn default() -> Self {
        CongestionConfig {
            input: PathBuf::from(DEFAULT_INPUT),
            workers: 1,
            rank: None,
            top_k: TOP_CONGESTED,
            malformed: MalformedPolicy::Skip,
            format: OutputFormat::Text,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub workers: Option<u32>,
    pub rank: Option<u32>,
    pub top_k: Option<usize>,
    pub malformed: Option<MalformedPolicy>,
    pub format: Option<OutputFormat>,
}

impl CongestionConfig {
    /// Apply CLI overrides on top of this config and re-validate.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Self, ConfigError> {
        if let Some(ref input) = overrides.input {
            self.input.clone_from(input);
        }
        if let Some(workers) = overrides.workers {
            self.workers = workers;
        }
        if overrides.rank.is_some() {
            self.rank = overrides.rank;
        }
        if let Some(top_k) = overrides.top_k {
            self.top_k = top_k;
        }
        if let Some(malformed) = overrides.malformed {
            self.malformed = malformed;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidValue(
                "top_k must be at least 1".to_owned(),
            ));
        }
        Partition::new(self.rank.unwrap_or(0), self.workers)?;
        Ok(())
    }

    /// Partitions this invocation runs, in rank order.
    pub fn partitions(&self) -> Result<Vec<Partition>, ConfigError> {
        match self.rank {
            Some(rank) => Ok(vec![Partition::new(rank, self.workers)?]),
            None => Ok(Partition::group(self.workers)?),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw TOML deserialization type
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    input: Option<String>,
    workers: Option<u32>,
    rank: Option<u32>,
    top_k: Option<usize>,
    malformed: Option<String>,
    format: Option<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load config from a TOML file. A missing file is an error.
pub fn load_config_from_path(path: &Path) -> Result<CongestionConfig, ConfigError> {
    let toml_str = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("reading config file '{}': {}", path.display(), e)))?;
    load_config_from_str(&toml_str)
}

/// Load config from a TOML string, filling unset keys with defaults.
pub fn load_config_from_str(toml_str: &str) -> Result<CongestionConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    let defaults = CongestionConfig::default();

    let malformed = match raw.malformed {
        Some(ref m) => MalformedPolicy::try_from(m.as_str())?,
        None => defaults.malformed,
    };
    let format = match raw.format {
        Some(ref f) => OutputFormat::try_from(f.as_str())?,
        None => defaults.format,
    };

    let config = CongestionConfig {
        input: raw.input.map_or(defaults.input, PathBuf::from),
        workers: raw.workers.unwrap_or(defaults.workers),
        rank: raw.rank,
        top_k: raw.top_k.unwrap_or(defaults.top_k),
        malformed,
        format,
    };
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
    #[error("Invalid worker group: {0}")]
    Partition(#[from] PartitionError),
}
