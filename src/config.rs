//! Conversion configuration
//!
//! `ConvertConfig` selects the output shape, the row assembly strategy and
//! the numeric encoding. It can be loaded from YAML; CLI flags are layered
//! on top by the runner.

use crate::error::{Error, Result};
use crate::store::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output file name used in NDJSON mode when no path is configured
pub const DEFAULT_NDJSON_NAME: &str = "out.ndjson";

// ============================================================================
// Enums
// ============================================================================

/// Shape of the output document
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One pretty-printed JSON array, written after all rows are assembled
    #[default]
    Array,
    /// One compact JSON object per line, written as rows are assembled
    Ndjson,
}

/// How rows are assembled from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Materialize every column into memory, then assemble rows from buffers
    Batch,
    /// Read each field directly from the store per row
    Streaming,
}

/// How numeric fields are encoded
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum NumberEncoding {
    /// Native JSON numbers
    #[default]
    Number,
    /// Legacy mode: numbers rendered as JSON strings
    String,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Array => write!(f, "array"),
            OutputFormat::Ndjson => write!(f, "ndjson"),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Batch => write!(f, "batch"),
            Strategy::Streaming => write!(f, "streaming"),
        }
    }
}

// ============================================================================
// ConvertConfig
// ============================================================================

/// Settings for one conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    /// Output document shape
    #[serde(default)]
    pub format: OutputFormat,

    /// Row assembly strategy (defaults from the format when unset)
    #[serde(default)]
    pub strategy: Option<Strategy>,

    /// Numeric encoding
    #[serde(default)]
    pub numbers: NumberEncoding,

    /// Destination path (derived from the table name when unset)
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Rows decoded per store batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            strategy: None,
            numbers: NumberEncoding::default(),
            output: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ConvertConfig {
    /// Create a config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the row assembly strategy
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Set the numeric encoding
    #[must_use]
    pub fn with_numbers(mut self, numbers: NumberEncoding) -> Self {
        self.numbers = numbers;
        self
    }

    /// Set the destination path
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Set the store batch size
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::config("batch_size must be greater than zero"));
        }
        Ok(())
    }

    /// Strategy actually used: explicit, or paired with the format
    pub fn effective_strategy(&self) -> Strategy {
        self.strategy.unwrap_or(match self.format {
            OutputFormat::Array => Strategy::Batch,
            OutputFormat::Ndjson => Strategy::Streaming,
        })
    }

    /// Destination path for `table`
    ///
    /// `<table>.json` in array mode, `out.ndjson` in NDJSON mode, unless an
    /// explicit path is configured.
    pub fn output_path(&self, table: &str) -> PathBuf {
        match (&self.output, self.format) {
            (Some(path), _) => path.clone(),
            (None, OutputFormat::Array) => PathBuf::from(format!("{table}.json")),
            (None, OutputFormat::Ndjson) => PathBuf::from(DEFAULT_NDJSON_NAME),
        }
    }
}
