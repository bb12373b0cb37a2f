//! Engine types
//!
//! Summary of a finished conversion run.

use crate::config::{NumberEncoding, OutputFormat, Strategy};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// Table that was converted
    pub table: String,
    /// Records written (always equals the store's record count)
    pub records: u64,
    /// Fields per record
    pub fields: usize,
    /// Destination file
    pub output: PathBuf,
    /// Output document shape
    pub format: OutputFormat,
    /// Row assembly strategy used
    pub strategy: Strategy,
    /// Numeric encoding used
    pub numbers: NumberEncoding,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}
