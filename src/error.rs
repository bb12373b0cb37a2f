//! Error types for tab2json
//!
//! This module defines the error hierarchy for the whole converter.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Nothing below the CLI boundary terminates the process; every failure is
//! returned to the caller.

use thiserror::Error;

/// The main error type for tab2json
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Usage / Configuration Errors
    // ============================================================================
    #[error("Usage: {message}")]
    Usage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Store Errors
    // ============================================================================
    #[error("Failed to open '{path}': {message}")]
    Open { path: String, message: String },

    #[error("Table '{table}' not found in '{path}'")]
    TableNotFound { table: String, path: String },

    #[error("Failed to read field '{field}' at record {index}: {message}")]
    Read {
        field: String,
        index: u64,
        message: String,
    },

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    // ============================================================================
    // Schema Errors
    // ============================================================================
    #[error("Found an unsupported field type '{type_name}' for field '{field}'")]
    UnsupportedType { field: String, type_name: String },

    #[error("Duplicate field name '{field}' in schema")]
    DuplicateField { field: String },

    #[error("Field '{field}' declared as {expected} but the store returned {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Failed to write '{path}': {message}")]
    Write { path: String, message: String },

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an open error for a store path
    pub fn open(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Open {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a positional read error
    pub fn read(field: impl Into<String>, index: u64, message: impl Into<String>) -> Self {
        Self::Read {
            field: field.into(),
            index,
            message: message.into(),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a write error for an output path
    pub fn write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error happened before any record was read
    ///
    /// Schema, usage and open failures leave no output behind in any mode.
    pub fn is_pre_conversion(&self) -> bool {
        matches!(
            self,
            Error::Usage { .. }
                | Error::Config { .. }
                | Error::YamlParse(_)
                | Error::Open { .. }
                | Error::TableNotFound { .. }
                | Error::UnsupportedType { .. }
                | Error::DuplicateField { .. }
        )
    }
}

/// Result type alias for tab2json
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Turn any error into a write error for `path`
    fn write_context(self, path: &std::path::Path) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn write_context(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| Error::write(path.display().to_string(), e.to_string()))
    }
}
