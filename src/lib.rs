//! # tab2json
//!
//! Schema-driven conversion of column-oriented tables into JSON.
//!
//! ## Features
//!
//! - **Schema Discovery**: field names and types come from the store, in
//!   declaration order
//! - **Typed Dispatch**: string, int32, uint32 and float64 fields; anything
//!   else fails before output is touched
//! - **Two Strategies**: materialize whole columns (batch) or read each
//!   record directly (streaming)
//! - **Two Shapes**: one pretty-printed JSON array, or NDJSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tab2json::{convert, ConvertConfig, OutputFormat, ParquetStore, Result};
//!
//! fn main() -> Result<()> {
//!     let store = ParquetStore::open("DecayTree", "B2HHH.parquet")?;
//!     let config = ConvertConfig::new().with_format(OutputFormat::Ndjson);
//!     let report = convert(&store, &config)?;
//!     println!("wrote {} records to {}", report.records, report.output.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────┐   ┌──────────────────────┐
//! │ TabularStore │ → │ Schema discovery     │ → │ RowSource            │
//! │  (Parquet)   │   │  + type dispatch     │   │  batch | streaming   │
//! └──────────────┘   └──────────────────────┘   └──────────┬───────────┘
//!                                                          │ Row
//!                                               ┌──────────┴───────────┐
//!                                               │ OutputWriter         │
//!                                               │  array | ndjson      │
//!                                               └──────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Value, field and row types
pub mod types;

/// Conversion configuration
pub mod config;

/// Tabular store abstraction and Parquet implementation
pub mod store;

/// Schema discovery and type dispatch
pub mod schema;

/// Materialization, row assembly and the conversion driver
pub mod engine;

/// JSON and NDJSON writers
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ConvertConfig, NumberEncoding, OutputFormat, Strategy};
pub use engine::{convert, ConversionReport};
pub use error::{Error, Result};
pub use schema::{discover_schema, Schema};
pub use store::{ColumnRead, MemoryStore, ParquetStore, TabularStore};
pub use types::{FieldDescriptor, Row, TypeTag, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
