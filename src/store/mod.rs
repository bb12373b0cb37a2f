//! Tabular store module
//!
//! Read-only access to a column-oriented table.
//!
//! # Overview
//!
//! A store exposes three things:
//! - the total record count
//! - the ordered schema, as (field name, reported type name) pairs
//! - per field, a positional reader `(index) -> Value`
//!
//! `ParquetStore` is the production implementation. `MemoryStore` holds
//! columns in memory and is used to exercise the engine without files.

mod memory;
mod parquet_store;

pub use self::memory::{MemoryColumn, MemoryStore};
pub use self::parquet_store::{
    ParquetColumn, ParquetStore, DEFAULT_BATCH_SIZE, TABLE_METADATA_KEY,
};

use crate::error::Result;
use crate::types::Value;

/// Positional reads over one field's column
///
/// Repeated reads of the same index return the same value. Implementations
/// may cache decoded data, hence `&mut self`.
pub trait ColumnRead {
    /// Read the value of record `index`
    fn read(&mut self, index: u64) -> Result<Value>;
}

/// A read-only tabular store bound to one table
pub trait TabularStore {
    /// Positional reader handed out per field
    type Column: ColumnRead;

    /// Table name the store was opened with
    fn table(&self) -> &str;

    /// Total number of records
    fn record_count(&self) -> u64;

    /// Fields of one representative record, in declaration order
    ///
    /// Each entry is (field name, reported type name).
    fn entry_fields(&self) -> Vec<(String, String)>;

    /// Open a positional reader for the named field
    fn column(&self, name: &str) -> Result<Self::Column>;
}
