//! In-memory column store

use super::{ColumnRead, TabularStore};
use crate::error::{Error, Result};
use crate::types::Value;
use std::sync::Arc;

/// One stored column
#[derive(Debug, Clone)]
struct StoredColumn {
    name: String,
    type_name: String,
    values: Arc<Vec<Value>>,
}

/// Column store backed by vectors
///
/// The reported type name of each column is free-form so unsupported
/// schemas can be modelled. A column shorter than the record count reads
/// as corrupted past its end.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    table: String,
    record_count: u64,
    columns: Vec<StoredColumn>,
}

impl MemoryStore {
    /// Create an empty store with a fixed record count
    pub fn new(table: impl Into<String>, record_count: u64) -> Self {
        Self {
            table: table.into(),
            record_count,
            columns: Vec::new(),
        }
    }

    /// Add a column
    #[must_use]
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        values: Vec<Value>,
    ) -> Self {
        self.columns.push(StoredColumn {
            name: name.into(),
            type_name: type_name.into(),
            values: Arc::new(values),
        });
        self
    }
}

impl TabularStore for MemoryStore {
    type Column = MemoryColumn;

    fn table(&self) -> &str {
        &self.table
    }

    fn record_count(&self) -> u64 {
        self.record_count
    }

    fn entry_fields(&self) -> Vec<(String, String)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.type_name.clone()))
            .collect()
    }

    fn column(&self, name: &str) -> Result<MemoryColumn> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| MemoryColumn {
                name: c.name.clone(),
                values: Arc::clone(&c.values),
            })
            .ok_or_else(|| Error::read(name, 0, "no such column"))
    }
}

/// Positional reader over a `MemoryStore` column
#[derive(Debug, Clone)]
pub struct MemoryColumn {
    name: String,
    values: Arc<Vec<Value>>,
}

impl ColumnRead for MemoryColumn {
    fn read(&mut self, index: u64) -> Result<Value> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.values.get(i))
            .cloned()
            .ok_or_else(|| Error::read(&self.name, index, "index past end of column"))
    }
}
