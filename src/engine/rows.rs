//! Row assembly
//!
//! `RowSource` is the single seam between the two assembly strategies.
//! `MaterializedRows` reads from buffers filled ahead of time;
//! `DirectRows` calls each field's positional reader per record. Both emit
//! one entry per schema field, in schema order.

use super::buffer::{materialize_all, TypedBuffer};
use crate::config::Strategy;
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::store::{ColumnRead, TabularStore};
use crate::types::{FieldDescriptor, Row};
use std::sync::Arc;

/// Produces assembled rows by record index
pub trait RowSource {
    /// Number of records the source can assemble
    fn record_count(&self) -> u64;

    /// Assemble the row for record `index`
    fn assemble(&mut self, index: u64) -> Result<Row>;
}

// ============================================================================
// Batch
// ============================================================================

/// Rows assembled from materialized column buffers
#[derive(Debug, Clone)]
pub struct MaterializedRows {
    names: Vec<Arc<str>>,
    buffers: Vec<TypedBuffer>,
    records: u64,
}

impl MaterializedRows {
    /// Pair `buffers` with the fields of `schema`
    ///
    /// Buffers must match the schema one-to-one in order, tag and length.
    pub fn new(schema: &Schema, buffers: Vec<TypedBuffer>) -> Result<Self> {
        if buffers.len() != schema.len() {
            return Err(Error::config(format!(
                "expected {} buffers, got {}",
                schema.len(),
                buffers.len()
            )));
        }

        for (field, buffer) in schema.fields().iter().zip(&buffers) {
            if buffer.tag() != field.tag() {
                return Err(Error::type_mismatch(
                    field.name(),
                    field.tag().to_string(),
                    buffer.tag().to_string(),
                ));
            }
            if buffer.len() as u64 != schema.record_count() {
                return Err(Error::read(
                    field.name(),
                    buffer.len() as u64,
                    "buffer shorter than record count",
                ));
            }
        }

        Ok(Self {
            names: schema.fields().iter().map(FieldDescriptor::shared_name).collect(),
            buffers,
            records: schema.record_count(),
        })
    }

    /// Materialize every column of `store` and wrap the buffers
    pub fn load<S: TabularStore>(store: &S, schema: &Schema) -> Result<Self> {
        let buffers = materialize_all(store, schema)?;
        Self::new(schema, buffers)
    }
}

impl RowSource for MaterializedRows {
    fn record_count(&self) -> u64 {
        self.records
    }

    fn assemble(&mut self, index: u64) -> Result<Row> {
        let mut row = Row::with_capacity(self.names.len());
        for (name, buffer) in self.names.iter().zip(&self.buffers) {
            let value = usize::try_from(index)
                .ok()
                .and_then(|i| buffer.get(i))
                .ok_or_else(|| Error::read(&**name, index, "index past end of buffer"))?;
            row.push(Arc::clone(name), value);
        }
        Ok(row)
    }
}

// ============================================================================
// Streaming
// ============================================================================

/// Rows assembled by reading the store directly, one record at a time
#[derive(Debug)]
pub struct DirectRows<C> {
    fields: Vec<FieldDescriptor>,
    columns: Vec<C>,
    records: u64,
}

impl<C: ColumnRead> DirectRows<C> {
    /// Open one positional reader per schema field
    pub fn open<S>(store: &S, schema: &Schema) -> Result<Self>
    where
        S: TabularStore<Column = C>,
    {
        let columns = schema
            .fields()
            .iter()
            .map(|field| store.column(field.name()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fields: schema.fields().to_vec(),
            columns,
            records: schema.record_count(),
        })
    }
}

impl<C: ColumnRead> RowSource for DirectRows<C> {
    fn record_count(&self) -> u64 {
        self.records
    }

    fn assemble(&mut self, index: u64) -> Result<Row> {
        let mut row = Row::with_capacity(self.fields.len());
        for (field, column) in self.fields.iter().zip(self.columns.iter_mut()) {
            let value = column.read(index)?;
            if value.tag() != field.tag() {
                return Err(Error::type_mismatch(
                    field.name(),
                    field.tag().to_string(),
                    value.tag().to_string(),
                ));
            }
            row.push(field.shared_name(), value);
        }
        Ok(row)
    }
}

/// Build the row source selected by `strategy`
///
/// The batch strategy materializes every column before returning.
pub fn row_source<S>(store: &S, schema: &Schema, strategy: Strategy) -> Result<Box<dyn RowSource>>
where
    S: TabularStore,
    S::Column: 'static,
{
    match strategy {
        Strategy::Batch => Ok(Box::new(MaterializedRows::load(store, schema)?)),
        Strategy::Streaming => Ok(Box::new(DirectRows::open(store, schema)?)),
    }
}
