//! Column materialization
//!
//! The store is column-major, so reading one field across every record in
//! index order is the cheap access pattern. `materialize` performs exactly
//! that scan once per field and keeps the result in a contiguous buffer.

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::store::{ColumnRead, TabularStore};
use crate::types::{FieldDescriptor, TypeTag, Value};

/// Contiguous values of one field, one slot per record
#[derive(Debug, Clone, PartialEq)]
pub enum TypedBuffer {
    Str(Vec<String>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    F64(Vec<f64>),
}

impl TypedBuffer {
    /// Empty buffer of the given tag with room for `capacity` values
    pub fn with_capacity(tag: TypeTag, capacity: usize) -> Self {
        match tag {
            TypeTag::String => TypedBuffer::Str(Vec::with_capacity(capacity)),
            TypeTag::Int32 => TypedBuffer::I32(Vec::with_capacity(capacity)),
            TypeTag::UInt32 => TypedBuffer::U32(Vec::with_capacity(capacity)),
            TypeTag::Float64 => TypedBuffer::F64(Vec::with_capacity(capacity)),
        }
    }

    /// Tag of the stored values
    pub fn tag(&self) -> TypeTag {
        match self {
            TypedBuffer::Str(_) => TypeTag::String,
            TypedBuffer::I32(_) => TypeTag::Int32,
            TypedBuffer::U32(_) => TypeTag::UInt32,
            TypedBuffer::F64(_) => TypeTag::Float64,
        }
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        match self {
            TypedBuffer::Str(v) => v.len(),
            TypedBuffer::I32(v) => v.len(),
            TypedBuffer::U32(v) => v.len(),
            TypedBuffer::F64(v) => v.len(),
        }
    }

    /// Whether the buffer holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a value, handing it back if its tag does not match
    pub fn push(&mut self, value: Value) -> std::result::Result<(), Value> {
        match (self, value) {
            (TypedBuffer::Str(v), Value::Str(s)) => v.push(s),
            (TypedBuffer::I32(v), Value::I32(x)) => v.push(x),
            (TypedBuffer::U32(v), Value::U32(x)) => v.push(x),
            (TypedBuffer::F64(v), Value::F64(x)) => v.push(x),
            (_, other) => return Err(other),
        }
        Ok(())
    }

    /// Value at `index`
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            TypedBuffer::Str(v) => v.get(index).cloned().map(Value::Str),
            TypedBuffer::I32(v) => v.get(index).copied().map(Value::I32),
            TypedBuffer::U32(v) => v.get(index).copied().map(Value::U32),
            TypedBuffer::F64(v) => v.get(index).copied().map(Value::F64),
        }
    }
}

/// Copy one field's column into a new buffer
///
/// Reads indices `0..record_count` in order. Any read failure or value of
/// the wrong type aborts the scan; nothing is retried.
pub fn materialize<S: TabularStore>(
    store: &S,
    field: &FieldDescriptor,
    record_count: u64,
) -> Result<TypedBuffer> {
    let capacity = usize::try_from(record_count)
        .map_err(|_| Error::read(field.name(), 0, "record count exceeds addressable memory"))?;

    let mut column = store.column(field.name())?;
    let mut buffer = TypedBuffer::with_capacity(field.tag(), capacity);

    for index in 0..record_count {
        let value = column.read(index)?;
        buffer.push(value).map_err(|found| {
            Error::type_mismatch(field.name(), field.tag().to_string(), found.tag().to_string())
        })?;
    }

    debug_assert_eq!(buffer.len(), capacity);
    Ok(buffer)
}

/// Materialize every field of `schema`, in schema order
pub fn materialize_all<S: TabularStore>(store: &S, schema: &Schema) -> Result<Vec<TypedBuffer>> {
    let records = schema.record_count();
    tracing::info!(
        "Reading {} fields of '{}' into memory ({} records)",
        schema.len(),
        schema.table(),
        records
    );
    schema
        .fields()
        .iter()
        .map(|field| {
            tracing::debug!("Materializing field '{}' ({})", field.name(), field.tag());
            materialize(store, field, records)
        })
        .collect()
}
