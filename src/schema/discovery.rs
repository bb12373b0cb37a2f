//! Schema discovery

use super::dispatch::dispatch_type;
use crate::error::{Error, Result};
use crate::store::TabularStore;
use crate::types::FieldDescriptor;
use serde::Serialize;
use std::collections::HashSet;

/// Ordered, fully resolved schema of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    table: String,
    records: u64,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Build a schema from already-resolved descriptors
    ///
    /// Field names must be unique.
    pub fn new(
        table: impl Into<String>,
        records: u64,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(Error::DuplicateField {
                    field: field.name().to_string(),
                });
            }
        }

        Ok(Self {
            table: table.into(),
            records,
            fields,
        })
    }

    /// Table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Record count reported by the store at discovery time
    pub fn record_count(&self) -> u64 {
        self.records
    }

    /// Field descriptors in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDescriptor::name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Enumerate (field name, reported type) pairs in declaration order
pub fn discover_fields<S: TabularStore>(store: &S) -> Vec<(String, String)> {
    store.entry_fields()
}

/// Discover the store's schema and dispatch every field's type
///
/// Fails on the first field whose type is unsupported, before any column
/// is read.
pub fn discover_schema<S: TabularStore>(store: &S) -> Result<Schema> {
    let fields = discover_fields(store)
        .into_iter()
        .map(|(name, type_name)| {
            let tag = dispatch_type(&name, &type_name)?;
            tracing::debug!(field = %name, %type_name, %tag, "Resolved field");
            Ok(FieldDescriptor::new(name, tag))
        })
        .collect::<Result<Vec<_>>>()?;

    Schema::new(store.table(), store.record_count(), fields)
}
