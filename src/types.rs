//! Common types used throughout tab2json
//!
//! This module contains the data model shared by the store, schema,
//! engine and output modules: canonical type tags, tagged cell values,
//! field descriptors and assembled rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Type Tags
// ============================================================================

/// Canonical tag for every supported field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// UTF-8 string
    String,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    UInt32,
    /// 64-bit IEEE float
    Float64,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::String => write!(f, "string"),
            TypeTag::Int32 => write!(f, "int32"),
            TypeTag::UInt32 => write!(f, "uint32"),
            TypeTag::Float64 => write!(f, "float64"),
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// One cell read from the store
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    I32(i32),
    U32(u32),
    F64(f64),
}

impl Value {
    /// The tag this value belongs to
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Str(_) => TypeTag::String,
            Value::I32(_) => TypeTag::Int32,
            Value::U32(_) => TypeTag::UInt32,
            Value::F64(_) => TypeTag::Float64,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

// ============================================================================
// Field Descriptors
// ============================================================================

/// A resolved schema field: name plus canonical tag
///
/// Immutable once discovery has produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    #[serde(serialize_with = "serialize_name")]
    name: Arc<str>,
    #[serde(rename = "type")]
    tag: TypeTag,
}

fn serialize_name<S: serde::Serializer>(name: &Arc<str>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(name)
}

impl FieldDescriptor {
    /// Create a new field descriptor
    pub fn new(name: impl Into<Arc<str>>, tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            tag,
        }
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the field name, cheap to clone into rows
    pub fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Canonical type tag
    pub fn tag(&self) -> TypeTag {
        self.tag
    }
}

// ============================================================================
// Rows
// ============================================================================

/// One assembled record: (field name, value) pairs in schema order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    entries: Vec<(Arc<str>, Value)>,
}

impl Row {
    /// Create an empty row with room for `fields` entries
    pub fn with_capacity(fields: usize) -> Self {
        Self {
            entries: Vec::with_capacity(fields),
        }
    }

    /// Append an entry
    pub fn push(&mut self, name: Arc<str>, value: Value) {
        self.entries.push((name, value));
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the row has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (&**name, value))
    }

    /// Look up a value by field name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}
