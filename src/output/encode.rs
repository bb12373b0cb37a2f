//! Row encoding
//!
//! Serializes rows through serde with the configured numeric encoding.
//! Key order follows the row, which follows the schema.

use crate::config::NumberEncoding;
use crate::types::{Row, Value};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A row paired with its numeric encoding
#[derive(Debug, Clone, Copy)]
pub struct EncodedRow<'a> {
    row: &'a Row,
    numbers: NumberEncoding,
}

impl<'a> EncodedRow<'a> {
    /// Wrap a row for serialization
    pub fn new(row: &'a Row, numbers: NumberEncoding) -> Self {
        Self { row, numbers }
    }
}

impl Serialize for EncodedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.row.len()))?;
        for (name, value) in self.row.iter() {
            map.serialize_entry(name, &EncodedValue::new(value, self.numbers))?;
        }
        map.end()
    }
}

/// A slice of rows serialized as one JSON array
#[derive(Debug, Clone, Copy)]
pub struct EncodedRows<'a> {
    rows: &'a [Row],
    numbers: NumberEncoding,
}

impl<'a> EncodedRows<'a> {
    /// Wrap rows for serialization
    pub fn new(rows: &'a [Row], numbers: NumberEncoding) -> Self {
        Self { rows, numbers }
    }
}

impl Serialize for EncodedRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows {
            seq.serialize_element(&EncodedRow::new(row, self.numbers))?;
        }
        seq.end()
    }
}

/// One value with its numeric encoding
#[derive(Debug, Clone, Copy)]
pub struct EncodedValue<'a> {
    value: &'a Value,
    numbers: NumberEncoding,
}

impl<'a> EncodedValue<'a> {
    /// Wrap a value for serialization
    pub fn new(value: &'a Value, numbers: NumberEncoding) -> Self {
        Self { value, numbers }
    }
}

impl Serialize for EncodedValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self.value, self.numbers) {
            (Value::Str(s), _) => serializer.serialize_str(s),
            (Value::I32(v), NumberEncoding::Number) => serializer.serialize_i32(*v),
            (Value::U32(v), NumberEncoding::Number) => serializer.serialize_u32(*v),
            // JSON has no NaN or infinity
            (Value::F64(v), NumberEncoding::Number) if !v.is_finite() => {
                serializer.serialize_unit()
            }
            (Value::F64(v), NumberEncoding::Number) => serializer.serialize_f64(*v),
            (Value::I32(v), NumberEncoding::String) => serializer.collect_str(v),
            (Value::U32(v), NumberEncoding::String) => serializer.collect_str(v),
            (Value::F64(v), NumberEncoding::String) => serializer.collect_str(v),
        }
    }
}

/// Encode a row as a compact JSON object followed by a newline
pub fn encode_line(
    row: &Row,
    numbers: NumberEncoding,
    line: &mut Vec<u8>,
) -> serde_json::Result<()> {
    serde_json::to_writer(&mut *line, &EncodedRow::new(row, numbers))?;
    line.push(b'\n');
    Ok(())
}
