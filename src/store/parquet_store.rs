//! Parquet-backed tabular store
//!
//! Opens a Parquet file through the Arrow reader and hands out one
//! projected reader per field. Each reader decodes its column in bounded
//! batches and keeps only the current batch, so a forward scan over one
//! field is sequential and memory stays flat.

use super::{ColumnRead, TabularStore};
use crate::error::{Error, Result};
use crate::types::Value;
use arrow::array::{
    Array, ArrayRef, Float64Array, Int32Array, LargeStringArray, StringArray, UInt32Array,
};
use arrow::datatypes::{DataType, SchemaRef};
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use parquet::arrow::ProjectionMask;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Rows decoded per batch when reading a column
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Footer key-value entry naming the table stored in a file
pub const TABLE_METADATA_KEY: &str = "table";

/// A Parquet file opened as a named table
#[derive(Debug, Clone)]
pub struct ParquetStore {
    table: String,
    path: PathBuf,
    schema: SchemaRef,
    record_count: u64,
    batch_size: usize,
}

impl ParquetStore {
    /// Open `table` from `path` with the default batch size
    ///
    /// `path` is either a Parquet file or a directory holding
    /// `<table>.parquet`.
    pub fn open(table: &str, path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_batch_size(table, path, DEFAULT_BATCH_SIZE)
    }

    /// Open `table` from `path`, decoding `batch_size` rows at a time
    pub fn open_with_batch_size(
        table: &str,
        path: impl AsRef<Path>,
        batch_size: usize,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::config("batch_size must be greater than zero"));
        }

        let path = resolve_table_path(table, path.as_ref())?;
        let shown = path.display().to_string();

        let file = File::open(&path).map_err(|e| Error::open(&shown, e.to_string()))?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| Error::open(&shown, format!("cannot read Parquet footer: {e}")))?;

        let file_meta = builder.metadata().file_metadata();
        if let Some(stored) = file_meta
            .key_value_metadata()
            .and_then(|kv| kv.iter().find(|entry| entry.key == TABLE_METADATA_KEY))
        {
            if stored.value.as_deref() != Some(table) {
                return Err(Error::TableNotFound {
                    table: table.to_string(),
                    path: shown,
                });
            }
        }

        let record_count = u64::try_from(file_meta.num_rows())
            .map_err(|_| Error::open(&shown, "negative row count in footer"))?;

        tracing::debug!(
            table,
            path = %shown,
            records = record_count,
            fields = builder.schema().fields().len(),
            "Opened Parquet table"
        );

        Ok(Self {
            table: table.to_string(),
            path,
            schema: Arc::clone(builder.schema()),
            record_count,
            batch_size,
        })
    }

    /// Resolved file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Map (table, path) onto the file holding the table
fn resolve_table_path(table: &str, path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        let candidate = path.join(format!("{table}.parquet"));
        if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(Error::TableNotFound {
                table: table.to_string(),
                path: path.display().to_string(),
            })
        }
    } else if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(Error::open(
            path.display().to_string(),
            "no such file or directory",
        ))
    }
}

impl TabularStore for ParquetStore {
    type Column = ParquetColumn;

    fn table(&self) -> &str {
        &self.table
    }

    fn record_count(&self) -> u64 {
        self.record_count
    }

    fn entry_fields(&self) -> Vec<(String, String)> {
        self.schema
            .fields()
            .iter()
            .map(|field| (field.name().clone(), field.data_type().to_string()))
            .collect()
    }

    fn column(&self, name: &str) -> Result<ParquetColumn> {
        let index = self
            .schema
            .index_of(name)
            .map_err(|_| Error::read(name, 0, "no such column"))?;
        ParquetColumn::open(&self.path, name, index, self.batch_size)
    }
}

/// Positional reader over one Parquet column
///
/// Holds its own file handle and a projected batch reader. Reads at or
/// after the cached batch stream forward; a read before it rewinds the
/// scan to the start of the column.
pub struct ParquetColumn {
    path: PathBuf,
    name: String,
    index: usize,
    batch_size: usize,
    reader: ParquetRecordBatchReader,
    current: Option<ArrayRef>,
    /// First record index covered by `current`
    start: u64,
    /// One past the last record index covered by `current`
    end: u64,
}

impl std::fmt::Debug for ParquetColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParquetColumn")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("index", &self.index)
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}

impl ParquetColumn {
    fn open(path: &Path, name: &str, index: usize, batch_size: usize) -> Result<Self> {
        let reader = open_projected(path, name, index, batch_size)?;
        Ok(Self {
            path: path.to_path_buf(),
            name: name.to_string(),
            index,
            batch_size,
            reader,
            current: None,
            start: 0,
            end: 0,
        })
    }

    fn rewind(&mut self) -> Result<()> {
        tracing::debug!(field = %self.name, from = self.start, "Rewinding column scan");
        self.reader = open_projected(&self.path, &self.name, self.index, self.batch_size)?;
        self.current = None;
        self.start = 0;
        self.end = 0;
        Ok(())
    }

    fn next_batch(&mut self, wanted: u64) -> Result<()> {
        match self.reader.next() {
            Some(Ok(batch)) => {
                self.start = self.end;
                self.end += batch.num_rows() as u64;
                self.current = Some(Arc::clone(batch.column(0)));
                Ok(())
            }
            Some(Err(e)) => Err(Error::read(&self.name, wanted, e.to_string())),
            None => Err(Error::read(&self.name, wanted, "index past end of column")),
        }
    }
}

impl ColumnRead for ParquetColumn {
    fn read(&mut self, index: u64) -> Result<Value> {
        if index < self.start {
            self.rewind()?;
        }
        while index >= self.end {
            self.next_batch(index)?;
        }

        let array = self
            .current
            .as_ref()
            .ok_or_else(|| Error::read(&self.name, index, "no batch loaded"))?;
        let offset = (index - self.start) as usize;
        cell_value(array.as_ref(), offset).map_err(|message| Error::read(&self.name, index, message))
    }
}

/// Build a batch reader that decodes only column `index`
fn open_projected(
    path: &Path,
    name: &str,
    index: usize,
    batch_size: usize,
) -> Result<ParquetRecordBatchReader> {
    let file = File::open(path).map_err(|e| Error::read(name, 0, e.to_string()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let mask = ProjectionMask::roots(builder.parquet_schema(), [index]);
    let reader = builder
        .with_projection(mask)
        .with_batch_size(batch_size)
        .build()?;
    Ok(reader)
}

/// Convert one Arrow cell into a tagged value
fn cell_value(array: &dyn Array, offset: usize) -> std::result::Result<Value, String> {
    if array.is_null(offset) {
        return Err("null value".to_string());
    }

    let value = match array.data_type() {
        DataType::Utf8 => array
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| Value::Str(a.value(offset).to_string())),
        DataType::LargeUtf8 => array
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| Value::Str(a.value(offset).to_string())),
        DataType::Int32 => array
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| Value::I32(a.value(offset))),
        DataType::UInt32 => array
            .as_any()
            .downcast_ref::<UInt32Array>()
            .map(|a| Value::U32(a.value(offset))),
        DataType::Float64 => array
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| Value::F64(a.value(offset))),
        other => return Err(format!("cannot read {other} cells")),
    };

    value.ok_or_else(|| format!("failed to downcast {} column", array.data_type()))
}
