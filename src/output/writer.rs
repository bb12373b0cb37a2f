//! JSON file writers
//!
//! Provides the two output shapes: a pretty-printed JSON array written in
//! one go, and NDJSON written line by line.

use super::encode::{encode_line, EncodedRows};
use crate::config::{NumberEncoding, OutputFormat};
use crate::error::{Result, ResultExt};
use crate::types::Row;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// ============================================================================
// Array Writer
// ============================================================================

/// Accumulates rows and writes one JSON array on `finish`
///
/// Nothing touches the filesystem until `finish`. The document is written
/// to a sibling temp file and renamed into place, so the destination either
/// holds the complete array or is left untouched.
#[derive(Debug)]
pub struct ArrayWriter {
    path: PathBuf,
    numbers: NumberEncoding,
    rows: Vec<Row>,
}

impl ArrayWriter {
    /// Create a writer for `path`
    pub fn new(path: impl Into<PathBuf>, numbers: NumberEncoding) -> Self {
        Self {
            path: path.into(),
            numbers,
            rows: Vec::new(),
        }
    }

    /// Buffer a row
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows buffered so far
    pub fn rows_buffered(&self) -> usize {
        self.rows.len()
    }

    /// Write the array and return the number of rows written
    pub fn finish(self) -> Result<u64> {
        let tmp = temp_path(&self.path);

        let result = write_array(&tmp, &self.rows, self.numbers)
            .and_then(|()| fs::rename(&tmp, &self.path).write_context(&self.path));

        match result {
            Ok(()) => Ok(self.rows.len() as u64),
            Err(e) => {
                if tmp.exists() {
                    if let Err(cleanup) = fs::remove_file(&tmp) {
                        tracing::warn!("Failed to remove {}: {}", tmp.display(), cleanup);
                    }
                }
                Err(e)
            }
        }
    }
}

fn write_array(path: &Path, rows: &[Row], numbers: NumberEncoding) -> Result<()> {
    let file = File::create(path).write_context(path)?;
    let mut out = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut out, &EncodedRows::new(rows, numbers))
        .write_context(path)?;
    out.write_all(b"\n").write_context(path)?;

    let file = out.into_inner().write_context(path)?;
    file.sync_all().write_context(path)?;
    Ok(())
}

/// `<dir>/<name>.tmp` next to `path`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// ============================================================================
// NDJSON Writer
// ============================================================================

/// Writes one compact JSON object per line as rows arrive
///
/// Each row is encoded into a line buffer before it reaches the file, so
/// the file only ever receives whole lines. Buffered output is flushed on
/// `finish` and, on early exit, when the writer is dropped.
#[derive(Debug)]
pub struct NdjsonWriter {
    path: PathBuf,
    numbers: NumberEncoding,
    out: BufWriter<File>,
    line: Vec<u8>,
    rows_written: u64,
}

impl NdjsonWriter {
    /// Create (or truncate) the destination file
    pub fn create(path: impl Into<PathBuf>, numbers: NumberEncoding) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path).write_context(&path)?;

        Ok(Self {
            path,
            numbers,
            out: BufWriter::new(file),
            line: Vec::new(),
            rows_written: 0,
        })
    }

    /// Encode and write a single row
    pub fn write(&mut self, row: &Row) -> Result<()> {
        self.line.clear();
        encode_line(row, self.numbers, &mut self.line)?;
        self.out.write_all(&self.line).write_context(&self.path)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Get the number of rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush and close the file
    pub fn finish(mut self) -> Result<u64> {
        self.out.flush().write_context(&self.path)?;
        self.out.get_ref().sync_all().write_context(&self.path)?;
        Ok(self.rows_written)
    }
}

// ============================================================================
// Output Writer
// ============================================================================

/// Writer for either output shape
#[derive(Debug)]
pub enum OutputWriter {
    Array(ArrayWriter),
    Ndjson(NdjsonWriter),
}

impl OutputWriter {
    /// Create the writer for `format`
    ///
    /// NDJSON creates the destination immediately; array mode defers all
    /// filesystem work to `finish`.
    pub fn create(format: OutputFormat, path: &Path, numbers: NumberEncoding) -> Result<Self> {
        match format {
            OutputFormat::Array => Ok(OutputWriter::Array(ArrayWriter::new(path, numbers))),
            OutputFormat::Ndjson => Ok(OutputWriter::Ndjson(NdjsonWriter::create(
                path, numbers,
            )?)),
        }
    }

    /// Hand over one assembled row
    pub fn write_row(&mut self, row: Row) -> Result<()> {
        match self {
            OutputWriter::Array(writer) => {
                writer.push(row);
                Ok(())
            }
            OutputWriter::Ndjson(writer) => writer.write(&row),
        }
    }

    /// Finish the document and return the number of rows written
    pub fn finish(self) -> Result<u64> {
        match self {
            OutputWriter::Array(writer) => writer.finish(),
            OutputWriter::Ndjson(writer) => writer.finish(),
        }
    }
}
