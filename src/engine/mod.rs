//! Conversion engine module
//!
//! Drives one conversion run from an opened store to a finished output
//! file.
//!
//! # Overview
//!
//! The engine module provides:
//! - `TypedBuffer` / `materialize` - per-column materialization
//! - `RowSource` - the batch and streaming row assembly strategies
//! - `convert` - discovery, assembly and output in one call
//!
//! Data flows store → schema discovery → row source → output writer. The
//! output file is only touched after discovery succeeded, so an
//! unsupported schema never leaves a file behind.

mod buffer;
mod rows;
mod types;

pub use buffer::{materialize, materialize_all, TypedBuffer};
pub use rows::{row_source, DirectRows, MaterializedRows, RowSource};
pub use types::ConversionReport;

use crate::config::ConvertConfig;
use crate::error::Result;
use crate::output::OutputWriter;
use crate::schema::{discover_schema, Schema};
use crate::store::TabularStore;
use std::path::Path;
use std::time::Instant;

/// Rows between progress log lines
const PROGRESS_INTERVAL: u64 = 1_000_000;

/// Convert the whole table behind `store` according to `config`
///
/// In array mode nothing exists at the destination unless every row was
/// assembled and written. In NDJSON mode rows are flushed as they are
/// assembled, so a read failure part-way leaves the earlier lines on disk;
/// each of those lines is a complete JSON object.
pub fn convert<S>(store: &S, config: &ConvertConfig) -> Result<ConversionReport>
where
    S: TabularStore,
    S::Column: 'static,
{
    config.validate()?;
    let schema = discover_schema(store)?;
    let output = config.output_path(store.table());
    convert_schema(store, &schema, config, &output)
}

/// Convert with an already discovered schema, writing to `output`
pub fn convert_schema<S>(
    store: &S,
    schema: &Schema,
    config: &ConvertConfig,
    output: &Path,
) -> Result<ConversionReport>
where
    S: TabularStore,
    S::Column: 'static,
{
    let start = Instant::now();
    let strategy = config.effective_strategy();

    tracing::info!(
        "Converting table '{}': {} records, {} fields ({} strategy, {} output)",
        schema.table(),
        schema.record_count(),
        schema.len(),
        strategy,
        config.format
    );

    let mut source = row_source(store, schema, strategy)?;
    let mut writer = OutputWriter::create(config.format, output, config.numbers)?;

    let records = source.record_count();
    let assembled = (0..records).try_for_each(|index| -> Result<()> {
        writer.write_row(source.assemble(index)?)?;
        if (index + 1) % PROGRESS_INTERVAL == 0 {
            tracing::debug!("Assembled {} of {} rows", index + 1, records);
        }
        Ok(())
    });

    if let Err(e) = assembled {
        if let (false, OutputWriter::Ndjson(partial)) = (e.is_pre_conversion(), &writer) {
            tracing::warn!(
                "Conversion aborted; {} complete lines already written to {} are kept",
                partial.rows_written(),
                output.display()
            );
        }
        return Err(e);
    }

    tracing::info!("Writing JSON to {}", output.display());
    let written = writer.finish()?;

    Ok(ConversionReport {
        table: schema.table().to_string(),
        records: written,
        fields: schema.len(),
        output: output.to_path_buf(),
        format: config.format,
        strategy,
        numbers: config.numbers,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
