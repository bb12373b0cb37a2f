//! CLI runner - executes the conversion

use crate::cli::commands::Cli;
use crate::config::ConvertConfig;
use crate::engine::{convert_schema, ConversionReport};
use crate::error::{Error, Result};
use crate::schema::{discover_schema, Schema};
use crate::store::{ParquetStore, TabularStore};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        if self.cli.schema {
            let schema = self.describe()?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }

        let report = self.convert()?;
        tracing::info!(
            "Done converting '{}' to JSON: {} records, {} fields -> {} ({} ms)",
            report.table,
            report.records,
            report.fields,
            report.output.display(),
            report.duration_ms
        );
        Ok(())
    }

    /// Open the store and discover its schema without writing anything
    pub fn describe(&self) -> Result<Schema> {
        let config = self.config()?;
        let store = self.open_store(&config)?;
        discover_schema(&store)
    }

    /// Convert the table and return the run summary
    pub fn convert(&self) -> Result<ConversionReport> {
        let config = self.config()?;
        let store = self.open_store(&config)?;

        let schema = discover_schema(&store)?;
        tracing::info!(
            "Discovered {} fields in '{}': {}",
            schema.len(),
            schema.table(),
            schema.names().collect::<Vec<_>>().join(", ")
        );

        let output = config.output_path(&self.cli.table);
        convert_schema(&store, &schema, &config, &output)
    }

    /// Resolve config before touching the store
    fn config(&self) -> Result<ConvertConfig> {
        if self.cli.table.trim().is_empty() {
            return Err(Error::usage("table name must not be empty"));
        }
        self.cli.convert_config()
    }

    fn open_store(&self, config: &ConvertConfig) -> Result<ParquetStore> {
        tracing::debug!(
            "Opening table '{}' from {}",
            self.cli.table,
            self.cli.input.display()
        );
        let store =
            ParquetStore::open_with_batch_size(&self.cli.table, &self.cli.input, config.batch_size)?;
        tracing::debug!("Reading table '{}' from {}", store.table(), store.path().display());
        Ok(store)
    }
}
