//! CLI arguments and parsing

use crate::config::{ConvertConfig, NumberEncoding, OutputFormat, Strategy};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Convert a columnar table into JSON or NDJSON
#[derive(Parser, Debug)]
#[command(name = "tab2json")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input Parquet file, or a directory holding `<table>.parquet`
    pub input: PathBuf,

    /// Name of the table to convert
    pub table: String,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output shape
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Row assembly strategy (defaults to batch for array, streaming for ndjson)
    #[arg(short, long)]
    pub strategy: Option<Strategy>,

    /// Numeric encoding (`string` is the legacy numbers-as-strings mode)
    #[arg(short, long)]
    pub numbers: Option<NumberEncoding>,

    /// Output file (default: `<table>.json` for array, `out.ndjson` for ndjson)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rows decoded per store batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Print the discovered schema as JSON and exit
    #[arg(long)]
    pub schema: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the effective config: file values, then flag overrides
    pub fn convert_config(&self) -> Result<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::from_yaml_file(path)?,
            None => ConvertConfig::default(),
        };

        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = Some(strategy);
        }
        if let Some(numbers) = self.numbers {
            config.numbers = numbers;
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }

        config.validate()?;
        Ok(config)
    }
}
