//! CLI module
//!
//! Command-line interface for converting a table.
//!
//! ```text
//! tab2json <input-file> <table-name> [--format array|ndjson] [--strategy batch|streaming]
//!          [--numbers number|string] [-o OUTPUT] [--config FILE] [--schema]
//! ```

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
