//! tab2json CLI
//!
//! Command-line entry point. This is the only place that terminates the
//! process on failure.

use clap::Parser;
use tab2json::cli::{Cli, Runner};

fn main() {
    // Missing arguments exit here with usage on stderr, before any store access
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::default().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
