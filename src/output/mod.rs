//! Output module
//!
//! Serializes assembled rows to a JSON file.
//!
//! # Overview
//!
//! This module provides:
//! - Row encoding with native or string-encoded numbers
//! - `ArrayWriter` - one pretty-printed JSON array, written atomically
//! - `NdjsonWriter` - one compact object per line, written immediately
//! - `OutputWriter` - either of the above, chosen by `OutputFormat`

mod encode;
mod writer;

pub use encode::{encode_line, EncodedRow, EncodedRows, EncodedValue};
pub use writer::{ArrayWriter, NdjsonWriter, OutputWriter};
