//! Schema module
//!
//! Turns the store's reported schema into resolved field descriptors.
//!
//! # Overview
//!
//! - **Discovery**: enumerates (field name, reported type) pairs of one
//!   representative record, in declaration order
//! - **Dispatch**: maps each reported type name onto a canonical `TypeTag`,
//!   failing on the first unsupported type
//!
//! Discovery never mutates the store and runs before any output exists.

mod discovery;
mod dispatch;

pub use discovery::{discover_fields, discover_schema, Schema};
pub use dispatch::{dispatch_type, tag_for_type_name};
