//! Type dispatch

use crate::error::{Error, Result};
use crate::types::TypeTag;

/// Map a reported type name onto its canonical tag
///
/// Arrow type names, lowercase canonical names and C++-style names are
/// all recognized. Matching is case-sensitive.
pub fn tag_for_type_name(type_name: &str) -> Option<TypeTag> {
    match type_name {
        "Utf8" | "LargeUtf8" | "string" | "std::string" => Some(TypeTag::String),
        "Int32" | "int32" | "std::int32_t" => Some(TypeTag::Int32),
        "UInt32" | "uint32" | "std::uint32_t" => Some(TypeTag::UInt32),
        "Float64" | "float64" | "double" => Some(TypeTag::Float64),
        _ => None,
    }
}

/// Resolve the tag for `field`, or fail naming the offending type
pub fn dispatch_type(field: &str, type_name: &str) -> Result<TypeTag> {
    tag_for_type_name(type_name).ok_or_else(|| Error::unsupported_type(field, type_name))
}
