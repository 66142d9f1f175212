//! Stable JSON serialization for signed documents.
//!
//! Signatures cover exact bytes, so documents are always written with the
//! same formatter: pretty-printed with a fixed 5-space indent, struct
//! members in declaration order.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{IdentityError, Result};

/// Indentation used for documents.
pub const DOCUMENT_INDENT: &[u8] = b"     ";

/// Serialize with the document indentation.
pub fn to_document_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    to_indented_json(value, DOCUMENT_INDENT)
}

/// Serialize pretty-printed with the given indentation unit.
pub fn to_indented_json<T: Serialize + ?Sized>(value: &T, indent: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent));
    value
        .serialize(&mut ser)
        .map_err(|e| IdentityError::SerializationError(e.to_string()))?;
    Ok(out)
}

/// Detect the indentation unit of pretty-printed JSON.
///
/// Returns the whitespace that starts the first line after the opening
/// brace, or an empty string for compact JSON.
pub fn detect_indent(content: &[u8]) -> String {
    let Some(open) = content.iter().position(|&b| b == b'{') else {
        return String::new();
    };
    let rest = &content[open + 1..];
    let Some(newline) = rest.iter().position(|&b| b == b'\n') else {
        return String::new();
    };
    if rest[..newline].iter().any(|b| !b.is_ascii_whitespace()) {
        return String::new();
    }
    rest[newline + 1..]
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .map(|&b| b as char)
        .collect()
}
