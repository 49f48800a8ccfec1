//! JSON rendering.

use std::io::Write;

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Render any output value (outline, collection output) to a JSON string.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Render a value as JSON into `writer`.
pub fn to_json_writer<W: Write, T: Serialize + ?Sized>(
    writer: W,
    value: &T,
    format: JsonFormat,
) -> Result<()> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_writer_pretty(writer, value),
        JsonFormat::Compact => serde_json::to_writer(writer, value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
