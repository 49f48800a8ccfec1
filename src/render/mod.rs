//! Rendering of outlines and collection outputs.

mod json;

pub use json::{to_json, to_json_writer, JsonFormat};
