//! JSON encoding for the state file and exported documents.
//!
//! Output is pretty-printed with 2-space indentation and ends with a
//! newline, so saved files diff cleanly.

mod json;

pub use json::{SerializationError, from_json, from_json_bytes, to_json_stable, to_json_stable_bytes};
