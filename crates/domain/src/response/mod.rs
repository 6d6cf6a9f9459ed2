//! HTTP Response domain types

mod spec;

pub use spec::{ResponseRecord, try_format_json};
