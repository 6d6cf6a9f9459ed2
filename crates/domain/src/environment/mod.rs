//! Environment domain types

mod variable;

pub use variable::Environment;
