//! File persistence

mod state_file;

pub use state_file::{StateFileError, StateFileRepository};
