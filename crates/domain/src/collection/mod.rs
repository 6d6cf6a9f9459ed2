//! Open request collection

mod requests;

pub use requests::RequestCollection;
