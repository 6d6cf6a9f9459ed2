//! HTTP Request domain types

mod body;
mod method;
mod spec;

pub use body::{BodyType, RequestBody};
pub use method::HttpMethod;
pub use spec::ApiRequest;
