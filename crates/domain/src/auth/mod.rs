//! Authentication domain types

mod types;

pub use types::{ApiKeyLocation, AuthConfig, AuthType};
