//! Nexus Domain - Core business types
//!
//! This crate defines the data model for the Nexus request composer.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod collection;
pub mod environment;
pub mod error;
pub mod export;
pub mod history;
pub mod id;
pub mod key_value;
pub mod request;
pub mod response;
pub mod settings;

pub use auth::{ApiKeyLocation, AuthConfig, AuthType};
pub use collection::RequestCollection;
pub use environment::Environment;
pub use error::{DomainError, DomainResult};
pub use export::{EXPORT_VERSION, ExportDocument};
pub use history::{HISTORY_CAPACITY, History, append_history};
pub use id::{RequestId, generate_id};
pub use key_value::{
    KeyValueItem, blank_rows, ensure_trailing_blank, remove_row, toggle_row, update_row,
};
pub use request::{ApiRequest, BodyType, HttpMethod, RequestBody};
pub use response::{ResponseRecord, try_format_json};
pub use settings::GlobalSettings;
