//! Nexus Application - Resolution and dispatch pipeline
//!
//! This crate turns an editable request into a wire request and back into
//! a response record:
//! - Variable resolution and key/value normalization
//! - Auth merging and request compilation
//! - Dispatch through the `HttpClient` port
//! - Import validation/merging and the session store

pub mod auth;
pub mod compiler;
pub mod dispatcher;
pub mod error;
pub mod import;
pub mod key_value;
pub mod ports;
pub mod session;
pub mod variable_resolver;

pub use auth::{AuthLocation, AuthPlacement, resolve_auth};
pub use compiler::{CompileError, CompiledBody, CompiledRequest, compile};
pub use dispatcher::Dispatcher;
pub use error::{ApplicationError, ApplicationResult};
pub use import::{
    ImportError, ImportMerge, ImportPayload, ImportValidationError, ImportedRequest, merge_import,
    parse_import, validate_import,
};
pub use key_value::{normalize, to_map};
pub use ports::{Clock, HttpClient, HttpClientError, TransportResponse};
pub use session::{ImportSummary, Session};
pub use variable_resolver::{VariableResolver, resolve};
