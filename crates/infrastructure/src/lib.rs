//! Nexus Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus file persistence and
//! code snippet rendering.

pub mod adapters;
pub mod codegen;
pub mod persistence;
pub mod serialization;

pub use adapters::{HttpClientConfig, ReqwestHttpClient, SystemClock};
pub use codegen::curl_snippet;
pub use persistence::{StateFileError, StateFileRepository};
pub use serialization::{
    SerializationError, from_json, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
