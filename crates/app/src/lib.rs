//! Nexus command line client
//!
//! Wires configuration, logging and the state file around the request
//! pipeline so it can be driven from a shell.

pub mod app_config;
pub mod cli;
pub mod commands;
pub mod logging;

pub use app_config::AppConfig;
pub use cli::Cli;
