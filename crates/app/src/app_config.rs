//! Layered configuration.
//!
//! Built-in defaults, then `nexus.toml` in the working directory (or the
//! file given with `--config`), then `NEXUS_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use nexus_infrastructure::HttpClientConfig;
use serde::Deserialize;

/// Settings the binary runs with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Where the session is persisted between invocations
    pub state_file: PathBuf,
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,
    /// `User-Agent` header sent with every request
    pub user_agent: String,
    /// Redirects followed before failing
    pub max_redirects: usize,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist; the default `nexus.toml` is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("state_file", "nexus-state.json")?
            .set_default("timeout_ms", 30_000_i64)?
            .set_default("user_agent", format!("Nexus/{}", env!("CARGO_PKG_VERSION")))?
            .set_default("max_redirects", 10_i64)?
            .set_default("log_level", "info")?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("nexus").required(false)),
        };

        builder
            .add_source(Environment::with_prefix("NEXUS"))
            .build()?
            .try_deserialize()
    }

    /// Transport settings for the HTTP client.
    #[must_use]
    pub fn http_client(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout_ms: self.timeout_ms,
            user_agent: self.user_agent.clone(),
            max_redirects: self.max_redirects,
        }
    }
}
