//! Global Settings Domain Model
//!
//! Process-wide defaults that every request falls back on.

use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;
use crate::environment::Environment;

/// Session-wide defaults passed explicitly into request compilation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Prefix for request URLs that carry no scheme of their own.
    #[serde(default)]
    pub base_url: String,
    /// Credentials used when a request has no auth of its own.
    #[serde(default)]
    pub global_auth: AuthConfig,
    /// Id of the environment used for variable substitution.
    #[serde(default)]
    pub active_environment_id: Option<String>,
}

impl GlobalSettings {
    /// Looks up the active environment among `environments`.
    ///
    /// Returns `None` when no environment is selected or the selected id no
    /// longer exists.
    #[must_use]
    pub fn active_environment<'a>(&self, environments: &'a [Environment]) -> Option<&'a Environment> {
        let id = self.active_environment_id.as_deref()?;
        environments.iter().find(|env| env.id == id)
    }
}
