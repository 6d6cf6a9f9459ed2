//! Named variable sets

use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::key_value::{KeyValueItem, ensure_trailing_blank};

/// An environment containing a set of variables.
///
/// At most one environment is active at a time; the active one is
/// referenced by id from [`crate::GlobalSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Unique identifier
    #[serde(default = "generate_id")]
    pub id: String,
    /// Environment name (e.g., "Development", "Production")
    pub name: String,
    /// Variables in this environment, in precedence order.
    #[serde(default)]
    pub variables: Vec<KeyValueItem>,
}

impl Environment {
    /// Creates a new empty environment with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            variables: vec![KeyValueItem::blank()],
        }
    }

    /// Adds or updates a variable, keeping the trailing blank row.
    pub fn set_variable(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.variables.iter_mut().rev().find(|v| v.key == key) {
            existing.value = value;
            existing.enabled = true;
        } else {
            let at = self
                .variables
                .iter()
                .rposition(|v| !v.is_blank())
                .map_or(0, |i| i + 1);
            self.variables.insert(at, KeyValueItem::new(key, value));
        }
        self.variables = ensure_trailing_blank(std::mem::take(&mut self.variables));
    }

    /// Returns the value of the last enabled variable named `key`.
    #[must_use]
    pub fn get_variable(&self, key: &str) -> Option<&str> {
        self.variables
            .iter()
            .rev()
            .find(|v| v.enabled && v.key == key)
            .map(|v| v.value.as_str())
    }
}
