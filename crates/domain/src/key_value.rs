//! Ordered, enable-flagged key/value rows.
//!
//! Params, headers, form fields and environment variables are all edited as
//! lists of [`KeyValueItem`]. Order matters: when a list is folded into a map,
//! later enabled rows override earlier ones.

use serde::{Deserialize, Deserializer, Serialize};

use crate::id::generate_id;

/// A single editable key/value row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueItem {
    /// Stable identity of the row across edits.
    #[serde(default = "generate_id")]
    pub id: String,
    /// The key (may contain variable placeholders)
    #[serde(default)]
    pub key: String,
    /// The value (may contain variable placeholders)
    #[serde(default)]
    pub value: String,
    /// Whether this row is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

/// A list holding just the blank editing row.
#[must_use]
pub fn blank_rows() -> Vec<KeyValueItem> {
    vec![KeyValueItem::blank()]
}

/// Reads a row list, treating `null` like a missing field.
///
/// Use together with `#[serde(default = "blank_rows")]`. Lists that are
/// present are kept exactly as written.
///
/// # Errors
///
/// Returns the deserializer's error for anything but a list or `null`.
pub fn rows_or_blank<'de, D>(deserializer: D) -> Result<Vec<KeyValueItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<KeyValueItem>>::deserialize(deserializer)?.unwrap_or_else(blank_rows))
}

impl KeyValueItem {
    /// Creates a new enabled row with a fresh id.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a new disabled row with a fresh id.
    #[must_use]
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(key, value)
        }
    }

    /// Creates the blank trailing row used for continuous editing.
    #[must_use]
    pub fn blank() -> Self {
        Self::new("", "")
    }

    /// Returns true if both key and value are empty.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // String::is_empty is not const
    pub fn is_blank(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }
}

/// Restores the editing invariant: the list ends with exactly one blank row.
///
/// Extra trailing blank rows collapse into one; a list whose last row is
/// populated gets a fresh blank row appended.
#[must_use]
pub fn ensure_trailing_blank(mut items: Vec<KeyValueItem>) -> Vec<KeyValueItem> {
    while items.len() >= 2
        && items[items.len() - 1].is_blank()
        && items[items.len() - 2].is_blank()
    {
        items.pop();
    }
    if items.last().is_none_or(|item| !item.is_blank()) {
        items.push(KeyValueItem::blank());
    }
    items
}

/// Sets key and value of the row at `index`, returning the edited list.
///
/// Editing the trailing blank row appends a new blank row after it.
/// Out-of-range indices leave the list unchanged.
#[must_use]
pub fn update_row(
    items: &[KeyValueItem],
    index: usize,
    key: impl Into<String>,
    value: impl Into<String>,
) -> Vec<KeyValueItem> {
    let mut rows = items.to_vec();
    if let Some(row) = rows.get_mut(index) {
        row.key = key.into();
        row.value = value.into();
    }
    ensure_trailing_blank(rows)
}

/// Flips the enabled flag of the row at `index`.
#[must_use]
pub fn toggle_row(items: &[KeyValueItem], index: usize) -> Vec<KeyValueItem> {
    let mut rows = items.to_vec();
    if let Some(row) = rows.get_mut(index) {
        row.enabled = !row.enabled;
    }
    rows
}

/// Removes the row at `index`; an emptied list gets one blank row back.
#[must_use]
pub fn remove_row(items: &[KeyValueItem], index: usize) -> Vec<KeyValueItem> {
    let mut rows = items.to_vec();
    if index < rows.len() {
        rows.remove(index);
    }
    if rows.is_empty() {
        rows.push(KeyValueItem::blank());
    }
    rows
}
