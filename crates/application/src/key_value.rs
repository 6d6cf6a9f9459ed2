//! Key/value list normalization
//!
//! Turns the editable, enable-flagged rows of params, headers and form
//! fields into the pairs that actually go on the wire.

use std::collections::BTreeMap;

use nexus_domain::KeyValueItem;

use crate::variable_resolver::VariableResolver;

/// Resolves enabled rows into ordered `(key, value)` pairs.
///
/// Disabled rows are dropped, as are rows whose key is empty before or after
/// resolution. Duplicate keys are kept in order.
#[must_use]
pub fn normalize(items: &[KeyValueItem], resolver: &VariableResolver) -> Vec<(String, String)> {
    items
        .iter()
        .filter(|item| item.enabled && !item.key.is_empty())
        .filter_map(|item| {
            let key = resolver.resolve(&item.key);
            if key.is_empty() {
                return None;
            }
            Some((key, resolver.resolve(&item.value)))
        })
        .collect()
}

/// Resolves enabled rows into a map where later duplicates overwrite earlier ones.
#[must_use]
pub fn to_map(items: &[KeyValueItem], resolver: &VariableResolver) -> BTreeMap<String, String> {
    normalize(items, resolver).into_iter().collect()
}
