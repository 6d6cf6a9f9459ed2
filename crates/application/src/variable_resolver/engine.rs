//! Variable resolution engine
//!
//! Substitutes `{{variable}}` references with values from the active
//! environment. Unknown references are left in place.

use std::collections::HashMap;

use nexus_domain::{Environment, KeyValueItem};

use super::parser::parse_variables;

/// Result of variable resolution for a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// The resolved string with all known variables substituted.
    pub resolved: String,

    /// Variable names that could not be resolved, in order of appearance.
    pub unresolved: Vec<String>,
}

impl ResolutionResult {
    /// Returns true if every reference was resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// The variable resolution engine.
///
/// Built once per compilation from the active environment's enabled
/// variables. A resolver without variables returns every input unchanged.
#[derive(Debug, Clone, Default)]
pub struct VariableResolver {
    variables: Option<HashMap<String, String>>,
}

impl VariableResolver {
    /// Creates a resolver that performs no substitution.
    #[must_use]
    pub fn empty() -> Self {
        Self { variables: None }
    }

    /// Creates a resolver over a variable list.
    ///
    /// Disabled rows and empty keys are skipped; for duplicate keys the last
    /// enabled row wins.
    #[must_use]
    pub fn new(variables: Option<&[KeyValueItem]>) -> Self {
        let variables = variables.map(|items| {
            items
                .iter()
                .filter(|item| item.enabled && !item.key.is_empty())
                .map(|item| (item.key.clone(), item.value.clone()))
                .collect()
        });
        Self { variables }
    }

    /// Creates a resolver over the active environment, if there is one.
    #[must_use]
    pub fn for_environment(environment: Option<&Environment>) -> Self {
        Self::new(environment.map(|env| env.variables.as_slice()))
    }

    /// Resolves all known variables in `input`.
    #[must_use]
    pub fn resolve(&self, input: &str) -> String {
        self.resolve_detailed(input).resolved
    }

    /// Resolves `input` and reports which references stayed unresolved.
    #[must_use]
    pub fn resolve_detailed(&self, input: &str) -> ResolutionResult {
        let Some(variables) = &self.variables else {
            return ResolutionResult {
                resolved: input.to_string(),
                unresolved: Vec::new(),
            };
        };

        let references = parse_variables(input);
        let mut unresolved = Vec::new();
        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;

        for var_ref in &references {
            result.push_str(&input[last_end..var_ref.span.start]);
            if let Some(value) = variables.get(&var_ref.name) {
                result.push_str(value);
            } else {
                result.push_str(&input[var_ref.span.clone()]);
                unresolved.push(var_ref.name.clone());
            }
            last_end = var_ref.span.end;
        }
        result.push_str(&input[last_end..]);

        ResolutionResult {
            resolved: result,
            unresolved,
        }
    }

    /// Returns the names referenced in `input` that this resolver cannot fill.
    ///
    /// Useful for warning before sending a request.
    #[must_use]
    pub fn find_unresolved(&self, input: &str) -> Vec<String> {
        match &self.variables {
            None => Vec::new(),
            Some(_) => self.resolve_detailed(input).unresolved,
        }
    }

    /// Returns the value of a single variable.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.variables.as_ref()?.get(name).map(String::as_str)
    }
}

/// Substitutes enabled `variables` into `text`.
///
/// With no variables at all, `text` is returned unchanged.
#[must_use]
pub fn resolve(text: &str, variables: Option<&[KeyValueItem]>) -> String {
    VariableResolver::new(variables).resolve(text)
}
