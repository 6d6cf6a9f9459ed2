//! Variable parser for {{variable}} syntax
//!
//! Parses strings to extract variable references with their positions.

use std::ops::Range;

/// Represents a parsed variable reference in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name (without {{ }}, surrounding whitespace trimmed).
    pub name: String,

    /// Byte range in the original string where this reference appears.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses a string and extracts all `{{name}}` references in order.
///
/// Unclosed openers and empty names are ignored. When openers nest, the
/// innermost one wins, so `{{ {{host}}` yields a single `host` reference.
///
/// # Examples
///
/// ```
/// use nexus_application::variable_resolver::parser::parse_variables;
///
/// let refs = parse_variables("https://{{host}}/api/{{ version }}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "host");
/// assert_eq!(refs[1].name, "version");
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let mut references = Vec::new();
    let mut offset = 0;

    while let Some(open) = input[offset..].find("{{") {
        let start = offset + open;
        let name_start = start + 2;
        let Some(close) = input[name_start..].find("}}") else {
            break;
        };
        let candidate = &input[name_start..name_start + close];

        if let Some(inner) = candidate.rfind("{{") {
            offset = name_start + inner;
            continue;
        }

        let end = name_start + close + 2;
        let name = candidate.trim();
        if !name.is_empty() {
            references.push(VariableReference::new(name, start..end));
        }
        offset = end;
    }

    references
}

/// Returns true if the input string contains any variable references.
#[must_use]
pub fn has_variables(input: &str) -> bool {
    !parse_variables(input).is_empty()
}

/// Extracts just the variable names from the input without full parsing info.
#[must_use]
pub fn extract_variable_names(input: &str) -> Vec<String> {
    parse_variables(input)
        .into_iter()
        .map(|r| r.name)
        .collect()
}
