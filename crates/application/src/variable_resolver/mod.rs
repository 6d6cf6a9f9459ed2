//! Variable resolution module
//!
//! Provides parsing and resolution of `{{variable}}` syntax in strings.
//!
//! # Usage
//!
//! ```
//! use nexus_application::variable_resolver::VariableResolver;
//! use nexus_domain::Environment;
//!
//! let mut env = Environment::new("development");
//! env.set_variable("host", "localhost");
//!
//! let resolver = VariableResolver::for_environment(Some(&env));
//! assert_eq!(resolver.resolve("http://{{host}}/api"), "http://localhost/api");
//! ```

pub mod engine;
pub mod parser;

pub use engine::{ResolutionResult, VariableResolver, resolve};
pub use parser::{VariableReference, extract_variable_names, has_variables, parse_variables};
