//! Code snippet generation.
//!
//! Renders compiled requests as commands a user can paste into a shell.

mod curl;

pub use curl::curl_snippet;
