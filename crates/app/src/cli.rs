//! Command line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use nexus_domain::{ApiKeyLocation, HttpMethod, RequestId};

/// Compose, send and keep HTTP requests from the shell.
#[derive(Debug, Parser)]
#[command(name = "nexus", version, about)]
pub struct Cli {
    /// Configuration file (defaults to `nexus.toml` when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// State file, overriding the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a request and make it active
    New(NewArgs),
    /// Change fields of an open request
    Edit(EditArgs),
    /// List open requests
    List,
    /// Compile and send a request, then record it in history
    Send {
        /// Request id
        id: RequestId,
    },
    /// Print the curl equivalent of a request
    Snippet {
        /// Request id
        id: RequestId,
    },
    /// Copy a request under a new id
    Duplicate {
        /// Request id
        id: RequestId,
    },
    /// Close a request
    Close {
        /// Request id
        id: RequestId,
    },
    /// Merge requests, environments and settings from an export file
    Import {
        /// JSON file to read
        file: PathBuf,
    },
    /// Write the session as an export document
    Export {
        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show dispatched requests, newest first and numbered from 1
    History {
        /// Show at most this many entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Drop all entries instead of listing them
        #[arg(long, conflicts_with = "open")]
        clear: bool,
        /// Open entry N of the listing as a new request
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
        open: Option<u64>,
    },
    /// Manage environments
    #[command(subcommand)]
    Env(EnvCommand),
    /// Show or change global settings
    Settings(SettingsArgs),
}

/// Fields of a new request.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Request name
    #[arg(long, default_value = "New Request")]
    pub name: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: HttpMethod,

    /// Target URL, absolute or relative to the base URL
    pub url: String,

    /// Header as `NAME:VALUE` (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Query parameter as `KEY=VALUE` (repeatable)
    #[arg(short = 'q', long = "param", value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub params: Vec<(String, String)>,

    /// JSON body
    #[arg(long, conflicts_with_all = ["text", "form", "form_data"])]
    pub json: Option<String>,

    /// Plain text body
    #[arg(long, conflicts_with_all = ["form", "form_data"])]
    pub text: Option<String>,

    /// URL-encoded form field as `KEY=VALUE` (repeatable)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_pair, conflicts_with = "form_data")]
    pub form: Vec<(String, String)>,

    /// Multipart form field as `KEY=VALUE` (repeatable)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub form_data: Vec<(String, String)>,

    /// Bearer token
    #[arg(long, conflicts_with = "api_key")]
    pub bearer: Option<String>,

    /// API key as `NAME=VALUE`
    #[arg(long, value_name = "NAME=VALUE", value_parser = parse_pair)]
    pub api_key: Option<(String, String)>,

    /// Where the API key goes
    #[arg(long, value_enum, default_value_t = KeyPlacement::Query)]
    pub api_key_in: KeyPlacement,
}

/// Changes to an existing request. Omitted fields stay as they are.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Request id
    pub id: RequestId,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New HTTP method
    #[arg(short = 'X', long)]
    pub method: Option<HttpMethod>,

    /// New URL
    #[arg(long)]
    pub url: Option<String>,

    /// Header as `NAME:VALUE`, replacing a header of the same name (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Query parameter as `KEY=VALUE` to append (repeatable)
    #[arg(short = 'q', long = "param", value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub params: Vec<(String, String)>,
}

impl EditArgs {
    /// Whether any change was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.method.is_none()
            && self.url.is_none()
            && self.headers.is_empty()
            && self.params.is_empty()
    }
}

/// Where an API key is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyPlacement {
    /// Request header
    Header,
    /// Query parameter
    Query,
}

impl From<KeyPlacement> for ApiKeyLocation {
    fn from(placement: KeyPlacement) -> Self {
        match placement {
            KeyPlacement::Header => Self::Header,
            KeyPlacement::Query => Self::Query,
        }
    }
}

/// Environment subcommands.
#[derive(Debug, Subcommand)]
pub enum EnvCommand {
    /// Set a variable, creating the environment if needed
    Set {
        /// Environment name
        env: String,
        /// Variable name
        key: String,
        /// Variable value
        value: String,
    },
    /// Activate an environment by name
    Use {
        /// Environment name
        env: String,
    },
    /// Deactivate the active environment
    Clear,
    /// List environments and their variables
    List,
}

/// Global settings changes. With no flags the current settings are printed.
#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Base URL prepended to relative request URLs
    #[arg(long)]
    pub base_url: Option<String>,

    /// Global bearer token used when a request has no auth
    #[arg(long, conflicts_with = "clear_auth")]
    pub bearer: Option<String>,

    /// Remove the global auth
    #[arg(long)]
    pub clear_auth: bool,
}

impl SettingsArgs {
    /// Whether any change was requested.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.base_url.is_none() && self.bearer.is_none() && !self.clear_auth
    }
}

/// Parses `NAME:VALUE`, trimming whitespace around both parts.
///
/// # Errors
///
/// Returns an error when the colon is missing or the name is empty.
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    split_pair(raw, ':')
}

/// Parses `KEY=VALUE`. The value may itself contain `=`.
///
/// # Errors
///
/// Returns an error when the `=` is missing or the key is empty.
pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
    split_pair(raw, '=')
}

fn split_pair(raw: &str, separator: char) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once(separator)
        .ok_or_else(|| format!("expected KEY{separator}VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
