//! Subcommand handlers.
//!
//! Every invocation restores the session from the state file, applies one
//! command and writes the file back if anything changed.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, bail};
use nexus_application::Session;
use nexus_domain::{
    ApiRequest, AuthConfig, AuthType, BodyType, Environment, KeyValueItem, RequestBody,
    ResponseRecord, ensure_trailing_blank, update_row,
};
use nexus_infrastructure::{
    ReqwestHttpClient, StateFileRepository, SystemClock, curl_snippet, to_json_stable,
};
use tracing::info;

use crate::app_config::AppConfig;
use crate::cli::{Cli, Command, EditArgs, EnvCommand, NewArgs, SettingsArgs};

type CliSession = Session<ReqwestHttpClient, SystemClock>;

/// Runs a parsed command line, printing to stdout.
///
/// # Errors
///
/// Returns an error if the state file cannot be read or written, or the
/// command itself fails.
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(cli, &config, &mut out).await
}

/// Runs a parsed command line, writing its output to `out`.
///
/// # Errors
///
/// See [`run`].
pub async fn execute<W: Write>(cli: Cli, config: &AppConfig, out: &mut W) -> anyhow::Result<()> {
    let repository =
        StateFileRepository::new(cli.state.unwrap_or_else(|| config.state_file.clone()));
    let document = repository
        .load()
        .await
        .with_context(|| format!("failed to load {}", repository.path().display()))?;

    let client = ReqwestHttpClient::new(config.http_client())
        .context("failed to build the HTTP client")?;
    let session = Session::from_document(document, Arc::new(client), Arc::new(SystemClock::new()));

    if apply(cli.command, &session, out).await? {
        repository
            .save(&session.export().await)
            .await
            .with_context(|| format!("failed to save {}", repository.path().display()))?;
    }
    Ok(())
}

/// Applies one command. Returns whether the session changed.
async fn apply<W: Write>(command: Command, session: &CliSession, out: &mut W) -> anyhow::Result<bool> {
    match command {
        Command::New(args) => {
            let id = session.create_request().await;
            let request = session
                .update_request(id, |request| build_request(request, args))
                .await?;
            writeln!(out, "{}", summary_line(&request))?;
            Ok(true)
        }
        Command::Edit(args) => {
            if args.is_empty() {
                bail!("nothing to change for request {}", args.id);
            }
            let id = args.id;
            let request = session
                .update_request(id, |request| edit_request(request, args))
                .await?;
            writeln!(out, "{}", summary_line(&request))?;
            Ok(true)
        }
        Command::List => {
            let active = session.active_request_id().await;
            for request in session.requests().await {
                let marker = if Some(request.id) == active { '*' } else { ' ' };
                writeln!(out, "{marker} {}", summary_line(&request))?;
            }
            Ok(false)
        }
        Command::Send { id } => {
            let sent = session.send(id).await?;
            if let Some(record) = &sent.response {
                print_response(out, record)?;
            }
            Ok(true)
        }
        Command::Snippet { id } => {
            let compiled = session.compile_request(id).await?;
            writeln!(out, "{}", curl_snippet(&compiled))?;
            Ok(false)
        }
        Command::Duplicate { id } => {
            let copy = session.duplicate_request(id).await?;
            writeln!(out, "{}", summary_line(&session.request(copy).await?))?;
            Ok(true)
        }
        Command::Close { id } => {
            let closed = session.close_request(id).await?;
            writeln!(out, "closed {}", summary_line(&closed))?;
            Ok(true)
        }
        Command::Import { file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let summary = session.import_json(&text).await?;
            writeln!(
                out,
                "imported {} request(s), {} environment(s){}",
                summary.imported.len(),
                summary.environments,
                if summary.settings_replaced { ", settings replaced" } else { "" }
            )?;
            Ok(true)
        }
        Command::Export { output } => {
            let json = to_json_stable(&session.export().await)?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, json)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "session exported");
                }
                None => write!(out, "{json}")?,
            }
            Ok(false)
        }
        Command::History { limit, clear, open } => {
            if clear {
                session.clear_history().await;
                return Ok(true);
            }
            if let Some(position) = open {
                let index = usize::try_from(position - 1).context("history position too large")?;
                let id = session.reopen_history(index).await?;
                writeln!(out, "{}", summary_line(&session.request(id).await?))?;
                return Ok(true);
            }
            let history = session.history().await;
            let entries = history.iter().rev().take(limit.unwrap_or(usize::MAX));
            for (position, entry) in (1..).zip(entries) {
                let outcome = entry.response.as_ref().map_or_else(String::new, outcome);
                writeln!(out, "{position} {} {} {outcome}", entry.method, entry.url)?;
            }
            Ok(false)
        }
        Command::Env(command) => apply_env(command, session, out).await,
        Command::Settings(args) => apply_settings(args, session, out).await,
    }
}

async fn apply_env<W: Write>(
    command: EnvCommand,
    session: &CliSession,
    out: &mut W,
) -> anyhow::Result<bool> {
    let environments = session.environments().await;
    match command {
        EnvCommand::Set { env, key, value } => {
            let mut environment = environments
                .into_iter()
                .find(|e| e.name == env)
                .unwrap_or_else(|| Environment::new(env));
            environment.set_variable(key, value);
            session.upsert_environment(environment).await;
            Ok(true)
        }
        EnvCommand::Use { env } => {
            let Some(environment) = environments.iter().find(|e| e.name == env) else {
                bail!("no environment named '{env}'");
            };
            session
                .set_active_environment(Some(environment.id.clone()))
                .await?;
            Ok(true)
        }
        EnvCommand::Clear => {
            session.set_active_environment(None).await?;
            Ok(true)
        }
        EnvCommand::List => {
            let active = session.settings().await.active_environment_id;
            for environment in &environments {
                let marker = if active.as_deref() == Some(environment.id.as_str()) { '*' } else { ' ' };
                writeln!(out, "{marker} {}", environment.name)?;
                for variable in environment.variables.iter().filter(|v| !v.is_blank()) {
                    let state = if variable.enabled { "" } else { " (disabled)" };
                    writeln!(out, "    {}={}{state}", variable.key, variable.value)?;
                }
            }
            Ok(false)
        }
    }
}

async fn apply_settings<W: Write>(
    args: SettingsArgs,
    session: &CliSession,
    out: &mut W,
) -> anyhow::Result<bool> {
    let mut settings = session.settings().await;
    if args.is_empty() {
        writeln!(out, "base url: {}", settings.base_url)?;
        let auth = match settings.global_auth.kind {
            AuthType::None => "none",
            AuthType::Bearer => "bearer",
            AuthType::ApiKey => "api key",
        };
        writeln!(out, "auth: {auth}")?;
        return Ok(false);
    }

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(token) = args.bearer {
        settings.global_auth = AuthConfig::bearer(token);
    }
    if args.clear_auth {
        settings.global_auth = AuthConfig::none();
    }
    session.update_settings(settings).await;
    Ok(true)
}

fn build_request(request: ApiRequest, args: NewArgs) -> ApiRequest {
    let rows = |pairs: Vec<(String, String)>| {
        pairs
            .into_iter()
            .map(|(key, value)| KeyValueItem::new(key, value))
            .collect::<Vec<_>>()
    };

    let body = if let Some(json) = args.json {
        RequestBody::json(json)
    } else if let Some(text) = args.text {
        RequestBody::text(text)
    } else if !args.form.is_empty() {
        RequestBody::form(BodyType::FormUrlEncoded, rows(args.form))
    } else if !args.form_data.is_empty() {
        RequestBody::form(BodyType::FormData, rows(args.form_data))
    } else {
        RequestBody::none()
    };

    let auth = match (args.bearer, args.api_key) {
        (Some(token), _) => AuthConfig::bearer(token),
        (None, Some((name, value))) => AuthConfig::api_key(name, value, args.api_key_in.into()),
        (None, None) => AuthConfig::none(),
    };

    request
        .with_name(args.name)
        .with_method(args.method)
        .with_url(args.url)
        .with_params(rows(args.params))
        .with_headers(rows(args.headers))
        .with_body(body)
        .with_auth(auth)
}

fn edit_request(request: ApiRequest, args: EditArgs) -> ApiRequest {
    let mut request = request;
    if let Some(name) = args.name {
        request = request.with_name(name);
    }
    if let Some(method) = args.method {
        request = request.with_method(method);
    }
    if let Some(url) = args.url {
        request = request.with_url(url);
    }

    let mut headers = request.headers.clone();
    for (name, value) in args.headers {
        headers = put_row(&headers, name, value, true);
    }
    let mut params = request.params.clone();
    for (key, value) in args.params {
        params = put_row(&params, key, value, false);
    }
    request.with_headers(headers).with_params(params)
}

/// Writes a row into `items`. With `replace`, an existing row whose key
/// matches case-insensitively is overwritten; otherwise the trailing blank
/// row is filled in.
fn put_row(items: &[KeyValueItem], key: String, value: String, replace: bool) -> Vec<KeyValueItem> {
    let rows = ensure_trailing_blank(items.to_vec());
    let existing = replace
        .then(|| {
            rows.iter()
                .position(|row| !row.is_blank() && row.key.eq_ignore_ascii_case(&key))
        })
        .flatten();
    let index = existing.unwrap_or_else(|| rows.len().saturating_sub(1));
    update_row(&rows, index, key, value)
}

fn summary_line(request: &ApiRequest) -> String {
    format!(
        "{} {} {} {}",
        request.id, request.method, request.name, request.url
    )
}

fn outcome(record: &ResponseRecord) -> String {
    record.error.as_ref().map_or_else(
        || format!("{} {} ({})", record.status, record.status_text, record.duration_display()),
        |error| format!("error: {error}"),
    )
}

fn print_response<W: Write>(out: &mut W, record: &ResponseRecord) -> std::io::Result<()> {
    if let Some(error) = &record.error {
        return writeln!(out, "error: {error} ({})", record.duration_display());
    }
    writeln!(
        out,
        "{} {} ({}, {})",
        record.status,
        record.status_text,
        record.duration_display(),
        record.size_display()
    )?;
    for (name, value) in &record.headers {
        writeln!(out, "{name}: {value}")?;
    }
    writeln!(out)?;
    if let Some(body) = record.formatted_body().or_else(|| record.body.clone()) {
        writeln!(out, "{body}")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::KeyPlacement;
    use nexus_domain::{ApiKeyLocation, HttpMethod, RequestId};
    use pretty_assertions::assert_eq;

    fn new_args() -> NewArgs {
        NewArgs {
            name: "Create".to_string(),
            method: HttpMethod::Post,
            url: "/users".to_string(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            params: Vec::new(),
            json: None,
            text: None,
            form: vec![("user".to_string(), "a".to_string())],
            form_data: Vec::new(),
            bearer: None,
            api_key: Some(("X-Key".to_string(), "k".to_string())),
            api_key_in: KeyPlacement::Header,
        }
    }

    #[test]
    fn test_build_request_applies_fields() {
        let request = build_request(ApiRequest::new(RequestId(3)), new_args());

        assert_eq!(request.name, "Create");
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body.kind, BodyType::FormUrlEncoded);
        assert_eq!(request.headers[0].key, "Accept");
        assert_eq!(request.auth.key_location(), ApiKeyLocation::Header);
        assert_eq!(request.auth.key_name.as_deref(), Some("X-Key"));
    }

    #[test]
    fn test_outcome_of_failure() {
        let record = ResponseRecord::failure("Connection failed: refused", 4);
        assert_eq!(outcome(&record), "error: Connection failed: refused");
    }
}
